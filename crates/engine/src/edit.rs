//! Single-row edit state machine.
//!
//! Used twice on the Modal screen: once keyed by channel for the current
//! balance cards, once keyed by row id for the history table. Each session
//! allows at most one row in `Editing`/`Saving` at a time.

use api_types::modal::ChannelId;
use rust_decimal::Decimal;

use crate::{EngineError, ResultEngine, money::parse_nominal};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditState<K> {
    Idle,
    Editing {
        target: K,
        draft: String,
        error: Option<String>,
    },
    Saving {
        target: K,
        draft: String,
    },
}

impl<K> Default for EditState<K> {
    fn default() -> Self {
        Self::Idle
    }
}

/// A validated write, handed to the network layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveRequest<K> {
    pub target: K,
    pub nominal: Decimal,
}

#[derive(Clone, Debug)]
pub struct EditSession<K> {
    state: EditState<K>,
}

impl<K> Default for EditSession<K> {
    fn default() -> Self {
        Self {
            state: EditState::Idle,
        }
    }
}

impl<K: Clone + PartialEq> EditSession<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditState<K> {
        &self.state
    }

    pub fn target(&self) -> Option<&K> {
        match &self.state {
            EditState::Idle => None,
            EditState::Editing { target, .. } | EditState::Saving { target, .. } => Some(target),
        }
    }

    /// `true` when `target` is the row being edited or saved.
    pub fn is_active(&self, target: &K) -> bool {
        self.target() == Some(target)
    }

    pub fn is_saving(&self) -> bool {
        matches!(self.state, EditState::Saving { .. })
    }

    pub fn draft(&self) -> Option<&str> {
        match &self.state {
            EditState::Idle => None,
            EditState::Editing { draft, .. } | EditState::Saving { draft, .. } => Some(draft),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            EditState::Editing { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    /// Opens `target` for editing with its current value as the draft.
    ///
    /// A row already in `Editing` is dropped without saving. Refused while a
    /// save is in flight.
    pub fn start(&mut self, target: K, current: Decimal) -> ResultEngine<()> {
        if self.is_saving() {
            return Err(EngineError::SaveInFlight);
        }
        self.state = EditState::Editing {
            target,
            draft: current.normalize().to_string(),
            error: None,
        };
        Ok(())
    }

    pub fn push(&mut self, ch: char) {
        if let EditState::Editing { draft, error, .. } = &mut self.state {
            draft.push(ch);
            *error = None;
        }
    }

    pub fn pop(&mut self) {
        if let EditState::Editing { draft, error, .. } = &mut self.state {
            draft.pop();
            *error = None;
        }
    }

    /// Drops the draft. No-op unless `Editing`.
    pub fn cancel(&mut self) -> bool {
        if matches!(self.state, EditState::Editing { .. }) {
            self.state = EditState::Idle;
            return true;
        }
        false
    }

    /// Validates the draft and moves to `Saving`.
    pub fn save(&mut self) -> ResultEngine<SaveRequest<K>> {
        self.save_with(|_, _| Ok(()))
    }

    /// Like [`save`](Self::save) with an extra rule on the parsed value.
    ///
    /// On a validation error the session stays in `Editing` with the message
    /// attached and nothing is returned for the network.
    pub fn save_with<F>(&mut self, rule: F) -> ResultEngine<SaveRequest<K>>
    where
        F: FnOnce(&K, Decimal) -> ResultEngine<()>,
    {
        let (target, draft, error) = match &mut self.state {
            EditState::Idle => return Err(EngineError::NotEditing),
            EditState::Saving { .. } => return Err(EngineError::SaveInFlight),
            EditState::Editing {
                target,
                draft,
                error,
            } => (target, draft, error),
        };

        let checked = parse_nominal(draft).and_then(|nominal| {
            rule(target, nominal)?;
            Ok(nominal)
        });
        let nominal = match checked {
            Ok(nominal) => nominal,
            Err(err) => {
                *error = Some(err.to_string());
                return Err(err);
            }
        };

        let request = SaveRequest {
            target: target.clone(),
            nominal,
        };
        self.state = EditState::Saving {
            target: request.target.clone(),
            draft: std::mem::take(draft),
        };
        Ok(request)
    }

    /// Applies the write outcome. Returns `true` when the affected lists must
    /// be reloaded.
    ///
    /// Failure goes back to `Editing` with the draft intact so the user can
    /// retry or correct it.
    pub fn finish(&mut self, outcome: Result<(), String>) -> bool {
        let EditState::Saving { target, draft } = std::mem::take(&mut self.state) else {
            return false;
        };
        match outcome {
            Ok(()) => true,
            Err(message) => {
                self.state = EditState::Editing {
                    target,
                    draft,
                    error: Some(message),
                };
                false
            }
        }
    }
}

/// Balance-entry rule: a zero `modal_kas` entry is not recorded.
pub fn balance_rule(channel: &ChannelId, nominal: Decimal) -> ResultEngine<()> {
    if *channel == ChannelId::ModalKas && nominal.is_zero() {
        return Err(EngineError::ZeroModalKas);
    }
    Ok(())
}
