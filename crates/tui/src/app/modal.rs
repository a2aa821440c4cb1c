use api_types::modal::{BalanceRecord, ChannelId};
use engine::{
    Actor, Applied, Channel, EditSession, EditState, RequestSeq, ResourceStore, aggregates,
    edit, visible_channels,
};
use rust_decimal::Decimal;

use crate::{
    app::{Command, Outcome, ToastLevel},
    ui::keymap::AppAction,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalFocus {
    Cards,
    History,
}

/// Modal screen: current balance per channel plus the deposit history.
#[derive(Debug)]
pub struct ModalScreen {
    actor: Actor,
    pub channels: Vec<Channel>,
    pub balances: ResourceStore<BalanceRecord>,
    pub history: ResourceStore<BalanceRecord>,
    pub balance_edit: EditSession<ChannelId>,
    pub history_edit: EditSession<i64>,
    pub selected_channel: usize,
    pub selected_row: usize,
    pub show_history: bool,
    pub focus: ModalFocus,
}

impl ModalScreen {
    pub fn new(actor: Actor) -> Self {
        Self {
            channels: visible_channels(actor.role),
            actor,
            balances: ResourceStore::new(),
            history: ResourceStore::new(),
            balance_edit: EditSession::new(),
            history_edit: EditSession::new(),
            selected_channel: 0,
            selected_row: 0,
            show_history: false,
            focus: ModalFocus::Cards,
        }
    }

    /// Reloads both lists. Issued on entry and after every successful write.
    pub fn reload(&mut self) -> Vec<Command> {
        vec![
            Command::LoadBalances(self.balances.begin()),
            Command::LoadHistory(self.history.begin()),
        ]
    }

    pub fn on_balances(&mut self, seq: RequestSeq, outcome: Outcome<Vec<BalanceRecord>>) {
        self.balances.finish(seq, outcome);
    }

    pub fn on_history(&mut self, seq: RequestSeq, outcome: Outcome<Vec<BalanceRecord>>) {
        if self.history.finish(seq, outcome) == Applied::Stale {
            return;
        }
        self.selected_row = self
            .selected_row
            .min(self.history_rows().len().saturating_sub(1));
    }

    pub fn current_value(&self, channel: ChannelId) -> Decimal {
        aggregates::current_value(channel, &self.actor, self.balances.items())
    }

    pub fn total_current(&self) -> Decimal {
        aggregates::total_current_across_channels(&self.actor, self.balances.items())
    }

    pub fn total_deposit(&self) -> Decimal {
        aggregates::total_deposit(&self.actor, self.history.items())
    }

    /// History rows the actor may see; a kasir only sees its own deposits.
    pub fn history_rows(&self) -> Vec<&BalanceRecord> {
        self.history
            .items()
            .iter()
            .filter(|row| !self.actor.is_kasir() || row.user_id == self.actor.id)
            .collect()
    }

    /// `true` while a draft is open and keystrokes belong to it.
    pub fn captures_input(&self) -> bool {
        matches!(self.balance_edit.state(), EditState::Editing { .. })
            || matches!(self.history_edit.state(), EditState::Editing { .. })
    }

    pub fn handle(&mut self, action: AppAction) -> Vec<Command> {
        if matches!(self.balance_edit.state(), EditState::Editing { .. }) {
            return self.handle_balance_draft(action);
        }
        if matches!(self.history_edit.state(), EditState::Editing { .. }) {
            return self.handle_history_draft(action);
        }

        match action {
            AppAction::Up => self.select(-1),
            AppAction::Down => self.select(1),
            AppAction::Submit | AppAction::Input('e') => return self.start_edit(),
            AppAction::Input('h') => self.toggle_history(),
            AppAction::NextField if self.show_history => {
                self.focus = match self.focus {
                    ModalFocus::Cards => ModalFocus::History,
                    ModalFocus::History => ModalFocus::Cards,
                };
            }
            AppAction::Input('r') => return self.reload(),
            _ => {}
        }
        Vec::new()
    }

    fn handle_balance_draft(&mut self, action: AppAction) -> Vec<Command> {
        match action {
            AppAction::Input(ch) => self.balance_edit.push(ch),
            AppAction::Backspace => self.balance_edit.pop(),
            AppAction::Cancel => {
                self.balance_edit.cancel();
            }
            AppAction::Submit => return self.save_balance(),
            _ => {}
        }
        Vec::new()
    }

    fn handle_history_draft(&mut self, action: AppAction) -> Vec<Command> {
        match action {
            AppAction::Input(ch) => self.history_edit.push(ch),
            AppAction::Backspace => self.history_edit.pop(),
            AppAction::Cancel => {
                self.history_edit.cancel();
            }
            AppAction::Submit => return self.save_history(),
            _ => {}
        }
        Vec::new()
    }

    fn select(&mut self, delta: isize) {
        let (index, len) = match self.focus {
            ModalFocus::Cards => (&mut self.selected_channel, self.channels.len()),
            ModalFocus::History => {
                let len = self.history_rows().len();
                (&mut self.selected_row, len)
            }
        };
        if len == 0 {
            return;
        }
        *index = index.saturating_add_signed(delta).min(len - 1);
    }

    pub fn toggle_history(&mut self) {
        self.show_history = !self.show_history;
        self.focus = if self.show_history {
            ModalFocus::History
        } else {
            ModalFocus::Cards
        };
    }

    /// Opens the selected card or history row. Refused while that session
    /// is saving.
    pub fn start_edit(&mut self) -> Vec<Command> {
        let result = match self.focus {
            ModalFocus::Cards => {
                let Some(channel) = self.channels.get(self.selected_channel).copied() else {
                    return Vec::new();
                };
                let current = self.current_value(channel.id);
                let result = self.balance_edit.start(channel.id, current);
                if result.is_ok() {
                    self.history_edit.cancel();
                }
                result
            }
            ModalFocus::History => {
                let Some((id, nominal)) = self
                    .history_rows()
                    .get(self.selected_row)
                    .map(|row| (row.id, row.nominal))
                else {
                    return Vec::new();
                };
                let result = self.history_edit.start(id, nominal);
                if result.is_ok() {
                    self.balance_edit.cancel();
                }
                result
            }
        };

        match result {
            Ok(()) => Vec::new(),
            Err(err) => vec![Command::Notify(ToastLevel::Info, err.to_string())],
        }
    }

    /// Validation failures stay in the session and issue nothing.
    pub fn save_balance(&mut self) -> Vec<Command> {
        match self.balance_edit.save_with(edit::balance_rule) {
            Ok(request) => vec![Command::SaveBalance(request)],
            Err(_) => Vec::new(),
        }
    }

    pub fn save_history(&mut self) -> Vec<Command> {
        match self.history_edit.save() {
            Ok(request) => vec![Command::UpdateHistory(request)],
            Err(_) => Vec::new(),
        }
    }

    pub fn on_balance_saved(&mut self, outcome: Outcome<()>) -> Vec<Command> {
        let reload = self.balance_edit.finish(outcome.clone());
        self.write_result(reload, outcome)
    }

    pub fn on_history_updated(&mut self, outcome: Outcome<()>) -> Vec<Command> {
        let reload = self.history_edit.finish(outcome.clone());
        self.write_result(reload, outcome)
    }

    fn write_result(&mut self, reload: bool, outcome: Outcome<()>) -> Vec<Command> {
        match outcome {
            Ok(()) if reload => {
                let mut commands = vec![Command::Notify(
                    ToastLevel::Success,
                    "Data modal berhasil disimpan".to_string(),
                )];
                commands.extend(self.reload());
                commands
            }
            Ok(()) => Vec::new(),
            Err(message) => vec![Command::Notify(ToastLevel::Error, message)],
        }
    }
}
