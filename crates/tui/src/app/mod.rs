mod debounce;
pub mod modal;
pub mod transfer;

use std::{
    future::Future,
    path::PathBuf,
    time::{Duration, Instant},
};

use api_types::{
    grafik::ChartSeriesPoint,
    modal::{BalanceRecord, ChannelId, ModalNew, ModalUpdate},
    pagination::ListResponse,
    transfer::{FavoriteRecipient, TransferPayload, TransferRecord},
    user::UserView,
};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use engine::{Actor, RequestDescriptor, RequestSeq, SaveRequest};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    app::{debounce::Debouncer, modal::ModalScreen, transfer::TransferScreen},
    client::{Client, ClientError},
    config::AppConfig,
    error::{AppError, Result},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

/// Outcome of a remote call, with the failure already turned into a
/// user-facing message.
pub type Outcome<T> = std::result::Result<T, String>;

const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Modal,
    Transfer,
}

impl Section {
    pub fn label(self) -> &'static str {
        match self {
            Self::Modal => "Modal",
            Self::Transfer => "Transfer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    expires_at: Instant,
}

/// Work a screen asks the event loop to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    LoadBalances(RequestSeq),
    LoadHistory(RequestSeq),
    SaveBalance(SaveRequest<ChannelId>),
    UpdateHistory(SaveRequest<i64>),
    LoadTransfers {
        seq: RequestSeq,
        descriptor: RequestDescriptor,
        owner_date: Option<NaiveDate>,
    },
    /// (Re)starts the search debounce timer for the given search edit.
    DebounceSearch(u64),
    LoadFavorites {
        seq: RequestSeq,
        descriptor: RequestDescriptor,
    },
    LoadChart {
        seq: RequestSeq,
        descriptor: RequestDescriptor,
    },
    LoadCashiers(RequestSeq),
    SubmitTransfer {
        id: Option<i64>,
        payload: TransferPayload,
    },
    MarkLunas(i64),
    Export {
        file_name: String,
        contents: Vec<u8>,
    },
    Notify(ToastLevel, String),
}

/// Results coming back to the event loop from spawned tasks.
#[derive(Debug)]
pub enum AppEvent {
    Balances(RequestSeq, Outcome<Vec<BalanceRecord>>),
    History(RequestSeq, Outcome<Vec<BalanceRecord>>),
    BalanceSaved(Outcome<()>),
    HistoryUpdated(Outcome<()>),
    Transfers {
        seq: RequestSeq,
        owner_date: Option<NaiveDate>,
        outcome: Outcome<ListResponse<TransferRecord>>,
    },
    /// The search edit tagged here went quiet for the debounce delay.
    SearchSettled(u64),
    Favorites(RequestSeq, Outcome<Vec<FavoriteRecipient>>),
    Chart(RequestSeq, Outcome<Vec<ChartSeriesPoint>>),
    Cashiers(RequestSeq, Outcome<Vec<UserView>>),
    TransferSubmitted(Outcome<()>),
    LunasMarked(Outcome<()>),
}

#[derive(Debug)]
pub struct AppState {
    pub section: Section,
    pub actor: Actor,
    pub base_url: String,
    pub modal: ModalScreen,
    pub transfer: TransferScreen,
    pub toast: Option<ToastState>,
}

impl AppState {
    fn captures_input(&self) -> bool {
        match self.section {
            Section::Modal => self.modal.captures_input(),
            Section::Transfer => self.transfer.captures_input(),
        }
    }
}

pub struct App {
    config: AppConfig,
    client: Client,
    tz: Tz,
    pub state: AppState,
    tx: UnboundedSender<AppEvent>,
    rx: UnboundedReceiver<AppEvent>,
    search_debounce: Debouncer<AppEvent>,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(&config.base_url, config.token.clone())?;
        let tz = config.tz()?;
        let actor = config.actor();
        let (tx, rx) = mpsc::unbounded_channel();
        let search_debounce = Debouncer::new(config.search_debounce(), tx.clone());

        let state = AppState {
            section: Section::Modal,
            modal: ModalScreen::new(actor.clone()),
            transfer: TransferScreen::new(actor.clone(), tz, config.page_size),
            actor,
            base_url: config.base_url.clone(),
            toast: None,
        };

        Ok(Self {
            config,
            client,
            tz,
            state,
            tx,
            rx,
            search_debounce,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        tracing::info!(
            user = %self.state.actor.username,
            role = self.state.actor.role.as_str(),
            base_url = %self.config.base_url,
            "starting"
        );
        let mut commands = self.state.modal.reload();
        commands.extend(self.state.transfer.init());
        self.execute_all(commands);

        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(50);

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }

            while let Ok(event) = self.rx.try_recv() {
                self.dispatch(event);
            }

            if self
                .state
                .toast
                .as_ref()
                .is_some_and(|toast| toast.expires_at <= Instant::now())
            {
                self.state.toast = None;
            }
        }

        self.search_debounce.cancel();
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let action = map_key(key);
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }

        if !self.state.captures_input() {
            match action {
                AppAction::Input('q') => {
                    self.should_quit = true;
                    return;
                }
                AppAction::Input('1') => {
                    self.state.section = Section::Modal;
                    return;
                }
                AppAction::Input('2') => {
                    self.state.section = Section::Transfer;
                    return;
                }
                _ => {}
            }
        }

        let commands = match self.state.section {
            Section::Modal => self.state.modal.handle(action),
            Section::Transfer => self.state.transfer.handle(action, self.now()),
        };
        self.execute_all(commands);
    }

    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.tz).naive_local()
    }

    fn dispatch(&mut self, event: AppEvent) {
        let commands = match event {
            AppEvent::Balances(seq, outcome) => {
                self.state.modal.on_balances(seq, outcome);
                Vec::new()
            }
            AppEvent::History(seq, outcome) => {
                self.state.modal.on_history(seq, outcome);
                Vec::new()
            }
            AppEvent::BalanceSaved(outcome) => self.state.modal.on_balance_saved(outcome),
            AppEvent::HistoryUpdated(outcome) => self.state.modal.on_history_updated(outcome),
            AppEvent::Transfers {
                seq,
                owner_date,
                outcome,
            } => {
                self.state.transfer.on_transfers(seq, owner_date, outcome);
                Vec::new()
            }
            AppEvent::SearchSettled(edit) => self.state.transfer.search_settled(edit),
            AppEvent::Favorites(seq, outcome) => {
                self.state.transfer.on_favorites(seq, outcome);
                Vec::new()
            }
            AppEvent::Chart(seq, outcome) => {
                self.state.transfer.on_chart(seq, outcome);
                Vec::new()
            }
            AppEvent::Cashiers(seq, outcome) => {
                self.state.transfer.on_cashiers(seq, outcome);
                Vec::new()
            }
            AppEvent::TransferSubmitted(outcome) => self.state.transfer.on_submitted(outcome),
            AppEvent::LunasMarked(outcome) => self.state.transfer.on_lunas_marked(outcome),
        };
        self.execute_all(commands);
    }

    fn execute_all(&mut self, commands: Vec<Command>) {
        for command in commands {
            self.execute(command);
        }
    }

    fn execute(&mut self, command: Command) {
        let client = self.client.clone();
        match command {
            Command::LoadBalances(seq) => self.spawn(async move {
                AppEvent::Balances(seq, client.balances().await.map_err(failed("modal")))
            }),
            Command::LoadHistory(seq) => self.spawn(async move {
                let outcome = client.balance_history().await;
                AppEvent::History(seq, outcome.map_err(failed("modal history")))
            }),
            Command::SaveBalance(request) => self.spawn(async move {
                let body = ModalNew {
                    modal_type: request.target,
                    nominal: request.nominal,
                };
                let outcome = client.create_balance(&body).await;
                AppEvent::BalanceSaved(outcome.map_err(failed("save modal")))
            }),
            Command::UpdateHistory(request) => self.spawn(async move {
                let body = ModalUpdate {
                    nominal: request.nominal,
                };
                let outcome = client.update_balance(request.target, &body).await;
                AppEvent::HistoryUpdated(outcome.map_err(failed("update modal history")))
            }),
            Command::LoadTransfers {
                seq,
                descriptor,
                owner_date,
            } => self.spawn(async move {
                let outcome = client.transfers(&descriptor).await;
                AppEvent::Transfers {
                    seq,
                    owner_date,
                    outcome: outcome.map_err(failed("transfers")),
                }
            }),
            Command::DebounceSearch(edit) => {
                self.search_debounce.trigger(AppEvent::SearchSettled(edit))
            }
            Command::LoadFavorites { seq, descriptor } => self.spawn(async move {
                let outcome = client.favorites(&descriptor).await;
                AppEvent::Favorites(seq, outcome.map_err(failed("favorites")))
            }),
            Command::LoadChart { seq, descriptor } => self.spawn(async move {
                let outcome = client.chart(&descriptor).await;
                AppEvent::Chart(seq, outcome.map_err(failed("chart")))
            }),
            Command::LoadCashiers(seq) => self.spawn(async move {
                AppEvent::Cashiers(seq, client.users().await.map_err(failed("cashiers")))
            }),
            Command::SubmitTransfer { id, payload } => self.spawn(async move {
                let outcome = match id {
                    Some(id) => client.update_transfer(id, &payload).await,
                    None => client.create_transfer(&payload).await,
                };
                AppEvent::TransferSubmitted(outcome.map_err(failed("save transfer")))
            }),
            Command::MarkLunas(id) => self.spawn(async move {
                let outcome = client.mark_lunas(id).await;
                AppEvent::LunasMarked(outcome.map_err(failed("mark lunas")))
            }),
            Command::Export {
                file_name,
                contents,
            } => match self.export(&file_name, &contents) {
                Ok(path) => {
                    tracing::info!(path = %path.display(), "exported");
                    self.toast(ToastLevel::Success, format!("Tersimpan: {}", path.display()));
                }
                Err(err) => {
                    tracing::error!(%file_name, error = %err, "export failed");
                    self.toast(ToastLevel::Error, format!("Gagal menyimpan file: {err}"));
                }
            },
            Command::Notify(level, message) => self.toast(level, message),
        }
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = AppEvent> + Send + 'static,
    {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let event = task.await;
            // Closed only while the app is shutting down.
            let _ = tx.send(event);
        });
    }

    fn export(&self, file_name: &str, contents: &[u8]) -> std::io::Result<PathBuf> {
        let dir = PathBuf::from(&self.config.export_dir);
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(file_name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    fn toast(&mut self, level: ToastLevel, message: String) {
        self.state.toast = Some(ToastState {
            message,
            level,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }
}

/// Logs a failed call and turns it into the message shown to the user.
fn failed(context: &'static str) -> impl Fn(ClientError) -> String {
    move |err| {
        match &err {
            ClientError::Transport(source) => {
                tracing::error!(context, error = %source, "request failed");
            }
            other => tracing::warn!(context, error = ?other, "request rejected"),
        }
        message_for_error(err)
    }
}

fn message_for_error(err: ClientError) -> String {
    match err {
        ClientError::Unauthorized => "Sesi tidak valid, silakan login ulang.".to_string(),
        ClientError::Forbidden => "Akses ditolak.".to_string(),
        ClientError::NotFound => "Data tidak ditemukan.".to_string(),
        ClientError::Conflict(message) => format!("Konflik: {message}"),
        ClientError::Validation(message) => format!("Data tidak valid: {message}"),
        ClientError::Server(message) => format!("Kesalahan server: {message}"),
        ClientError::Transport(err) => format!("Server tidak dapat dihubungi: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_read_in_indonesian() {
        assert_eq!(
            message_for_error(ClientError::Validation("nominal".to_string())),
            "Data tidak valid: nominal"
        );
        assert_eq!(
            failed("test")(ClientError::NotFound),
            "Data tidak ditemukan."
        );
    }

    #[test]
    fn section_labels() {
        assert_eq!(Section::Modal.label(), "Modal");
        assert_eq!(Section::Transfer.label(), "Transfer");
    }
}
