use api_types::{
    grafik::{ChartSeriesPoint, Period},
    pagination::ListResponse,
    transfer::{FavoriteRecipient, TransferRecord, TransferStatus},
    user::UserView,
};
use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use engine::{
    Actor, Applied, CashierFilter, FormField, Pagination, PeriodTotals, RequestSeq,
    ResourceStore, TransferDraft, TransferFilters, aggregates, dates, query, receipt, reconcile,
    report,
};

use crate::{
    app::{Command, Outcome, ToastLevel},
    ui::keymap::AppAction,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    List,
    Search,
    DateInput,
    Favorites,
    Form,
    ConfirmLunas(i64),
}

#[derive(Debug, Clone)]
pub struct FormState {
    pub draft: TransferDraft,
    pub field: FormField,
    pub submitting: bool,
    pub error: Option<String>,
}

impl FormState {
    fn new(draft: TransferDraft) -> Self {
        Self {
            draft,
            field: FormField::Tanggal,
            submitting: false,
            error: None,
        }
    }
}

/// Transfer screen: paginated list, filters, favorites, chart and form.
///
/// Every handler returns the reloads it needs; nothing is fetched implicitly.
#[derive(Debug)]
pub struct TransferScreen {
    actor: Actor,
    tz: Tz,
    pub filters: TransferFilters,
    pub pagination: Pagination,
    pub transfers: ResourceStore<TransferRecord>,
    pub favorites: ResourceStore<FavoriteRecipient>,
    pub favorite_search: String,
    pub cashiers: ResourceStore<UserView>,
    pub chart: ResourceStore<ChartSeriesPoint>,
    pub period: Period,
    pub mode: TransferMode,
    pub form: Option<FormState>,
    pub date_input: String,
    /// Bumped on every search edit; only the newest edit's timer may reload.
    search_edit: u64,
    pub selected: usize,
    pub selected_favorite: usize,
    /// Transfer whose `lunas` update is in flight.
    pub marking: Option<i64>,
}

impl TransferScreen {
    /// The owner starts on today's transfers; clearing the date shows every day.
    pub fn new(actor: Actor, tz: Tz, page_size: u64) -> Self {
        let mut filters = TransferFilters::default();
        if actor.is_owner() {
            filters.date = Some(dates::today_in(tz));
        }
        Self {
            actor,
            tz,
            filters,
            pagination: Pagination::new(page_size),
            transfers: ResourceStore::new(),
            favorites: ResourceStore::new(),
            favorite_search: String::new(),
            cashiers: ResourceStore::new(),
            chart: ResourceStore::new(),
            period: Period::default(),
            mode: TransferMode::List,
            form: None,
            date_input: String::new(),
            search_edit: 0,
            selected: 0,
            selected_favorite: 0,
            marking: None,
        }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn init(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        if self.actor.is_owner() {
            commands.push(Command::LoadCashiers(self.cashiers.begin()));
        }
        commands.push(self.load_transfers());
        commands.push(self.load_favorites());
        commands.push(self.load_chart());
        commands
    }

    fn load_transfers(&mut self) -> Command {
        Command::LoadTransfers {
            seq: self.transfers.begin(),
            descriptor: self.filters.build(&self.actor, &self.pagination),
            owner_date: self.filters.owner_date(&self.actor),
        }
    }

    fn load_favorites(&mut self) -> Command {
        Command::LoadFavorites {
            seq: self.favorites.begin(),
            descriptor: query::favorites(&self.favorite_search),
        }
    }

    fn load_chart(&mut self) -> Command {
        Command::LoadChart {
            seq: self.chart.begin(),
            descriptor: query::chart(self.period),
        }
    }

    // Trigger table.

    pub fn set_cashier(&mut self, cashier: CashierFilter) -> Vec<Command> {
        self.filters.cashier = cashier;
        self.pagination.on_filter_change();
        vec![self.load_transfers(), self.load_chart()]
    }

    pub fn set_date(&mut self, date: Option<NaiveDate>) -> Vec<Command> {
        self.filters.date = date;
        self.pagination.on_filter_change();
        vec![self.load_transfers()]
    }

    /// The page resets now; the reload waits for the debounce.
    pub fn set_search(&mut self, search: String) -> Vec<Command> {
        self.filters.search = search;
        self.pagination.on_filter_change();
        self.search_edit += 1;
        vec![Command::DebounceSearch(self.search_edit)]
    }

    /// A timer that finished just before a newer keystroke still delivers its
    /// event; only the newest edit reloads.
    pub fn search_settled(&mut self, edit: u64) -> Vec<Command> {
        if edit != self.search_edit {
            return Vec::new();
        }
        vec![self.load_transfers()]
    }

    pub fn set_page(&mut self, page: u64) -> Vec<Command> {
        if self.pagination.set_page(page) {
            vec![self.load_transfers()]
        } else {
            Vec::new()
        }
    }

    pub fn set_period(&mut self, period: Period) -> Vec<Command> {
        self.period = period;
        vec![self.load_chart()]
    }

    pub fn set_favorite_search(&mut self, search: String) -> Vec<Command> {
        self.favorite_search = search;
        self.selected_favorite = 0;
        vec![self.load_favorites()]
    }

    pub fn reload(&mut self) -> Vec<Command> {
        vec![self.load_transfers(), self.load_chart()]
    }

    // Outcomes.

    pub fn on_transfers(
        &mut self,
        seq: RequestSeq,
        owner_date: Option<NaiveDate>,
        outcome: Outcome<ListResponse<TransferRecord>>,
    ) {
        let (outcome, update) = match outcome {
            Ok(response) => {
                let (rows, update) = reconcile::transfers(response, owner_date);
                (Ok(rows), Some(update))
            }
            Err(message) => (Err(message), None),
        };
        if self.transfers.finish(seq, outcome) == Applied::Stale {
            return;
        }
        if let Some(update) = update {
            update.apply(&mut self.pagination);
        }
        self.selected = self.selected.min(self.transfers.len().saturating_sub(1));
    }

    pub fn on_favorites(&mut self, seq: RequestSeq, outcome: Outcome<Vec<FavoriteRecipient>>) {
        if self.favorites.finish(seq, outcome) == Applied::Stale {
            return;
        }
        self.selected_favorite = self
            .selected_favorite
            .min(self.favorites.len().saturating_sub(1));
    }

    pub fn on_chart(&mut self, seq: RequestSeq, outcome: Outcome<Vec<ChartSeriesPoint>>) {
        self.chart.finish(seq, outcome);
    }

    pub fn on_cashiers(&mut self, seq: RequestSeq, outcome: Outcome<Vec<UserView>>) {
        self.cashiers.finish(seq, outcome.map(reconcile::cashiers));
    }

    pub fn on_submitted(&mut self, outcome: Outcome<()>) -> Vec<Command> {
        match outcome {
            Ok(()) => {
                self.form = None;
                self.mode = TransferMode::List;
                self.pagination.on_filter_change();
                vec![
                    Command::Notify(ToastLevel::Success, "Transfer berhasil disimpan".to_string()),
                    self.load_transfers(),
                    self.load_favorites(),
                    self.load_chart(),
                ]
            }
            Err(message) => {
                if let Some(form) = &mut self.form {
                    form.submitting = false;
                    form.error = Some(message.clone());
                }
                vec![Command::Notify(ToastLevel::Error, message)]
            }
        }
    }

    pub fn on_lunas_marked(&mut self, outcome: Outcome<()>) -> Vec<Command> {
        self.marking = None;
        match outcome {
            Ok(()) => vec![
                Command::Notify(ToastLevel::Success, "Transfer ditandai lunas".to_string()),
                self.load_transfers(),
            ],
            Err(message) => vec![Command::Notify(ToastLevel::Error, message)],
        }
    }

    // Derived values for rendering.

    pub fn selected_transfer(&self) -> Option<&TransferRecord> {
        self.transfers.get(self.selected)
    }

    pub fn period_totals(&self) -> PeriodTotals {
        aggregates::period_chart_totals(self.chart.items())
    }

    pub fn cashier_label(&self) -> String {
        match self.filters.cashier {
            CashierFilter::All => "Semua".to_string(),
            CashierFilter::Cashier(id) => self
                .cashiers
                .items()
                .iter()
                .find(|user| user.id == id)
                .map(|user| user.username.clone())
                .unwrap_or_else(|| format!("#{id}")),
        }
    }

    /// `all`, then each loaded cashier, then back to `all`.
    fn next_cashier(&self) -> CashierFilter {
        let cashiers = self.cashiers.items();
        let next_index = match self.filters.cashier {
            CashierFilter::All => 0,
            CashierFilter::Cashier(id) => cashiers
                .iter()
                .position(|user| user.id == id)
                .map_or(cashiers.len(), |index| index + 1),
        };
        cashiers
            .get(next_index)
            .map_or(CashierFilter::All, |user| CashierFilter::Cashier(user.id))
    }

    // Form, favorites, lunas.

    pub fn open_new_form(&mut self) {
        let draft = TransferDraft::new(dates::today_in(self.tz));
        self.form = Some(FormState::new(draft));
        self.mode = TransferMode::Form;
    }

    pub fn open_edit_form(&mut self) {
        if let Some(record) = self.selected_transfer() {
            let draft = TransferDraft::from_record(record);
            self.form = Some(FormState::new(draft));
            self.mode = TransferMode::Form;
        }
    }

    /// Fills a new form with the chosen favorite's recipient.
    pub fn choose_favorite(&mut self) {
        let Some(favorite) = self.favorites.get(self.selected_favorite).cloned() else {
            return;
        };
        let mut draft = match self.form.take() {
            Some(form) => form.draft,
            None => TransferDraft::new(dates::today_in(self.tz)),
        };
        draft.apply_favorite(&favorite);
        let mut form = FormState::new(draft);
        form.field = FormField::Nominal;
        self.form = Some(form);
        self.mode = TransferMode::Form;
    }

    pub fn submit_form(&mut self) -> Vec<Command> {
        let Some(form) = &mut self.form else {
            return Vec::new();
        };
        if form.submitting {
            return Vec::new();
        }
        match form.draft.validate() {
            Ok(payload) => {
                form.submitting = true;
                form.error = None;
                vec![Command::SubmitTransfer {
                    id: form.draft.editing,
                    payload,
                }]
            }
            Err(err) => {
                form.error = Some(err.to_string());
                Vec::new()
            }
        }
    }

    pub fn request_lunas(&mut self) -> Vec<Command> {
        if self.marking.is_some() {
            return Vec::new();
        }
        let Some(record) = self.selected_transfer() else {
            return Vec::new();
        };
        if record.status() == TransferStatus::Lunas {
            return vec![Command::Notify(
                ToastLevel::Info,
                "Transfer sudah lunas".to_string(),
            )];
        }
        self.mode = TransferMode::ConfirmLunas(record.id);
        Vec::new()
    }

    pub fn confirm_lunas(&mut self, confirmed: bool) -> Vec<Command> {
        let TransferMode::ConfirmLunas(id) = self.mode else {
            return Vec::new();
        };
        self.mode = TransferMode::List;
        if !confirmed {
            return Vec::new();
        }
        self.marking = Some(id);
        vec![Command::MarkLunas(id)]
    }

    pub fn receipt(&self) -> Vec<Command> {
        match self.selected_transfer() {
            Some(record) => vec![Command::Export {
                file_name: receipt::file_name(record),
                contents: receipt::render(record).into_bytes(),
            }],
            None => Vec::new(),
        }
    }

    pub fn report(&self, printed_at: NaiveDateTime) -> Vec<Command> {
        match report::transfer_report(
            self.period,
            printed_at,
            self.chart.items(),
            self.transfers.items(),
        ) {
            Ok(contents) => vec![Command::Export {
                file_name: report::file_name(self.period, printed_at.date()),
                contents,
            }],
            Err(err) => vec![Command::Notify(ToastLevel::Error, err.to_string())],
        }
    }

    // Keys.

    pub fn captures_input(&self) -> bool {
        matches!(
            self.mode,
            TransferMode::Search
                | TransferMode::DateInput
                | TransferMode::Favorites
                | TransferMode::Form
                | TransferMode::ConfirmLunas(_)
        )
    }

    pub fn handle(&mut self, action: AppAction, now: NaiveDateTime) -> Vec<Command> {
        match self.mode {
            TransferMode::List => self.handle_list(action, now),
            TransferMode::Search => self.handle_search(action),
            TransferMode::DateInput => self.handle_date(action),
            TransferMode::Favorites => self.handle_favorites(action),
            TransferMode::Form => self.handle_form(action),
            TransferMode::ConfirmLunas(_) => {
                self.confirm_lunas(matches!(action, AppAction::Input('y' | 'Y')))
            }
        }
    }

    fn handle_list(&mut self, action: AppAction, now: NaiveDateTime) -> Vec<Command> {
        match action {
            AppAction::Up => {
                self.selected = self.selected.saturating_sub(1);
                Vec::new()
            }
            AppAction::Down => {
                self.selected = (self.selected + 1).min(self.transfers.len().saturating_sub(1));
                Vec::new()
            }
            AppAction::Left => self.set_page(self.pagination.page().saturating_sub(1)),
            AppAction::Right => self.set_page(self.pagination.page() + 1),
            AppAction::Input('/') => {
                self.mode = TransferMode::Search;
                Vec::new()
            }
            AppAction::Input('d') if self.actor.is_owner() => {
                self.date_input = self
                    .filters
                    .date
                    .map(|date| date.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                self.mode = TransferMode::DateInput;
                Vec::new()
            }
            AppAction::Input('c') if self.actor.is_owner() => {
                let next = self.next_cashier();
                self.set_cashier(next)
            }
            AppAction::Input('g') => self.set_period(self.period.next()),
            AppAction::Input('a') => {
                self.open_new_form();
                Vec::new()
            }
            AppAction::Input('e') => {
                self.open_edit_form();
                Vec::new()
            }
            AppAction::Input('f') => {
                self.mode = TransferMode::Favorites;
                Vec::new()
            }
            AppAction::Input('l') => self.request_lunas(),
            AppAction::Input('s') => self.receipt(),
            AppAction::Input('x') => self.report(now),
            AppAction::Input('r') => self.reload(),
            _ => Vec::new(),
        }
    }

    fn handle_search(&mut self, action: AppAction) -> Vec<Command> {
        let mut search = self.filters.search.clone();
        match action {
            AppAction::Input(ch) => search.push(ch),
            AppAction::Backspace => {
                if search.pop().is_none() {
                    return Vec::new();
                }
            }
            AppAction::Submit | AppAction::Cancel => {
                self.mode = TransferMode::List;
                return Vec::new();
            }
            _ => return Vec::new(),
        }
        self.set_search(search)
    }

    fn handle_date(&mut self, action: AppAction) -> Vec<Command> {
        match action {
            AppAction::Input(ch) => self.date_input.push(ch),
            AppAction::Backspace => {
                self.date_input.pop();
            }
            AppAction::Cancel => self.mode = TransferMode::List,
            AppAction::Submit => {
                let input = self.date_input.trim();
                if input.is_empty() {
                    self.mode = TransferMode::List;
                    return self.set_date(None);
                }
                return match dates::parse_input_date(input) {
                    Ok(date) => {
                        self.mode = TransferMode::List;
                        self.set_date(Some(date))
                    }
                    Err(err) => vec![Command::Notify(ToastLevel::Error, err.to_string())],
                };
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_favorites(&mut self, action: AppAction) -> Vec<Command> {
        match action {
            AppAction::Up => self.selected_favorite = self.selected_favorite.saturating_sub(1),
            AppAction::Down => {
                self.selected_favorite =
                    (self.selected_favorite + 1).min(self.favorites.len().saturating_sub(1));
            }
            AppAction::Submit => self.choose_favorite(),
            AppAction::Cancel => {
                self.mode = if self.form.is_some() {
                    TransferMode::Form
                } else {
                    TransferMode::List
                };
            }
            AppAction::Input(ch) => {
                let mut search = self.favorite_search.clone();
                search.push(ch);
                return self.set_favorite_search(search);
            }
            AppAction::Backspace => {
                let mut search = self.favorite_search.clone();
                if search.pop().is_some() {
                    return self.set_favorite_search(search);
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_form(&mut self, action: AppAction) -> Vec<Command> {
        if action == AppAction::Submit {
            return self.submit_form();
        }
        let Some(form) = &mut self.form else {
            self.mode = TransferMode::List;
            return Vec::new();
        };
        if form.submitting {
            return Vec::new();
        }
        match action {
            AppAction::NextField | AppAction::Down => form.field = form.field.next(),
            AppAction::Up => form.field = form.field.prev(),
            AppAction::Input(ch) => {
                form.draft.field_mut(form.field).push(ch);
                form.error = None;
            }
            AppAction::Backspace => {
                form.draft.field_mut(form.field).pop();
                form.error = None;
            }
            AppAction::Cancel => {
                self.form = None;
                self.mode = TransferMode::List;
            }
            _ => {}
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use api_types::{pagination::PageInfo, user::Role};
    use rust_decimal::Decimal;

    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 2)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn transfer(id: i64, tanggal: &str, status: Option<TransferStatus>) -> TransferRecord {
        TransferRecord {
            id,
            tanggal: tanggal.to_string(),
            bank_tujuan: "BCA".to_string(),
            nomor_rekening: "123".to_string(),
            nama_pemilik: "Andi".to_string(),
            nominal: Decimal::new(100_000, 0),
            biaya: Decimal::new(5_000, 0),
            keterangan: None,
            status,
            cashier_id: Some(7),
        }
    }

    fn screen(role: Role) -> TransferScreen {
        TransferScreen::new(Actor::new(1, "bos", role), chrono_tz::Asia::Jakarta, 10)
    }

    fn transfers_seq(commands: &[Command]) -> (RequestSeq, Option<NaiveDate>) {
        commands
            .iter()
            .find_map(|command| match command {
                Command::LoadTransfers {
                    seq, owner_date, ..
                } => Some((*seq, *owner_date)),
                _ => None,
            })
            .unwrap()
    }

    fn paged(rows: Vec<TransferRecord>, page: u64, total: u64) -> ListResponse<TransferRecord> {
        ListResponse::Paged {
            data: rows,
            pagination: PageInfo {
                page,
                limit: 10,
                total,
                total_pages: 0,
            },
        }
    }

    /// Moves the list to `page` of a 25-row result.
    fn on_page(screen: &mut TransferScreen, page: u64) {
        let commands = screen.reload();
        let (seq, date) = transfers_seq(&commands);
        screen.on_transfers(seq, date, Ok(paged(vec![transfer(1, "2024-05-01", None)], 1, 25)));
        let commands = screen.set_page(page);
        let (seq, date) = transfers_seq(&commands);
        screen.on_transfers(seq, date, Ok(paged(vec![transfer(2, "2024-05-01", None)], page, 25)));
        assert_eq!(screen.pagination.page(), page);
    }

    #[test]
    fn owner_init_loads_cashiers_list_favorites_and_chart() {
        let mut owner = screen(Role::Owner);
        let commands = owner.init();
        assert!(matches!(commands[0], Command::LoadCashiers(_)));
        assert_eq!(commands.len(), 4);

        let mut kasir = screen(Role::Kasir);
        assert_eq!(kasir.init().len(), 3);
    }

    #[test]
    fn owner_starts_on_today_and_can_clear_the_date() {
        let today = dates::today_in(chrono_tz::Asia::Jakarta);
        let iso = today.format("%Y-%m-%d").to_string();
        let mut owner = screen(Role::Owner);
        let commands = owner.init();
        let Some(Command::LoadTransfers {
            descriptor,
            owner_date,
            ..
        }) = commands
            .iter()
            .find(|command| matches!(command, Command::LoadTransfers { .. }))
        else {
            panic!("owner init must load transfers, got {commands:?}");
        };
        assert_eq!(descriptor.get("startDate"), Some(iso.as_str()));
        assert_eq!(descriptor.get("endDate"), Some(iso.as_str()));
        assert_eq!(*owner_date, Some(today));

        owner.handle(AppAction::Input('d'), now());
        assert_eq!(owner.date_input, iso);
        owner.date_input.clear();
        let commands = owner.handle(AppAction::Submit, now());
        let Command::LoadTransfers {
            descriptor,
            owner_date,
            ..
        } = &commands[0]
        else {
            panic!("expected a transfer reload, got {commands:?}");
        };
        assert_eq!(descriptor.get("startDate"), None);
        assert_eq!(*owner_date, None);

        let mut kasir = screen(Role::Kasir);
        let (_, owner_date) = transfers_seq(&kasir.init());
        assert_eq!(owner_date, None);
        assert_eq!(kasir.filters.date, None);
    }

    #[test]
    fn server_pagination_gives_three_pages_and_rejects_page_four() {
        let mut screen = screen(Role::Kasir);
        on_page(&mut screen, 3);
        assert_eq!(screen.pagination.total_pages(), 3);
        assert!(screen.set_page(4).is_empty());
        assert!(screen.set_page(3).is_empty());
        assert_eq!(screen.pagination.page(), 3);
    }

    #[test]
    fn every_filter_change_resets_to_page_one() {
        let mut owner = screen(Role::Owner);

        on_page(&mut owner, 2);
        let commands = owner.set_cashier(CashierFilter::Cashier(9));
        assert_eq!(owner.pagination.page(), 1);
        let Command::LoadTransfers { descriptor, .. } = &commands[0] else {
            panic!("expected a transfer reload, got {commands:?}");
        };
        assert_eq!(descriptor.get("page"), Some("1"));
        assert_eq!(descriptor.get("cashier_id"), Some("9"));
        assert!(matches!(commands[1], Command::LoadChart { .. }));

        on_page(&mut owner, 2);
        let commands = owner.set_date(NaiveDate::from_ymd_opt(2024, 5, 1));
        let Command::LoadTransfers { descriptor, .. } = &commands[0] else {
            panic!("expected a transfer reload, got {commands:?}");
        };
        assert_eq!(descriptor.get("page"), Some("1"));
        assert_eq!(descriptor.get("startDate"), Some("2024-05-01"));

        on_page(&mut owner, 2);
        assert!(matches!(
            &owner.set_search("andi".to_string())[..],
            [Command::DebounceSearch(_)]
        ));
        assert_eq!(owner.pagination.page(), 1);
    }

    #[test]
    fn search_reload_waits_for_the_debounce() {
        let mut screen = screen(Role::Kasir);
        screen.mode = TransferMode::Search;
        let mut edits = Vec::new();
        for ch in "bud".chars() {
            let commands = screen.handle(AppAction::Input(ch), now());
            let [Command::DebounceSearch(edit)] = &commands[..] else {
                panic!("expected a debounce, got {commands:?}");
            };
            edits.push(*edit);
        }
        let last = edits[2];
        let commands = screen.search_settled(last);
        let Command::LoadTransfers { descriptor, .. } = &commands[0] else {
            panic!("expected a transfer reload, got {commands:?}");
        };
        assert_eq!(descriptor.get("search"), Some("bud"));
    }

    #[test]
    fn settled_event_of_an_older_keystroke_is_ignored() {
        let mut screen = screen(Role::Kasir);
        screen.mode = TransferMode::Search;
        let commands = screen.handle(AppAction::Input('a'), now());
        let [Command::DebounceSearch(first)] = &commands[..] else {
            panic!("expected a debounce, got {commands:?}");
        };
        let first = *first;
        // The first timer already fired when the next key arrives.
        let commands = screen.handle(AppAction::Input('n'), now());
        let [Command::DebounceSearch(second)] = &commands[..] else {
            panic!("expected a debounce, got {commands:?}");
        };
        let second = *second;

        assert!(screen.search_settled(first).is_empty());
        let commands = screen.search_settled(second);
        let Command::LoadTransfers { descriptor, .. } = &commands[0] else {
            panic!("expected a transfer reload, got {commands:?}");
        };
        assert_eq!(descriptor.get("search"), Some("an"));
    }

    #[test]
    fn owner_date_refilter_drops_other_days_from_bare_lists() {
        let mut owner = screen(Role::Owner);
        let commands = owner.set_date(NaiveDate::from_ymd_opt(2024, 5, 1));
        let (seq, date) = transfers_seq(&commands);
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 5, 1));

        owner.on_transfers(
            seq,
            date,
            Ok(ListResponse::Bare(vec![
                transfer(1, "2024-05-01T03:00:00.000Z", None),
                transfer(2, "2024-04-30", None),
            ])),
        );
        assert_eq!(owner.transfers.len(), 1);
        assert_eq!(owner.pagination.total(), 1);
        assert_eq!(owner.pagination.total_pages(), 1);
    }

    #[test]
    fn stale_transfer_response_is_discarded() {
        let mut screen = screen(Role::Kasir);
        let (first, _) = transfers_seq(&screen.reload());
        let (second, _) = transfers_seq(&screen.reload());

        screen.on_transfers(second, None, Ok(paged(vec![transfer(2, "2024-05-01", None)], 1, 1)));
        screen.on_transfers(first, None, Ok(paged(Vec::new(), 1, 40)));
        assert_eq!(screen.transfers.items()[0].id, 2);
        assert_eq!(screen.pagination.total(), 1);
    }

    #[test]
    fn failed_load_empties_the_list() {
        let mut screen = screen(Role::Kasir);
        let (seq, _) = transfers_seq(&screen.reload());
        screen.on_transfers(seq, None, Ok(paged(vec![transfer(1, "2024-05-01", None)], 1, 1)));

        let (seq, _) = transfers_seq(&screen.reload());
        screen.on_transfers(seq, None, Err("Server tidak dapat dihubungi".to_string()));
        assert!(screen.transfers.is_empty());
        assert_eq!(screen.transfers.error(), Some("Server tidak dapat dihubungi"));
    }

    #[test]
    fn cashier_picker_cycles_through_kasir_accounts() {
        let mut owner = screen(Role::Owner);
        let Command::LoadCashiers(seq) = owner.init()[0].clone() else {
            panic!("owner init must load cashiers");
        };
        owner.on_cashiers(
            seq,
            Ok(vec![
                UserView {
                    id: 1,
                    username: "bos".to_string(),
                    role: Role::Owner,
                },
                UserView {
                    id: 7,
                    username: "sari".to_string(),
                    role: Role::Kasir,
                },
            ]),
        );

        owner.handle(AppAction::Input('c'), now());
        assert_eq!(owner.filters.cashier, CashierFilter::Cashier(7));
        assert_eq!(owner.cashier_label(), "sari");
        owner.handle(AppAction::Input('c'), now());
        assert_eq!(owner.filters.cashier, CashierFilter::All);
    }

    #[test]
    fn kasir_cannot_filter_by_cashier_or_date() {
        let mut kasir = screen(Role::Kasir);
        assert!(kasir.handle(AppAction::Input('c'), now()).is_empty());
        kasir.handle(AppAction::Input('d'), now());
        assert_eq!(kasir.mode, TransferMode::List);
    }

    #[test]
    fn invalid_form_is_not_submitted() {
        let mut screen = screen(Role::Kasir);
        screen.open_new_form();
        assert!(screen.submit_form().is_empty());
        let form = screen.form.as_ref().unwrap();
        assert_eq!(form.error.as_deref(), Some("Bank Tujuan wajib diisi"));
        assert!(!form.submitting);
    }

    #[test]
    fn favorite_fills_the_form_and_submit_posts() {
        let mut screen = screen(Role::Kasir);
        let Command::LoadFavorites { seq, .. } = screen.init()[1].clone() else {
            panic!("kasir init must load favorites second");
        };
        screen.on_favorites(
            seq,
            Ok(vec![FavoriteRecipient {
                bank_tujuan: "BRI".to_string(),
                nomor_rekening: "0012".to_string(),
                nama_pemilik: "Sari".to_string(),
            }]),
        );

        screen.handle(AppAction::Input('f'), now());
        screen.handle(AppAction::Submit, now());
        assert_eq!(screen.mode, TransferMode::Form);
        for ch in "50000".chars() {
            screen.handle(AppAction::Input(ch), now());
        }
        screen.handle(AppAction::NextField, now());
        screen.handle(AppAction::Input('0'), now());

        let commands = screen.handle(AppAction::Submit, now());
        let [Command::SubmitTransfer { id: None, payload }] = &commands[..] else {
            panic!("expected a create, got {commands:?}");
        };
        assert_eq!(payload.bank_tujuan, "BRI");
        assert_eq!(payload.nominal, Decimal::new(50_000, 0));
        assert!(screen.handle(AppAction::Submit, now()).is_empty());
    }

    #[test]
    fn failed_submit_keeps_the_form_open() {
        let mut screen = screen(Role::Kasir);
        screen.form = Some(FormState::new(TransferDraft::from_record(&transfer(
            4,
            "2024-05-01",
            None,
        ))));
        screen.mode = TransferMode::Form;
        let commands = screen.submit_form();
        assert!(matches!(&commands[..], [Command::SubmitTransfer { id: Some(4), .. }]));

        screen.on_submitted(Err("Data tidak valid: nominal".to_string()));
        let form = screen.form.as_ref().unwrap();
        assert!(!form.submitting);
        assert_eq!(form.error.as_deref(), Some("Data tidak valid: nominal"));
        assert_eq!(screen.mode, TransferMode::Form);
    }

    #[test]
    fn successful_submit_closes_form_and_reloads_from_page_one() {
        let mut screen = screen(Role::Kasir);
        on_page(&mut screen, 2);
        screen.open_new_form();
        let commands = screen.on_submitted(Ok(()));
        assert!(screen.form.is_none());
        assert_eq!(screen.pagination.page(), 1);
        assert!(commands.iter().any(|c| matches!(c, Command::LoadTransfers { .. })));
        assert!(commands.iter().any(|c| matches!(c, Command::LoadFavorites { .. })));
    }

    #[test]
    fn lunas_needs_confirmation_and_skips_paid_transfers() {
        let mut screen = screen(Role::Kasir);
        let (seq, _) = transfers_seq(&screen.reload());
        screen.on_transfers(
            seq,
            None,
            Ok(ListResponse::Bare(vec![
                transfer(1, "2024-05-01", None),
                transfer(2, "2024-05-01", Some(TransferStatus::Lunas)),
            ])),
        );

        screen.handle(AppAction::Input('l'), now());
        assert_eq!(screen.mode, TransferMode::ConfirmLunas(1));
        assert!(screen.handle(AppAction::Input('n'), now()).is_empty());
        assert_eq!(screen.mode, TransferMode::List);

        screen.handle(AppAction::Input('l'), now());
        assert_eq!(screen.handle(AppAction::Input('y'), now()), vec![Command::MarkLunas(1)]);
        assert_eq!(screen.marking, Some(1));
        let commands = screen.on_lunas_marked(Ok(()));
        assert!(screen.marking.is_none());
        assert!(commands.iter().any(|c| matches!(c, Command::LoadTransfers { .. })));

        screen.handle(AppAction::Down, now());
        let commands = screen.handle(AppAction::Input('l'), now());
        assert!(matches!(&commands[..], [Command::Notify(ToastLevel::Info, _)]));
    }

    #[test]
    fn period_change_reloads_only_the_chart() {
        let mut screen = screen(Role::Kasir);
        let commands = screen.handle(AppAction::Input('g'), now());
        assert_eq!(screen.period, Period::Mingguan);
        let [Command::LoadChart { descriptor, .. }] = &commands[..] else {
            panic!("expected a chart reload, got {commands:?}");
        };
        assert_eq!(descriptor.path, "/transfer/grafik/mingguan");
    }

    #[test]
    fn receipt_and_report_are_exported() {
        let mut screen = screen(Role::Kasir);
        let (seq, _) = transfers_seq(&screen.reload());
        screen.on_transfers(seq, None, Ok(ListResponse::Bare(vec![transfer(8, "2024-05-01", None)])));

        let commands = screen.handle(AppAction::Input('s'), now());
        assert!(matches!(
            &commands[..],
            [Command::Export { file_name, .. }] if file_name == "struk-transfer-8.txt"
        ));

        let commands = screen.handle(AppAction::Input('x'), now());
        assert!(matches!(
            &commands[..],
            [Command::Export { file_name, .. }] if file_name == "laporan-transfer-Harian-2024-05-02.csv"
        ));
    }
}
