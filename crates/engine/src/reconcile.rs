//! Post-processing of list responses before they reach a store.

use api_types::{
    pagination::{ListResponse, PageInfo},
    transfer::TransferRecord,
    user::{Role, UserView},
};
use chrono::NaiveDate;

use crate::{Pagination, dates};

/// How a list response moves the pagination state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageUpdate {
    Server(PageInfo),
    /// No envelope: everything on one page.
    Bare(usize),
}

impl PageUpdate {
    pub fn apply(self, pagination: &mut Pagination) {
        match self {
            Self::Server(info) => pagination.apply_server(info),
            Self::Bare(len) => pagination.apply_bare(len),
        }
    }
}

/// Splits a list response into its rows and its pagination effect.
pub fn split<T>(response: ListResponse<T>) -> (Vec<T>, PageUpdate) {
    match response {
        ListResponse::Paged { data, pagination } => (data, PageUpdate::Server(pagination)),
        ListResponse::Bare(data) => {
            let len = data.len();
            (data, PageUpdate::Bare(len))
        }
    }
}

/// Rows of a transfer list response, ready to replace the store.
///
/// `owner_date` is set when the actor is the owner with a date filter: the
/// backend may not honor `startDate`/`endDate`, so rows from any other day are
/// dropped here as well.
pub fn transfers(
    response: ListResponse<TransferRecord>,
    owner_date: Option<NaiveDate>,
) -> (Vec<TransferRecord>, PageUpdate) {
    let (rows, update) = split(response);
    let Some(date) = owner_date else {
        return (rows, update);
    };

    let rows = owner_date_filter(rows, date);
    let update = match update {
        PageUpdate::Bare(_) => PageUpdate::Bare(rows.len()),
        server => server,
    };
    (rows, update)
}

/// Keeps the rows whose `tanggal` falls on `date` (ISO date portion equality).
pub fn owner_date_filter(rows: Vec<TransferRecord>, date: NaiveDate) -> Vec<TransferRecord> {
    rows.into_iter()
        .filter(|row| dates::iso_date(&row.tanggal) == Some(date))
        .collect()
}

/// The cashier picker only offers `kasir` accounts.
pub fn cashiers(users: Vec<UserView>) -> Vec<UserView> {
    users
        .into_iter()
        .filter(|user| user.role == Role::Kasir)
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn transfer(id: i64, tanggal: &str) -> TransferRecord {
        TransferRecord {
            id,
            tanggal: tanggal.to_string(),
            bank_tujuan: "BCA".to_string(),
            nomor_rekening: "123".to_string(),
            nama_pemilik: "Andi".to_string(),
            nominal: Decimal::new(100_000, 0),
            biaya: Decimal::new(5_000, 0),
            keterangan: None,
            status: None,
            cashier_id: Some(7),
        }
    }

    #[test]
    fn owner_refilter_drops_other_days() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let response = ListResponse::Paged {
            data: vec![
                transfer(1, "2024-05-01T03:00:00.000Z"),
                transfer(2, "2024-04-30"),
                transfer(3, "2024-05-01"),
            ],
            pagination: PageInfo {
                page: 1,
                limit: 10,
                total: 3,
                total_pages: 1,
            },
        };

        let (rows, update) = transfers(response, Some(day));
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 3]);
        assert!(matches!(update, PageUpdate::Server(info) if info.total == 3));
    }

    #[test]
    fn bare_rows_count_after_refilter() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let response = ListResponse::Bare(vec![transfer(1, "2024-05-01"), transfer(2, "2024-05-02")]);

        let (rows, update) = transfers(response, Some(day));
        assert_eq!(rows.len(), 1);
        assert_eq!(update, PageUpdate::Bare(1));

        let response = ListResponse::Bare(vec![transfer(1, "2024-05-01"), transfer(2, "2024-05-02")]);
        let (rows, update) = transfers(response, None);
        assert_eq!(rows.len(), 2);
        assert_eq!(update, PageUpdate::Bare(2));
    }

    #[test]
    fn only_kasir_accounts_are_cashiers() {
        let users = vec![
            UserView {
                id: 1,
                username: "boss".to_string(),
                role: Role::Owner,
            },
            UserView {
                id: 7,
                username: "sari".to_string(),
                role: Role::Kasir,
            },
        ];
        let cashiers = cashiers(users);
        assert_eq!(cashiers.len(), 1);
        assert_eq!(cashiers[0].id, 7);
    }
}
