//! Request descriptors for every list the dashboard reads.
//!
//! A descriptor is a path plus an ordered parameter map. Parameters whose value
//! is absent (no cashier picked, blank search, non-owner date) are left out
//! entirely instead of being sent empty.

use std::{collections::BTreeMap, fmt};

use api_types::grafik::Period;
use chrono::NaiveDate;

use crate::{Actor, Pagination};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub path: String,
    pub params: BTreeMap<&'static str, String>,
}

impl RequestDescriptor {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: BTreeMap::new(),
        }
    }

    fn param(mut self, key: &'static str, value: impl ToString) -> Self {
        self.params.insert(key, value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Key/value pairs in a stable order, ready for `RequestBuilder::query`.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        self.params
            .iter()
            .map(|(key, value)| (*key, value.as_str()))
            .collect()
    }
}

impl fmt::Display for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        for (i, (key, value)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{key}={value}")?;
        }
        Ok(())
    }
}

/// Cashier picker value; `All` is never sent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CashierFilter {
    #[default]
    All,
    Cashier(i64),
}

/// Filters of the transfer list as the user set them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransferFilters {
    pub cashier: CashierFilter,
    /// Owner-only single-day window.
    pub date: Option<NaiveDate>,
    pub search: String,
}

impl TransferFilters {
    /// `GET /transfer` for the current filters and page.
    ///
    /// Non-owners never send a cashier or date: the backend scopes their
    /// results to their own id.
    pub fn build(&self, actor: &Actor, pagination: &Pagination) -> RequestDescriptor {
        let mut descriptor = RequestDescriptor::new("/transfer");

        if actor.is_owner() {
            if let CashierFilter::Cashier(id) = self.cashier {
                descriptor = descriptor.param("cashier_id", id);
            }
            if let Some(date) = self.date {
                let date = date.format("%Y-%m-%d").to_string();
                descriptor = descriptor
                    .param("startDate", &date)
                    .param("endDate", date);
            }
        }

        if !self.search.trim().is_empty() {
            descriptor = descriptor.param("search", &self.search);
        }

        descriptor
            .param("page", pagination.page())
            .param("limit", pagination.limit())
    }

    /// Date the owner re-filter compares against, if it applies.
    pub fn owner_date(&self, actor: &Actor) -> Option<NaiveDate> {
        if actor.is_owner() { self.date } else { None }
    }
}

/// `GET /transfer-favorit`, optionally searched.
pub fn favorites(search: &str) -> RequestDescriptor {
    let descriptor = RequestDescriptor::new("/transfer-favorit");
    if search.trim().is_empty() {
        descriptor
    } else {
        descriptor.param("search", search)
    }
}

/// `GET /transfer/grafik/:period`.
pub fn chart(period: Period) -> RequestDescriptor {
    RequestDescriptor::new(format!("/transfer/grafik/{}", period.as_str()))
}

pub fn balances() -> RequestDescriptor {
    RequestDescriptor::new("/modal")
}

pub fn balance_history() -> RequestDescriptor {
    RequestDescriptor::new("/modal/history")
}

pub fn users() -> RequestDescriptor {
    RequestDescriptor::new("/user")
}
