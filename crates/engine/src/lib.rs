//! Client-side core of the kasir dashboard.
//!
//! Everything in this crate is synchronous and free of I/O: it turns UI filters
//! into request descriptors, reconciles list responses into local state, drives
//! the single-row edit sessions and computes the totals shown on screen. The
//! binary crate executes the network calls and feeds the outcomes back in.
use api_types::user::Role;

pub use aggregates::{
    PeriodTotals, current_value, period_chart_totals, total_current_across_channels,
    total_deposit,
};
pub use channel::{Channel, visible_channels};
pub use edit::{EditSession, EditState, SaveRequest};
pub use error::EngineError;
pub use form::{FormField, TransferDraft};
pub use money::{format_rupiah, parse_nominal};
pub use pagination::Pagination;
pub use query::{CashierFilter, RequestDescriptor, TransferFilters};
pub use store::{Applied, RequestSeq, ResourceStore};

pub mod aggregates;
pub mod channel;
pub mod dates;
pub mod edit;
mod error;
pub mod form;
pub mod money;
pub mod pagination;
pub mod query;
pub mod receipt;
pub mod reconcile;
pub mod report;
pub mod store;

pub type ResultEngine<T> = Result<T, EngineError>;

/// The authenticated user every scoping decision is made for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: i64, username: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            role,
        }
    }

    pub fn is_owner(&self) -> bool {
        self.role.is_owner()
    }

    pub fn is_kasir(&self) -> bool {
        self.role == Role::Kasir
    }
}
