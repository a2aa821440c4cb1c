//! The module contains the errors the engine can throw.
//!
//! Apart from [`Report`], every variant is a client-side validation failure:
//! the action it guards is blocked locally and never reaches the network. The
//! `Display` text is the message shown to the user.
//!
//!  [`Report`]: EngineError::Report
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Nominal harus berupa angka yang valid")]
    InvalidNominal,
    #[error("Modal Kas tidak perlu diisi jika nominal 0")]
    ZeroModalKas,
    #[error("{0} wajib diisi")]
    MissingField(&'static str),
    #[error("Tanggal tidak valid: {0}")]
    InvalidDate(String),
    #[error("Tidak ada data yang sedang diedit")]
    NotEditing,
    #[error("Penyimpanan sedang berlangsung")]
    SaveInFlight,
    #[error("Report error: {0}")]
    Report(String),
}

impl From<csv::Error> for EngineError {
    fn from(err: csv::Error) -> Self {
        Self::Report(err.to_string())
    }
}
