pub mod modal;
pub mod transfer;
