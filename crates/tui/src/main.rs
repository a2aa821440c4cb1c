mod app;
mod client;
mod config;
mod error;
mod ui;

use std::{fs::OpenOptions, sync::Mutex};

use tracing_subscriber::EnvFilter;

use crate::{
    config::AppConfig,
    error::{AppError, Result},
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    init_logging(&config)?;

    let mut app = app::App::new(config)?;
    let result = app.run().await;
    if let Err(err) = &result {
        tracing::error!(error = %err, "exiting");
    }
    result
}

/// The terminal belongs to the UI, so logs go to a file.
fn init_logging(config: &AppConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "kasir_tui={level},engine={level}",
            level = config.log_level
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| AppError::Logging(err.to_string()))
}
