use std::time::Duration;

use api_types::user::Role;
use chrono_tz::Tz;
use clap::Parser;
use engine::Actor;
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/kasir_tui.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// Bearer token; only read from the config file or `KASIR_TUI_TOKEN`.
    pub token: Option<String>,
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub page_size: u64,
    pub search_debounce_ms: u64,
    pub timezone: String,
    pub export_dir: String,
    pub log_file: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            token: None,
            user_id: 0,
            username: String::new(),
            role: Role::Kasir,
            page_size: 10,
            search_debounce_ms: 500,
            timezone: "Asia/Jakarta".to_string(),
            export_dir: "exports".to_string(),
            log_file: "kasir_tui.log".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id, self.username.clone(), self.role)
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| AppError::Timezone(self.timezone.clone()))
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

#[derive(Debug, Parser)]
#[command(name = "kasir_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override the signed-in user id.
    #[arg(long)]
    user_id: Option<i64>,
    /// Override username (the token is never read from CLI).
    #[arg(long)]
    username: Option<String>,
    /// Override role (owner or kasir).
    #[arg(long)]
    role: Option<String>,
    /// Override timezone (IANA name).
    #[arg(long)]
    timezone: Option<String>,
    /// Override the directory receipts and reports are written to.
    #[arg(long)]
    export_dir: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("KASIR_TUI"));
    if let Some(role) = args.role {
        builder = builder.set_override("role", role.to_lowercase())?;
    }
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(user_id) = args.user_id {
        settings.user_id = user_id;
    }
    if let Some(username) = args.username {
        settings.username = username;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    if let Some(export_dir) = args.export_dir {
        settings.export_dir = export_dir;
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_a_local_kasir() {
        let config = AppConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.search_debounce(), Duration::from_millis(500));
        assert_eq!(config.tz().unwrap(), chrono_tz::Asia::Jakarta);
        assert!(config.actor().is_kasir());
    }

    #[test]
    fn file_values_override_defaults() {
        let settings: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "user_id = 3\nusername = \"bos\"\nrole = \"owner\"\npage_size = 25\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.page_size, 25);
        assert!(settings.actor().is_owner());
        assert_eq!(settings.base_url, "http://127.0.0.1:3000");
    }

    #[test]
    fn unknown_timezone_is_a_config_error() {
        let config = AppConfig {
            timezone: "Mars/Olympus".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(config.tz(), Err(AppError::Timezone(_))));
    }
}
