use std::path::PathBuf;
use clap::Args;
use tracing_subscriber::EnvFilter;
use crate::relay::{DEFAULT_API_BASE, DEFAULT_OPENER};
use crate::settings::SettingsStore;

const DEFAULT_LOG_FILTER: &str = "piketers=info,actix_web=info";

/// Runtime configuration shared by every command
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// Settings file (roster, bot token, chat id)
    #[arg(long, env = "PIKETERS_SETTINGS", global = true)]
    pub settings: Option<PathBuf>,

    /// Telegram Bot API base URL
    #[arg(long, env = "PIKETERS_TELEGRAM_API", default_value = DEFAULT_API_BASE, global = true)]
    pub telegram_api: String,

    /// Program used to open the WhatsApp share link
    #[arg(long, env = "PIKETERS_SHARE_OPENER", default_value = DEFAULT_OPENER, global = true)]
    pub share_opener: String,
}

impl AppConfig {
    pub fn settings_path(&self) -> PathBuf {
        self.settings.clone().unwrap_or_else(SettingsStore::default_path)
    }
}

/// Installs the global tracing subscriber; `RUST_LOG` overrides the default filter
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .init();
}
