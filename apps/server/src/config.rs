//! Application configuration.

use clap::Parser;
use rates_alerts::ConfigStore;
use rates_core::{Credentials, ScheduleSpec};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variables that override the credentials file.
pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// Daily Rates Bot CLI
#[derive(Parser, Debug)]
#[command(name = "daily-rates")]
#[command(about = "Daily USD/RUB and crypto price digest for Telegram", long_about = None)]
pub struct Args {
    /// Credentials file path
    #[arg(short, long, default_value = ConfigStore::DEFAULT_PATH)]
    pub config: PathBuf,

    /// Daily report time, HH:MM in host local time
    #[arg(short, long, default_value = "09:00")]
    pub at: ScheduleSpec,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Send one report immediately and exit
    #[arg(long, default_value_t = false)]
    pub once: bool,

    /// Ask for credentials even if a valid config file exists
    #[arg(long, default_value_t = false)]
    pub reconfigure: bool,

    /// Per-request HTTP timeout in seconds (none by default)
    #[arg(long)]
    pub http_timeout_secs: Option<u64>,
}

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Where credentials are stored.
    pub config_path: PathBuf,
    /// Daily trigger time.
    pub schedule: ScheduleSpec,
    /// Logging level.
    pub log_level: String,
    /// Send once and exit instead of scheduling.
    pub once: bool,
    /// Skip stored and environment credentials.
    pub reconfigure: bool,
    /// HTTP request timeout.
    pub http_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(ConfigStore::DEFAULT_PATH),
            schedule: ScheduleSpec::default(),
            log_level: "info".to_string(),
            once: false,
            reconfigure: false,
            http_timeout: None,
        }
    }
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        Self {
            config_path: args.config,
            schedule: args.at,
            log_level: args.log_level,
            once: args.once,
            reconfigure: args.reconfigure,
            http_timeout: args.http_timeout_secs.map(Duration::from_secs),
        }
    }
}

impl AppConfig {
    pub fn store(&self) -> ConfigStore {
        ConfigStore::new(&self.config_path)
    }
}

/// Credentials from `TELEGRAM_BOT_TOKEN` / `TELEGRAM_CHAT_ID`, if both are set.
pub fn credentials_from_env() -> Option<Credentials> {
    credentials_from_lookup(|key| std::env::var(key).ok())
}

fn credentials_from_lookup<F>(lookup: F) -> Option<Credentials>
where
    F: Fn(&str) -> Option<String>,
{
    Credentials::from_parts(lookup(ENV_BOT_TOKEN), lookup(ENV_CHAT_ID))
}
