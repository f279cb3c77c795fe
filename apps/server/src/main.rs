//! Daily Rates Bot
//!
//! Sends the USD/RUB exchange rate and BTC/ETH prices to a Telegram chat once a day.

mod config;
mod scheduler;
mod setup;

use clap::Parser;
use config::{credentials_from_env, AppConfig, Args};
use rates_alerts::{ConfigStore, ReportTask, TelegramSender};
use rates_core::Credentials;
use rates_feeds::{build_client, HttpRateSource};
use scheduler::{Scheduler, SystemClock};
use setup::SetupError;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn init_logging(level: &str) {
    // RUST_LOG, when set, wins over --log-level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(parse_level(level).to_string()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Environment, then the config file, then interactive setup on the given console.
fn resolve_credentials<R, W>(
    config: &AppConfig,
    store: &ConfigStore,
    env: Option<Credentials>,
    input: &mut R,
    output: &mut W,
) -> Result<Credentials, SetupError>
where
    R: BufRead,
    W: Write,
{
    if config.reconfigure {
        info!("Reconfiguration requested");
    } else {
        if let Some(credentials) = env {
            info!("Using credentials from environment");
            return Ok(credentials);
        }
        if let Some(credentials) = store.load() {
            info!("Config loaded from {:?}", store.path());
            return Ok(credentials);
        }
        warn!("Config file {:?} not found or invalid", store.path());
    }

    setup::run_setup(input, output, store)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let config = AppConfig::from(Args::parse());

    init_logging(&config.log_level);

    info!("🚀 Daily rates bot starting...");
    info!("  Config: {:?}", config.config_path);
    info!("  Report time: {}", config.schedule);

    let store = config.store();
    let resolved = resolve_credentials(
        &config,
        &store,
        credentials_from_env(),
        &mut io::stdin().lock(),
        &mut io::stdout().lock(),
    );
    let credentials = match resolved {
        Ok(credentials) => credentials,
        Err(e) => {
            error!("Setup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("  Chat: {}...", credentials.masked_chat_id());

    let client = match build_client(config.http_timeout) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let task = ReportTask::new(
        HttpRateSource::new(client.clone()),
        TelegramSender::new(client, credentials.bot_token()),
        &credentials,
    );

    if config.once {
        let outcome = task.run().await;
        return if outcome.delivered {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    info!("Bot running. Waiting for the scheduled time ({})...", config.schedule);
    let mut scheduler = Scheduler::new(config.schedule, SystemClock, task);

    info!("Press Ctrl+C to stop...");
    scheduler
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;

    warn!("Shutdown signal received");
    info!("👋 Daily rates bot stopped");
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use rates_alerts::{MessageSender, TelegramError};
    use rates_core::Quote;
    use rates_feeds::RateSource;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    struct FixedSource;

    #[async_trait]
    impl RateSource for FixedSource {
        async fn fiat_rate(&self) -> Quote {
            Quote::fixed(90.12)
        }

        async fn crypto_prices(&self) -> (Quote, Quote) {
            (Quote::grouped(65000.0), Quote::grouped(3200.5))
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSender(Arc<Mutex<Vec<(String, String)>>>);

    #[async_trait]
    impl MessageSender for RecordingSender {
        async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), TelegramError> {
            self.0
                .lock()
                .unwrap()
                .push((chat_id.to_string(), text.to_string()));
            Ok(())
        }
    }

    fn resolve(
        config: &AppConfig,
        store: &ConfigStore,
        env: Option<Credentials>,
        input: &str,
    ) -> (Result<Credentials, SetupError>, String) {
        let mut input = Cursor::new(input.as_bytes().to_vec());
        let mut output = Vec::new();
        let result = resolve_credentials(config, store, env, &mut input, &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("WARN"), Level::WARN);
        assert_eq!(parse_level("unknown"), Level::INFO);
    }

    #[tokio::test]
    async fn test_stored_config_drives_report_without_prompting() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        store.save(&Credentials::new("T", "C").unwrap()).unwrap();

        let (result, output) = resolve(&AppConfig::default(), &store, None, "");
        let credentials = result.unwrap();
        assert_eq!(output, "");

        let sender = RecordingSender::default();
        let task = ReportTask::new(FixedSource, sender.clone(), &credentials);
        assert!(task.run().await.delivered);

        let sent = sender.0.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (chat_id, text) = &sent[0];
        assert_eq!(chat_id, "C");
        assert!(text.contains("90.12"));
        assert!(text.contains("65,000.00"));
        assert!(text.contains("3,200.50"));
    }

    #[test]
    fn test_environment_takes_precedence_over_file() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        store.save(&Credentials::new("T", "C").unwrap()).unwrap();

        let env = Credentials::new("ENV_T", "ENV_C").ok();
        let (result, _) = resolve(&AppConfig::default(), &store, env.clone(), "");

        assert_eq!(result.ok(), env);
    }

    #[test]
    fn test_missing_config_with_empty_chat_id_fails_setup() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));

        let (result, output) = resolve(&AppConfig::default(), &store, None, "123:ABC\n\n");

        assert!(matches!(result, Err(SetupError::EmptyInput)));
        assert!(output.contains("Enter your Telegram chat ID: "));
        assert!(output.contains("cannot be empty"));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_reconfigure_prompts_despite_stored_config() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        store.save(&Credentials::new("T", "C").unwrap()).unwrap();

        let config = AppConfig {
            reconfigure: true,
            ..Default::default()
        };
        let env = Credentials::new("ENV_T", "ENV_C").ok();
        let (result, output) = resolve(&config, &store, env, "NEW_T\nNEW_C\n");

        let expected = Credentials::new("NEW_T", "NEW_C").unwrap();
        assert_eq!(result.unwrap(), expected);
        assert!(output.contains("Settings saved"));
        assert_eq!(store.load(), Some(expected));
    }
}
