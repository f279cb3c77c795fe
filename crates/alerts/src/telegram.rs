//! Telegram Bot API delivery.

use crate::report::PARSE_MODE;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("Telegram API request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Telegram API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// Something that can post a text message to a chat.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), TelegramError>;
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

/// Sends messages through `sendMessage` of the Telegram Bot API.
pub struct TelegramSender {
    http_client: reqwest::Client,
    api_base: String,
    bot_token: String,
}

impl TelegramSender {
    pub const API_BASE: &'static str = "https://api.telegram.org";

    pub fn new(http_client: reqwest::Client, bot_token: impl Into<String>) -> Self {
        Self::with_api_base(http_client, bot_token, Self::API_BASE)
    }

    pub fn with_api_base(
        http_client: reqwest::Client,
        bot_token: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            api_base: api_base.into(),
            bot_token: bot_token.into(),
        }
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.bot_token
        )
    }
}

impl std::fmt::Debug for TelegramSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramSender")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MessageSender for TelegramSender {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), TelegramError> {
        let payload = SendMessageRequest {
            chat_id,
            text,
            parse_mode: PARSE_MODE,
        };

        let response = self
            .http_client
            .post(self.send_message_url())
            .json(&payload)
            .send()
            .await
            // The URL embeds the bot token; keep it out of error messages.
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TelegramError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

/// Send `text` and log the outcome with a local timestamp.
/// Returns whether the message was accepted.
pub async fn deliver<S>(sender: &S, chat_id: &str, text: &str) -> bool
where
    S: MessageSender + ?Sized,
{
    let result = sender.send_message(chat_id, text).await;
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

    match result {
        Ok(()) => {
            info!("[{}] Report sent to Telegram", now);
            true
        }
        Err(e) => {
            error!("[{}] Failed to send report: {}", now, e);
            false
        }
    }
}
