//! Telegram credentials used to deliver the daily report.

use crate::CoreError;
use serde::{Deserialize, Deserializer, Serialize};

/// Bot token and target chat.
///
/// Serialized with the same keys the environment overrides use, so a config file
/// and a `.env` file look alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Telegram bot token
    #[serde(rename = "TELEGRAM_BOT_TOKEN")]
    bot_token: String,
    /// Telegram chat ID to send reports to
    #[serde(rename = "TELEGRAM_CHAT_ID", deserialize_with = "chat_id_from_json")]
    chat_id: String,
}

/// Hand-edited files may store the chat ID as a JSON number.
fn chat_id_from_json<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ChatId {
        Text(String),
        Number(i64),
    }

    Ok(match ChatId::deserialize(deserializer)? {
        ChatId::Text(text) => text,
        ChatId::Number(number) => number.to_string(),
    })
}

impl Credentials {
    /// Build credentials from raw input. Both values are trimmed and must be non-empty.
    pub fn new(bot_token: impl AsRef<str>, chat_id: impl AsRef<str>) -> Result<Self, CoreError> {
        let bot_token = bot_token.as_ref().trim();
        let chat_id = chat_id.as_ref().trim();

        if bot_token.is_empty() {
            return Err(CoreError::EmptyToken);
        }
        if chat_id.is_empty() {
            return Err(CoreError::EmptyChatId);
        }

        Ok(Self {
            bot_token: bot_token.to_string(),
            chat_id: chat_id.to_string(),
        })
    }

    /// Build credentials from optional values, e.g. environment variables.
    /// Returns None unless both are present and non-blank.
    pub fn from_parts(bot_token: Option<String>, chat_id: Option<String>) -> Option<Self> {
        Self::new(bot_token?, chat_id?).ok()
    }

    /// Re-check the invariant after deserialization.
    pub fn validated(self) -> Option<Self> {
        Self::new(&self.bot_token, &self.chat_id).ok()
    }

    pub fn bot_token(&self) -> &str {
        &self.bot_token
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    /// Chat ID shortened for log output.
    pub fn masked_chat_id(&self) -> &str {
        let end = self
            .chat_id
            .char_indices()
            .nth(6)
            .map(|(i, _)| i)
            .unwrap_or(self.chat_id.len());
        &self.chat_id[..end]
    }
}
