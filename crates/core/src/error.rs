//! Error types for core value construction.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Bot token must not be empty")]
    EmptyToken,

    #[error("Chat ID must not be empty")]
    EmptyChatId,

    #[error("Invalid time of day '{0}', expected HH:MM")]
    InvalidTime(String),
}
