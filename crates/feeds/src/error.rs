//! Error types for rate fetching.

use thiserror::Error;

/// Errors that can occur while fetching a rate.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Request failed: {0}")]
    ConnectionFailed(String),

    #[error("HTTP {0}")]
    HttpStatus(u16),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Field not found in response: {0}")]
    MissingField(&'static str),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FeedError::ParseError(err.to_string())
        } else {
            FeedError::ConnectionFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::ParseError(err.to_string())
    }
}
