//! Shared HTTP helpers.

use crate::error::FeedError;
use std::time::Duration;

/// Build the HTTP client shared by all fetchers.
/// Without a timeout, requests wait as long as the connection allows.
pub fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client, FeedError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Send a request and decode the body as JSON, rejecting non-success statuses.
pub(crate) async fn get_json(
    request: reqwest::RequestBuilder,
) -> Result<serde_json::Value, FeedError> {
    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FeedError::HttpStatus(status.as_u16()));
    }

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
