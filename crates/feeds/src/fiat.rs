//! USD/RUB exchange rate fetching.
//!
//! Reads the official rate from the Central Bank of Russia daily JSON feed.

use crate::error::FeedError;
use crate::http::get_json;
use rates_core::Quote;
use tracing::{debug, warn};

/// Fetcher for the CBR daily rates feed.
#[derive(Debug, Clone)]
pub struct CbrRateFetcher {
    client: reqwest::Client,
    url: String,
}

impl CbrRateFetcher {
    pub const DEFAULT_URL: &'static str = "https://www.cbr-xml-daily.ru/daily_json.js";

    pub fn new(client: reqwest::Client) -> Self {
        Self::with_url(client, Self::DEFAULT_URL)
    }

    /// Point the fetcher at another endpoint serving the same document.
    pub fn with_url(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Fetch the current USD/RUB rate.
    pub async fn fetch_usd_rub(&self) -> Result<f64, FeedError> {
        debug!("Fetching USD/RUB rate from {}", self.url);
        let json = get_json(self.client.get(&self.url)).await?;
        parse_usd_rub(&json)
    }

    /// Fetch the rate formatted for the report, or `Unavailable` on any failure.
    pub async fn fetch_fiat_rate(&self) -> Quote {
        match self.fetch_usd_rub().await {
            Ok(rate) => {
                debug!("USD/RUB rate: {:.4}", rate);
                Quote::fixed(rate)
            }
            Err(e) => {
                warn!("Failed to fetch USD/RUB rate: {}", e);
                Quote::Unavailable
            }
        }
    }
}

/// Extract `Valute.USD.Value` from the daily feed document.
pub fn parse_usd_rub(json: &serde_json::Value) -> Result<f64, FeedError> {
    json["Valute"]["USD"]["Value"]
        .as_f64()
        .ok_or(FeedError::MissingField("Valute.USD.Value"))
}
