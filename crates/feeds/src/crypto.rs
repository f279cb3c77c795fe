//! BTC and ETH price fetching.
//!
//! Both prices come from a single CoinGecko `simple/price` request. A failure
//! anywhere in that request marks both prices unavailable.

use crate::error::FeedError;
use crate::http::get_json;
use rates_core::Quote;
use tracing::{debug, warn};

/// Asset IDs requested from CoinGecko.
const BITCOIN: &str = "bitcoin";
const ETHEREUM: &str = "ethereum";
const VS_CURRENCY: &str = "usd";

/// Fetcher for CoinGecko simple prices.
#[derive(Debug, Clone)]
pub struct CoinGeckoFetcher {
    client: reqwest::Client,
    url: String,
}

impl CoinGeckoFetcher {
    pub const DEFAULT_URL: &'static str = "https://api.coingecko.com/api/v3/simple/price";

    pub fn new(client: reqwest::Client) -> Self {
        Self::with_url(client, Self::DEFAULT_URL)
    }

    pub fn with_url(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Fetch (BTC, ETH) prices in USD.
    pub async fn fetch_prices(&self) -> Result<(f64, f64), FeedError> {
        debug!("Fetching BTC/ETH prices from {}", self.url);
        let ids = format!("{},{}", BITCOIN, ETHEREUM);
        let request = self
            .client
            .get(&self.url)
            .query(&[("ids", ids.as_str()), ("vs_currencies", VS_CURRENCY)]);

        let json = get_json(request).await?;
        parse_prices(&json)
    }

    /// Fetch prices formatted for the report. Any failure yields
    /// `Unavailable` for both assets.
    pub async fn fetch_crypto_prices(&self) -> (Quote, Quote) {
        match self.fetch_prices().await {
            Ok((btc, eth)) => {
                debug!("BTC/USD: {:.2}, ETH/USD: {:.2}", btc, eth);
                (Quote::grouped(btc), Quote::grouped(eth))
            }
            Err(e) => {
                warn!("Failed to fetch crypto prices: {}", e);
                (Quote::Unavailable, Quote::Unavailable)
            }
        }
    }
}

/// Extract `bitcoin.usd` and `ethereum.usd`.
pub fn parse_prices(json: &serde_json::Value) -> Result<(f64, f64), FeedError> {
    let btc = json[BITCOIN][VS_CURRENCY]
        .as_f64()
        .ok_or(FeedError::MissingField("bitcoin.usd"))?;
    let eth = json[ETHEREUM][VS_CURRENCY]
        .as_f64()
        .ok_or(FeedError::MissingField("ethereum.usd"))?;
    Ok((btc, eth))
}
