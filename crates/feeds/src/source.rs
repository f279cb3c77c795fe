//! Rate source abstraction used by the report task.

use crate::crypto::CoinGeckoFetcher;
use crate::fiat::CbrRateFetcher;
use async_trait::async_trait;
use rates_core::{Quote, RateSnapshot};

/// Provider of the three report values. Implementations never fail; a value
/// that cannot be obtained is returned as `Quote::Unavailable`.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// USD/RUB rate.
    async fn fiat_rate(&self) -> Quote;

    /// (BTC/USD, ETH/USD) prices.
    async fn crypto_prices(&self) -> (Quote, Quote);

    /// Collect all values, fiat first.
    async fn snapshot(&self) -> RateSnapshot {
        let usd_rub = self.fiat_rate().await;
        let (btc_usd, eth_usd) = self.crypto_prices().await;
        RateSnapshot::new(usd_rub, btc_usd, eth_usd)
    }
}

/// Live source backed by the public HTTP APIs.
#[derive(Debug, Clone)]
pub struct HttpRateSource {
    fiat: CbrRateFetcher,
    crypto: CoinGeckoFetcher,
}

impl HttpRateSource {
    /// Use the default endpoints with a shared client.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            fiat: CbrRateFetcher::new(client.clone()),
            crypto: CoinGeckoFetcher::new(client),
        }
    }

    pub fn from_fetchers(fiat: CbrRateFetcher, crypto: CoinGeckoFetcher) -> Self {
        Self { fiat, crypto }
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fiat_rate(&self) -> Quote {
        self.fiat.fetch_fiat_rate().await
    }

    async fn crypto_prices(&self) -> (Quote, Quote) {
        self.crypto.fetch_crypto_prices().await
    }
}
