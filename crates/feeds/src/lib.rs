//! Rate fetchers for the daily report.
//!
//! This crate provides:
//! - USD/RUB rate from the Central Bank of Russia daily feed
//! - BTC/USD and ETH/USD prices from CoinGecko
//! - A `RateSource` seam so the report task can run against fakes

pub mod crypto;
pub mod error;
pub mod fiat;
pub mod http;
pub mod source;

pub use crypto::CoinGeckoFetcher;
pub use error::FeedError;
pub use fiat::CbrRateFetcher;
pub use http::build_client;
pub use source::{HttpRateSource, RateSource};

/// Local HTTP server helpers for tests in this and dependent crates.
#[cfg(any(test, feature = "test-util"))]
pub mod test_server {
    use axum::Router;
    use std::net::SocketAddr;

    /// Serve `router` on an ephemeral local port.
    pub async fn serve(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }
}
