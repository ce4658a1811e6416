//! Price feed port definition.
//!
//! The port is the only way the daemon reaches a price source.
//! Adapters implement it for specific services (CoinGecko, stub).

use async_trait::async_trait;

use sizer_domain::{Coin, SpotQuote};

use crate::error::FeedError;

/// Port for spot price lookups.
///
/// Implementations:
/// - `CoinGeckoClient` - public CoinGecko REST API
/// - `StubPriceFeed` - in-memory prices for testing
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Get the current spot price of a coin.
    ///
    /// # Returns
    ///
    /// A quote with a strictly positive price, or an error if the feed is
    /// unreachable or has no usable price.
    async fn spot_price(&self, coin: Coin) -> Result<SpotQuote, FeedError>;

    /// Check if the feed is reachable.
    async fn health_check(&self) -> Result<(), FeedError>;
}
