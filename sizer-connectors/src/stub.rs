//! Stub price feed for testing.
//!
//! Serves configured prices without making network calls.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::RwLock;

use sizer_domain::{Coin, Price, SpotQuote};

use crate::error::FeedError;
use crate::ports::PriceFeed;

/// Stub price feed.
///
/// Returns a per-coin price if one was set, else the default price.
pub struct StubPriceFeed {
    /// Prices by coin
    prices: RwLock<HashMap<Coin, Decimal>>,
    /// Price for coins without an explicit entry
    default_price: Decimal,
    /// Whether the next call should fail
    fail_next: RwLock<bool>,
}

impl StubPriceFeed {
    /// Create a stub feed with a default price.
    pub fn new(default_price: Decimal) -> Self {
        Self {
            prices: RwLock::new(HashMap::new()),
            default_price,
            fail_next: RwLock::new(false),
        }
    }

    /// Set the price for a specific coin.
    pub fn set_price(&self, coin: Coin, price: Decimal) {
        let mut prices = self.prices.write().unwrap_or_else(|e| e.into_inner());
        prices.insert(coin, price);
    }

    /// Configure the next call to fail.
    pub fn set_fail_next(&self, fail: bool) {
        let mut fail_next = self.fail_next.write().unwrap_or_else(|e| e.into_inner());
        *fail_next = fail;
    }

    fn price_of(&self, coin: Coin) -> Decimal {
        let prices = self.prices.read().unwrap_or_else(|e| e.into_inner());
        prices.get(&coin).copied().unwrap_or(self.default_price)
    }

    /// Check if we should fail, resetting the switch.
    fn should_fail(&self) -> bool {
        let mut fail_next = self.fail_next.write().unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut *fail_next, false)
    }
}

#[async_trait]
impl PriceFeed for StubPriceFeed {
    async fn spot_price(&self, coin: Coin) -> Result<SpotQuote, FeedError> {
        if self.should_fail() {
            return Err(FeedError::RequestFailed("Simulated price fetch failure".to_string()));
        }

        let price = Price::new(self.price_of(coin)).map_err(|e| FeedError::InvalidPrice(e.to_string()))?;
        tracing::debug!(coin = %coin, price = %price, "Stub: spot price served");
        Ok(SpotQuote::new(coin, price))
    }

    async fn health_check(&self) -> Result<(), FeedError> {
        if self.should_fail() {
            return Err(FeedError::RequestFailed("Simulated health check failure".to_string()));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
