//! Sizer Price Feed Connectors
//!
//! Adapters for spot price sources.
//! Normalizes feed-specific responses to domain quotes.

#![warn(clippy::all)]

// Public modules
pub mod coingecko_rest;
pub mod error;
pub mod ports;
pub mod stub;

// Re-exports
pub use coingecko_rest::{CoinGeckoClient, COINGECKO_API_URL, DEFAULT_VS_CURRENCY, REQUEST_TIMEOUT_SECS};
pub use error::{FeedError, FeedResult};
pub use ports::PriceFeed;
pub use stub::StubPriceFeed;
