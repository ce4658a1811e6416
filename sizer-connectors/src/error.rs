//! Price feed error types.

use thiserror::Error;

/// Errors that can occur while fetching a spot price.
#[derive(Debug, Clone, Error)]
pub enum FeedError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    /// Feed returned an error status
    #[error("Price feed API error: {code} - {msg}")]
    ApiError { code: i64, msg: String },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Response had no price for the requested coin
    #[error("No price returned for {0}")]
    PriceMissing(String),

    /// Price was zero or negative
    #[error("Invalid price in response: {0}")]
    InvalidPrice(String),
}

/// Result type for price feed operations.
pub type FeedResult<T> = Result<T, FeedError>;
