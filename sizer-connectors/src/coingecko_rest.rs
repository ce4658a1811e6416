//! CoinGecko REST API Client for spot prices
//!
//! Provides REST API integration for:
//! - Querying the current spot price of a coin (`/simple/price`)
//! - Checking API reachability (`/ping`)
//!
//! Only public endpoints are used; no API key is required.

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

use sizer_domain::{Coin, Price, SpotQuote};

use crate::error::{FeedError, FeedResult};
use crate::ports::PriceFeed;

// =============================================================================
// Constants
// =============================================================================

/// CoinGecko public API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Quote currency for spot prices
pub const DEFAULT_VS_CURRENCY: &str = "usd";

/// Request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// CoinGecko REST Client
// =============================================================================

/// CoinGecko REST API client.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    /// HTTP client
    client: Client,
    /// Base URL without trailing slash
    base_url: String,
    /// Quote currency (e.g., "usd")
    vs_currency: String,
    /// Per-request timeout
    request_timeout: Duration,
}

impl CoinGeckoClient {
    /// Create a client for the public CoinGecko API, quoting in USD.
    pub fn new() -> Self {
        Self::with_config(
            COINGECKO_API_URL,
            DEFAULT_VS_CURRENCY,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        )
    }

    /// Create a client with an explicit base URL, quote currency and timeout.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root (e.g., "https://api.coingecko.com/api/v3")
    /// * `vs_currency` - Quote currency (e.g., "usd")
    /// * `request_timeout` - Timeout applied to each request
    pub fn with_config(
        base_url: impl Into<String>,
        vs_currency: impl Into<String>,
        request_timeout: Duration,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            vs_currency: vs_currency.into().to_lowercase(),
            request_timeout,
        }
    }

    /// Get the base URL for API requests.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the quote currency.
    pub fn vs_currency(&self) -> &str {
        &self.vs_currency
    }

    /// Send a GET request to a public endpoint.
    async fn get_public(&self, endpoint: &str, params: Vec<(&str, String)>) -> FeedResult<String> {
        let url = if params.is_empty() {
            format!("{}{}", self.base_url, endpoint)
        } else {
            let query = params
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("&");
            format!("{}{}?{}", self.base_url, endpoint, query)
        };

        let response = timeout(self.request_timeout, self.client.get(&url).send())
            .await
            .map_err(|_| FeedError::Timeout)?
            .map_err(|e| FeedError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| FeedError::ParseError(e.to_string()))?;

        if !status.is_success() {
            if let Some(err) = parse_error_body(&body, status.as_u16()) {
                return Err(err);
            }
            return Err(FeedError::RequestFailed(format!("HTTP {}: {}", status, body)));
        }

        Ok(body)
    }

    /// Get the current spot price of a coin.
    ///
    /// # Endpoint
    ///
    /// `GET /simple/price?ids={coin}&vs_currencies={vs}`
    ///
    /// # Example
    ///
    /// ```ignore
    /// let quote = client.get_price(Coin::Bitcoin).await?;
    /// println!("BTC: {}", quote.price);
    /// ```
    pub async fn get_price(&self, coin: Coin) -> FeedResult<SpotQuote> {
        let params = vec![
            ("ids", coin.feed_id().to_string()),
            ("vs_currencies", self.vs_currency.clone()),
        ];

        let body = self.get_public("/simple/price", params).await?;
        let price = parse_simple_price(&body, coin, &self.vs_currency)?;
        let price = Price::new(price).map_err(|e| FeedError::InvalidPrice(e.to_string()))?;

        debug!(coin = %coin, price = %price, vs = %self.vs_currency, "Spot price fetched");

        Ok(SpotQuote::new(coin, price))
    }

    /// Ping the API to check connectivity.
    pub async fn ping(&self) -> FeedResult<()> {
        let body = self.get_public("/ping", vec![]).await?;

        serde_json::from_str::<PingResponse>(&body)
            .map(|_| ())
            .map_err(|_| FeedError::ParseError(format!("Unexpected ping response: {}", body)))
    }
}

impl Default for CoinGeckoClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceFeed for CoinGeckoClient {
    async fn spot_price(&self, coin: Coin) -> Result<SpotQuote, FeedError> {
        self.get_price(coin).await
    }

    async fn health_check(&self) -> Result<(), FeedError> {
        self.ping().await
    }
}

// =============================================================================
// Response parsing
// =============================================================================

/// Extract the price of `coin` in `vs_currency` from a `/simple/price` body.
///
/// The body has the shape `{"bitcoin": {"usd": 64000.12}}`.
fn parse_simple_price(body: &str, coin: Coin, vs_currency: &str) -> FeedResult<Decimal> {
    let prices: SimplePriceResponse =
        serde_json::from_str(body).map_err(|e| FeedError::ParseError(e.to_string()))?;

    prices
        .get(coin.feed_id())
        .and_then(|quotes| quotes.get(vs_currency))
        .copied()
        .ok_or_else(|| FeedError::PriceMissing(format!("{}/{}", coin.feed_id(), vs_currency)))
}

/// Map a non-success body to an `ApiError`, if it has a recognizable shape.
fn parse_error_body(body: &str, http_status: u16) -> Option<FeedError> {
    match serde_json::from_str::<CoinGeckoErrorResponse>(body).ok()? {
        CoinGeckoErrorResponse::Status { status } => Some(FeedError::ApiError {
            code: status.error_code,
            msg: status.error_message,
        }),
        CoinGeckoErrorResponse::Plain { error } => Some(FeedError::ApiError {
            code: i64::from(http_status),
            msg: error,
        }),
    }
}

// =============================================================================
// CoinGecko Types (from API responses)
// =============================================================================

/// `/simple/price` response: coin id → (currency → price).
type SimplePriceResponse = HashMap<String, HashMap<String, Decimal>>;

/// CoinGecko error response.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CoinGeckoErrorResponse {
    /// `{"status": {"error_code": 429, "error_message": "..."}}`
    Status { status: CoinGeckoErrorStatus },
    /// `{"error": "coin not found"}`
    Plain { error: String },
}

#[derive(Debug, Deserialize)]
struct CoinGeckoErrorStatus {
    error_code: i64,
    error_message: String,
}

/// `/ping` response.
#[derive(Debug, Deserialize)]
struct PingResponse {
    #[allow(dead_code)]
    gecko_says: String,
}

// =============================================================================
// Tests
// =============================================================================
