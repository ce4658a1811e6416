//! HTTP API for the sizer daemon.
//!
//! Provides REST endpoints for:
//! - Health check
//! - Supported coins
//! - Stateless calculation
//! - Calculator session (read, edit fields, replace)
//! - Loading a spot price bracket into the session

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use sizer_connectors::{FeedError, PriceFeed};
use sizer_domain::{
    parse_field_value, CalculatorInputs, CalculatorResults, Coin, DomainError, InputField,
    PriceBracket, SpotQuote,
};
use sizer_engine::calculate_position_size;

use crate::error::{DaemonError, DaemonResult};
use crate::session::CalculatorSession;

// =============================================================================
// API State
// =============================================================================

/// Shared state for API handlers.
pub struct ApiState<F: PriceFeed + 'static> {
    pub session: Arc<RwLock<CalculatorSession>>,
    pub feed: Arc<F>,
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// A supported coin.
#[derive(Debug, Serialize, Deserialize)]
pub struct CoinSummary {
    pub id: String,
    pub symbol: String,
}

/// Inputs together with their results.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub inputs: CalculatorInputs,
    pub results: CalculatorResults,
}

/// Spot quote with its default bracket.
#[derive(Debug, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub quote: SpotQuote,
    pub bracket: PriceBracket,
}

/// Spot quote applied to the session.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionQuoteResponse {
    pub quote: SpotQuote,
    pub inputs: CalculatorInputs,
    pub results: CalculatorResults,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

// =============================================================================
// Router
// =============================================================================

/// Create the API router.
pub fn create_router<F>(state: Arc<ApiState<F>>) -> Router
where
    F: PriceFeed + 'static,
{
    Router::new()
        .route("/health", get(health_handler))
        .route("/coins", get(coins_handler))
        .route("/calculate", post(calculate_handler))
        .route(
            "/session",
            get(get_session_handler::<F>)
                .patch(patch_session_handler::<F>)
                .put(put_session_handler::<F>),
        )
        .route("/session/quote/:coin", post(session_quote_handler::<F>))
        .route("/quote/:coin", get(quote_handler::<F>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// List supported coins.
async fn coins_handler() -> Json<Vec<CoinSummary>> {
    Json(
        Coin::ALL
            .iter()
            .map(|coin| CoinSummary {
                id: coin.feed_id().to_string(),
                symbol: coin.ticker().to_string(),
            })
            .collect(),
    )
}

/// Calculate results for the posted inputs without touching the session.
async fn calculate_handler(Json(inputs): Json<CalculatorInputs>) -> Json<CalculatorResults> {
    Json(calculate_position_size(&inputs))
}

/// Get the session inputs and results.
async fn get_session_handler<F>(State(state): State<Arc<ApiState<F>>>) -> Json<SessionResponse>
where
    F: PriceFeed + 'static,
{
    let session = state.session.read().await;
    Json(session_response(&session))
}

/// Edit one or more session fields.
///
/// Body maps field names to values, e.g. `{"entryPrice": "101.5"}`. Values
/// are parsed leniently: text that is not a number counts as zero.
async fn patch_session_handler<F>(
    State(state): State<Arc<ApiState<F>>>,
    Json(body): Json<Map<String, Value>>,
) -> Result<Json<SessionResponse>, ApiError>
where
    F: PriceFeed + 'static,
{
    let updates = parse_field_updates(&body).map_err(to_error_response)?;

    let mut session = state.session.write().await;
    session.update_fields(updates);

    Ok(Json(session_response(&session)))
}

/// Replace all session inputs.
async fn put_session_handler<F>(
    State(state): State<Arc<ApiState<F>>>,
    Json(inputs): Json<CalculatorInputs>,
) -> Json<SessionResponse>
where
    F: PriceFeed + 'static,
{
    let mut session = state.session.write().await;
    session.reset(inputs);
    Json(session_response(&session))
}

/// Fetch a spot price and load its bracket into the session.
///
/// The session is left untouched if the fetch fails.
async fn session_quote_handler<F>(
    State(state): State<Arc<ApiState<F>>>,
    Path(coin): Path<String>,
) -> Result<Json<SessionQuoteResponse>, ApiError>
where
    F: PriceFeed + 'static,
{
    let coin = Coin::from_str(&coin).map_err(|e| to_error_response(e.into()))?;

    // Fetch outside the session lock
    let quote = fetch_quote(state.feed.as_ref(), coin).await.map_err(to_error_response)?;

    let mut session = state.session.write().await;
    session.apply_quote(&quote).map_err(|e| to_error_response(unusable_quote(e)))?;
    info!(coin = %coin, price = %quote.price, "Spot price loaded into session");

    Ok(Json(SessionQuoteResponse {
        quote,
        inputs: *session.inputs(),
        results: *session.results(),
    }))
}

/// Fetch a spot price and its bracket.
async fn quote_handler<F>(
    State(state): State<Arc<ApiState<F>>>,
    Path(coin): Path<String>,
) -> Result<Json<QuoteResponse>, ApiError>
where
    F: PriceFeed + 'static,
{
    let coin = Coin::from_str(&coin).map_err(|e| to_error_response(e.into()))?;
    let quote = fetch_quote(state.feed.as_ref(), coin).await.map_err(to_error_response)?;

    let bracket = quote.bracket().map_err(|e| to_error_response(unusable_quote(e)))?;

    Ok(Json(QuoteResponse { quote, bracket }))
}

// =============================================================================
// Helpers
// =============================================================================

async fn fetch_quote<F: PriceFeed + ?Sized>(feed: &F, coin: Coin) -> DaemonResult<SpotQuote> {
    feed.spot_price(coin).await.map_err(|e| {
        warn!(coin = %coin, error = %e, "Spot price fetch failed");
        DaemonError::from(e)
    })
}

/// A quote the feed returned but that cannot be bracketed is a feed failure.
fn unusable_quote(error: DomainError) -> DaemonError {
    warn!(error = %error, "Spot price cannot be bracketed");
    DaemonError::Feed(FeedError::InvalidPrice(error.to_string()))
}

/// Turn a PATCH body into field updates.
fn parse_field_updates(body: &Map<String, Value>) -> DaemonResult<Vec<(InputField, Decimal)>> {
    body.iter()
        .map(|(name, value)| {
            let field = InputField::from_str(name)?;
            let value = match value {
                Value::String(text) => parse_field_value(text),
                Value::Number(number) => parse_field_value(&number.to_string()),
                Value::Null => Decimal::ZERO,
                other => {
                    return Err(DaemonError::InvalidRequest(format!(
                        "Field {} must be a number or a string, got {}",
                        field, other
                    )))
                },
            };
            Ok((field, value))
        })
        .collect()
}

fn session_response(session: &CalculatorSession) -> SessionResponse {
    SessionResponse {
        inputs: *session.inputs(),
        results: *session.results(),
    }
}

fn to_error_response(error: DaemonError) -> ApiError {
    let status = match &error {
        DaemonError::Domain(_) | DaemonError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        DaemonError::Feed(_) => StatusCode::BAD_GATEWAY,
        DaemonError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

// =============================================================================
// Tests
// =============================================================================
