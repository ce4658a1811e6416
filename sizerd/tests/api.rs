//! API tests driving the router in-process against the stub price feed.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tower::ServiceExt;

use sizer_connectors::StubPriceFeed;
use sizer_domain::{CalculatorInputs, Coin};
use sizerd::{create_router, ApiState, CalculatorSession};

struct Harness {
    router: Router,
    session: Arc<RwLock<CalculatorSession>>,
    feed: Arc<StubPriceFeed>,
}

fn harness() -> Harness {
    let session = Arc::new(RwLock::new(CalculatorSession::default()));
    let feed = Arc::new(StubPriceFeed::new(dec!(100)));
    let state = Arc::new(ApiState {
        session: session.clone(),
        feed: feed.clone(),
    });

    Harness {
        router: create_router(state),
        session,
        feed,
    }
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn health_reports_healthy() {
    let h = harness();
    let (status, body) = send(&h.router, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn coins_lists_every_supported_coin() {
    let h = harness();
    let (status, body) = send(&h.router, Method::GET, "/coins", None).await;

    assert_eq!(status, StatusCode::OK);
    let coins = body.as_array().unwrap();
    assert_eq!(coins.len(), Coin::ALL.len());
    assert_eq!(coins[0], json!({ "id": "bitcoin", "symbol": "BTC" }));
}

#[tokio::test]
async fn calculate_returns_fixed_scale_strings() {
    let h = harness();
    let (status, body) = send(
        &h.router,
        Method::POST,
        "/calculate",
        Some(json!({
            "accountBalance": 1000,
            "riskPercentage": 1,
            "entryPrice": 100,
            "stopLossPrice": 99,
            "takeProfitPrice": 102
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "riskAmount": "10.00",
            "positionSize": "10.000000",
            "positionValue": "1000.00",
            "stopLossDistance": "1.00",
            "rewardAmount": "20.00",
            "riskRewardRatio": "2.0"
        })
    );

    // Stateless: the session is untouched
    assert_eq!(h.session.read().await.inputs(), &CalculatorInputs::default());
}

#[tokio::test]
async fn calculate_accepts_string_values() {
    let h = harness();
    let (status, body) = send(
        &h.router,
        Method::POST,
        "/calculate",
        Some(json!({
            "accountBalance": "5000",
            "riskPercentage": "2",
            "entryPrice": "50",
            "stopLossPrice": "45"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["riskAmount"], "100.00");
    assert_eq!(body["positionSize"], "20.000000");
    assert_eq!(body["rewardAmount"], "0.00");
    assert_eq!(body["riskRewardRatio"], "0.0");
}

#[tokio::test]
async fn calculate_with_missing_prices_is_zero() {
    let h = harness();
    let (status, body) = send(&h.router, Method::POST, "/calculate", Some(json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    for field in [
        "riskAmount",
        "positionSize",
        "positionValue",
        "stopLossDistance",
        "rewardAmount",
        "riskRewardRatio",
    ] {
        assert_eq!(body[field], "0", "{field}");
    }
}

#[tokio::test]
async fn session_starts_with_defaults() {
    let h = harness();
    let (status, body) = send(&h.router, Method::GET, "/session", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inputs"]["accountBalance"], "1000");
    assert_eq!(body["inputs"]["riskPercentage"], "1");
    assert_eq!(body["inputs"]["entryPrice"], "0");
    assert_eq!(body["results"]["positionSize"], "0");
}

#[tokio::test]
async fn patch_session_recomputes() {
    let h = harness();

    let (status, body) = send(
        &h.router,
        Method::PATCH,
        "/session",
        Some(json!({ "entryPrice": "100", "stopLossPrice": 99 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"]["riskAmount"], "10.00");
    assert_eq!(body["results"]["positionSize"], "10.000000");
    assert_eq!(body["results"]["rewardAmount"], "0.00");

    let (_, body) = send(
        &h.router,
        Method::PATCH,
        "/session",
        Some(json!({ "takeProfitPrice": "102" })),
    )
    .await;
    assert_eq!(body["inputs"]["entryPrice"], "100");
    assert_eq!(body["results"]["rewardAmount"], "20.00");
    assert_eq!(body["results"]["riskRewardRatio"], "2.0");
}

#[tokio::test]
async fn patch_session_treats_garbage_as_zero() {
    let h = harness();
    send(
        &h.router,
        Method::PATCH,
        "/session",
        Some(json!({ "entryPrice": "100", "stopLossPrice": "99" })),
    )
    .await;

    let (status, body) = send(
        &h.router,
        Method::PATCH,
        "/session",
        Some(json!({ "entryPrice": "abc" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inputs"]["entryPrice"], "0");
    assert_eq!(body["results"]["positionSize"], "0");
}

#[tokio::test]
async fn patch_session_rejects_unknown_field() {
    let h = harness();
    let (status, body) = send(
        &h.router,
        Method::PATCH,
        "/session",
        Some(json!({ "entryPrice": "100", "leverage": 5 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("leverage"));
    // Nothing applied
    assert!(h.session.read().await.inputs().entry_price.is_zero());
}

#[tokio::test]
async fn put_session_replaces_inputs() {
    let h = harness();
    send(
        &h.router,
        Method::PATCH,
        "/session",
        Some(json!({ "takeProfitPrice": "500" })),
    )
    .await;

    let (status, body) = send(
        &h.router,
        Method::PUT,
        "/session",
        Some(json!({
            "accountBalance": 2000,
            "riskPercentage": 1,
            "entryPrice": 30000,
            "stopLossPrice": 29997
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inputs"]["takeProfitPrice"], "0");
    assert_eq!(body["results"]["riskAmount"], "20.00");
    assert_eq!(body["results"]["positionSize"], "6.666667");
    assert_eq!(body["results"]["positionValue"], "200000.00");
}

#[tokio::test]
async fn session_quote_loads_bracket() {
    let h = harness();
    h.feed.set_price(Coin::Bitcoin, dec!(64123.45));

    let (status, body) = send(&h.router, Method::POST, "/session/quote/btc", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quote"]["coin"], "bitcoin");
    assert_eq!(body["quote"]["price"], "64123.45");
    assert_eq!(body["inputs"]["accountBalance"], "1000");
    assert_eq!(body["inputs"]["entryPrice"], "64123.45");
    assert_eq!(body["inputs"]["stopLossPrice"], "63482.22");
    assert_eq!(body["inputs"]["takeProfitPrice"], "65405.92");
    assert_eq!(body["results"]["riskAmount"], "10.00");
    assert_eq!(body["results"]["riskRewardRatio"], "2.0");

    let session = h.session.read().await;
    assert_eq!(session.inputs().stop_loss_price, dec!(63482.22));
}

#[tokio::test]
async fn session_quote_failure_leaves_session_unchanged() {
    let h = harness();
    send(
        &h.router,
        Method::PATCH,
        "/session",
        Some(json!({ "entryPrice": "10", "stopLossPrice": "9" })),
    )
    .await;
    let before = *h.session.read().await.inputs();

    h.feed.set_fail_next(true);
    let (status, body) = send(&h.router, Method::POST, "/session/quote/eth", None).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().starts_with("Price feed error"));
    assert_eq!(*h.session.read().await.inputs(), before);
}

#[tokio::test]
async fn session_quote_unknown_coin() {
    let h = harness();
    let (status, body) = send(&h.router, Method::POST, "/session/quote/doge", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("doge"));
}

#[tokio::test]
async fn quote_does_not_touch_session() {
    let h = harness();
    h.feed.set_price(Coin::Solana, dec!(150));

    let (status, body) = send(&h.router, Method::GET, "/quote/SOL", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quote"]["coin"], "solana");
    assert_eq!(body["bracket"]["entryPrice"], "150");
    assert_eq!(body["bracket"]["stopLossPrice"], "148.50");
    assert_eq!(body["bracket"]["takeProfitPrice"], "153.00");
    assert_eq!(h.session.read().await.inputs(), &CalculatorInputs::default());
}

#[tokio::test]
async fn out_of_range_quote_is_bad_gateway() {
    let h = harness();
    h.feed.set_price(Coin::Bitcoin, dec!(79000000000000000000000000000));

    let (status, body) = send(&h.router, Method::GET, "/quote/btc", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("Invalid price"));

    let (status, _) = send(&h.router, Method::POST, "/session/quote/btc", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(h.session.read().await.inputs(), &CalculatorInputs::default());
}
