use axum::http::StatusCode;
use std::sync::Arc;
use strikelab::api::{self, AppState};
use strikelab::datasource::MockDataSource;
use strikelab::Config;
use tower::util::ServiceExt;

fn test_app() -> axum::Router {
    let state = AppState::new(Config::default(), Arc::new(MockDataSource::new()));
    api::create_router(state)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_levels_conversion_scenario() {
    let (status, body) = get(
        test_app(),
        "/v1/levels?entry=5800&stop=5780&target=5840&direction=long",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rewardRiskRatio"], 2.0);

    let levels = body["levels"].as_array().unwrap();
    assert_eq!(levels.len(), 4);

    let spy = levels
        .iter()
        .find(|l| l["instrument"] == "SPY")
        .expect("SPY row");
    assert_eq!(spy["entry"], 580.0);
    assert_eq!(spy["stop"], 578.0);
    assert_eq!(spy["target"], 584.0);
    assert_eq!(spy["conversionFactor"], 0.1);
    assert!(spy.get("fairValue").is_none());

    let spx = levels
        .iter()
        .find(|l| l["instrument"] == "SPX")
        .expect("SPX row");
    assert_eq!(spx["entry"], 5800.0);

    let es = levels
        .iter()
        .find(|l| l["instrument"] == "ES")
        .expect("ES row");
    let fair_value = es["fairValue"].as_f64().expect("ES fair value");
    assert!(fair_value > 0.0);
    assert!((es["entry"].as_f64().unwrap() - (5800.0 + fair_value)).abs() < 1e-9);
    assert_eq!(es["contractMultiplier"], 50.0);
}

#[tokio::test]
async fn test_levels_short_direction() {
    let (status, body) = get(
        test_app(),
        "/v1/levels?entry=5800&stop=5820&target=5760&direction=short",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["direction"], "short");
}

#[tokio::test]
async fn test_levels_invalid_ordering_rejected() {
    // Stop above entry on a long setup.
    let (status, body) = get(
        test_app(),
        "/v1/levels?entry=5800&stop=5810&target=5840&direction=long",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("stop loss"));
}

#[tokio::test]
async fn test_health_endpoints() {
    let (status, body) = get(test_app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, _) = get(test_app(), "/ready").await;
    assert_eq!(status, StatusCode::OK);
}
