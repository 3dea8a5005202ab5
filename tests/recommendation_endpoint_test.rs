use axum::http::StatusCode;
use std::sync::Arc;
use strikelab::api::{self, AppState};
use strikelab::datasource::MockDataSource;
use strikelab::Config;
use tower::util::ServiceExt;

fn app_with(mock: MockDataSource) -> axum::Router {
    let state = AppState::new(Config::default(), Arc::new(mock));
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

const BASE: &str =
    "/v1/recommendation?instrument=SPY&direction=long&entry=5800&stop=5780&target=5840&dte=7&iv=0.2";

#[tokio::test]
async fn test_recommendation_happy_path() {
    let app = app_with(MockDataSource::new().with_spot("SPY", 580.0));
    let (status, body) = get(app, &format!("{}&riskAmount=2000", BASE)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], true);
    assert_eq!(body["priceSource"], "live");
    assert_eq!(body["currentPrice"], 580.0);

    let rec = &body["recommendation"];
    assert!(rec["contracts"].as_u64().unwrap() >= 1);
    assert!(rec["totalRisk"].as_f64().unwrap() <= 2000.0);
    assert!(rec["probability"].as_f64().unwrap() >= 0.25);
    assert!(rec["entryPremium"].as_f64().unwrap() > 0.0);
    assert_eq!(rec["optionType"], "call");
    assert_eq!(rec["id"].as_str().unwrap().len(), 8);

    let greeks = &body["greeks"];
    let delta = greeks["delta"].as_f64().unwrap();
    assert!(delta > 0.0 && delta < 1.0);
    assert!(greeks["theta"].as_f64().unwrap() < 0.0);

    let sizing = &body["sizing"];
    let budget = sizing["budgetContracts"].as_u64().unwrap();
    let kelly = sizing["kellyContracts"].as_u64().unwrap();
    assert!(kelly >= 1);
    assert!(kelly <= budget.max(1));
}

#[tokio::test]
async fn test_recommendation_unaffordable_budget_is_clean_not_found() {
    let app = app_with(MockDataSource::new().with_spot("SPY", 580.0));
    // $100 cannot buy a single contract on a 580 underlying.
    let (status, body) = get(app, &format!("{}&riskAmount=100", BASE)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], false);
    assert!(body.get("recommendation").is_none());
    assert!(body.get("greeks").is_none());
}

#[tokio::test]
async fn test_recommendation_manual_price_fallback() {
    // Provider has no quote; caller supplies the price.
    let app = app_with(MockDataSource::new());
    let (status, body) = get(
        app,
        &format!("{}&riskAmount=2000&currentPrice=579.5", BASE),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["priceSource"], "manual");
    assert_eq!(body["currentPrice"], 579.5);
}

#[tokio::test]
async fn test_recommendation_falls_back_to_converted_entry() {
    let app = app_with(MockDataSource::new());
    let (status, body) = get(app, &format!("{}&riskAmount=2000", BASE)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["priceSource"], "convertedEntry");
    assert_eq!(body["currentPrice"], 580.0);
}

#[tokio::test]
async fn test_recommendation_put_direction() {
    let app = app_with(MockDataSource::new().with_spot("SPY", 580.0));
    let uri = "/v1/recommendation?instrument=SPY&direction=short&entry=5800&stop=5820&target=5760&dte=7&iv=0.2&riskAmount=2000";
    let (status, body) = get(app, uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], true);
    assert_eq!(body["recommendation"]["optionType"], "put");
}

#[tokio::test]
async fn test_recommendation_invalid_risk_rejected() {
    let app = app_with(MockDataSource::new().with_spot("SPY", 580.0));
    let (status, body) = get(app, &format!("{}&riskAmount=-50", BASE)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("risk amount"));
}

#[tokio::test]
async fn test_recommendation_invalid_levels_rejected() {
    let app = app_with(MockDataSource::new().with_spot("SPY", 580.0));
    let uri = "/v1/recommendation?instrument=SPY&direction=long&entry=5800&stop=5810&target=5840&dte=7&iv=0.2&riskAmount=2000";
    let (status, _) = get(app, uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_market_snapshot() {
    let app = app_with(
        MockDataSource::new()
            .with_spot("^GSPC", 5800.0)
            .with_spot("SPY", 580.0)
            .with_spot("^VIX", 15.2),
    );
    let (status, body) = get(app, "/v1/market").await;
    assert_eq!(status, StatusCode::OK);
    let prices = &body["prices"];
    assert_eq!(prices["SPX"], 5800.0);
    assert_eq!(prices["SPY"], 580.0);
    assert_eq!(prices["VIX"], 15.2);
    // XSP derived from SPY when unquoted.
    assert_eq!(prices["XSP"], 5800.0);
}
