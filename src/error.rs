use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::datasource::MarketDataError;
use crate::domain::LevelsError;
use crate::engine::EngineError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Upstream data error: {0}")]
    Upstream(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        // Every engine error is an out-of-domain input from the caller.
        AppError::BadRequest(err.to_string())
    }
}

impl From<LevelsError> for AppError {
    fn from(err: LevelsError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<MarketDataError> for AppError {
    fn from(err: MarketDataError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_maps_to_bad_request() {
        let app_err: AppError = EngineError::NonPositiveSpot(-1.0).into();
        assert!(matches!(app_err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_market_error_maps_to_upstream() {
        let app_err: AppError = MarketDataError::RateLimited.into();
        assert!(matches!(app_err, AppError::Upstream(_)));
    }
}
