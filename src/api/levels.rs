//! Index-to-instrument level conversion endpoint.

use crate::api::AppState;
use crate::domain::{InstrumentLevels, PriceLevels, TradeDirection};
use crate::error::AppError;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelsQuery {
    pub entry: f64,
    pub stop: f64,
    pub target: f64,
    pub direction: TradeDirection,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelsResponse {
    pub direction: TradeDirection,
    pub reward_risk_ratio: f64,
    pub levels: Vec<InstrumentLevels>,
}

pub async fn get_levels(
    Query(params): Query<LevelsQuery>,
    State(state): State<AppState>,
) -> Result<Json<LevelsResponse>, AppError> {
    let index = PriceLevels::new(params.entry, params.stop, params.target, params.direction)?;
    let levels = state.converter.convert(&index);

    Ok(Json(LevelsResponse {
        direction: params.direction,
        reward_risk_ratio: index.reward_risk_ratio(),
        levels,
    }))
}
