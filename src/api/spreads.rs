//! Vertical spread and butterfly construction endpoint.

use crate::api::setup::{resolve_setup, PriceSource, SetupQuery};
use crate::api::AppState;
use crate::domain::SpreadRecommendation;
use crate::error::AppError;
use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadResult {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spread: Option<SpreadRecommendation>,
}

impl From<Option<SpreadRecommendation>> for SpreadResult {
    fn from(spread: Option<SpreadRecommendation>) -> Self {
        SpreadResult {
            found: spread.is_some(),
            spread,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsResponse {
    pub price_source: PriceSource,
    pub current_price: f64,
    pub implied_vol: f64,
    pub vertical: SpreadResult,
    pub butterfly: SpreadResult,
}

pub async fn get_spreads(
    Query(params): Query<SetupQuery>,
    State(state): State<AppState>,
) -> Result<Json<SpreadsResponse>, AppError> {
    let resolved = resolve_setup(&state, &params).await?;
    let setup = resolved.setup;

    let vertical = state.spreads.vertical_spread(&setup)?;
    let butterfly = state.spreads.butterfly(&setup)?;

    Ok(Json(SpreadsResponse {
        price_source: resolved.price_source,
        current_price: setup.current_price,
        implied_vol: setup.implied_vol,
        vertical: vertical.into(),
        butterfly: butterfly.into(),
    }))
}
