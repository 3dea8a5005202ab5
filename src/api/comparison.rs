//! Side-by-side strategy comparison endpoint.

use crate::api::setup::{resolve_setup, PriceSource, SetupQuery};
use crate::api::AppState;
use crate::domain::{Instrument, StrategyRow};
use crate::error::AppError;
use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResponse {
    pub instrument: Instrument,
    pub price_source: PriceSource,
    pub current_price: f64,
    pub implied_vol: f64,
    pub rows: Vec<StrategyRow>,
}

pub async fn get_comparison(
    Query(params): Query<SetupQuery>,
    State(state): State<AppState>,
) -> Result<Json<ComparisonResponse>, AppError> {
    let resolved = resolve_setup(&state, &params).await?;
    let setup = resolved.setup;

    let comparison = state.comparator.compare(&setup)?;

    Ok(Json(ComparisonResponse {
        instrument: params.instrument,
        price_source: resolved.price_source,
        current_price: setup.current_price,
        implied_vol: setup.implied_vol,
        rows: comparison.rows,
    }))
}
