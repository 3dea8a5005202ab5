//! Spot snapshot of the tracked symbol set.

use crate::api::AppState;
use crate::datasource::snapshot_prices;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketResponse {
    /// Prices keyed by display symbol; symbols the provider cannot
    /// quote right now are omitted.
    pub prices: HashMap<String, f64>,
}

pub async fn get_market(State(state): State<AppState>) -> Json<MarketResponse> {
    let prices = snapshot_prices(state.datasource.as_ref()).await;
    Json(MarketResponse { prices })
}
