//! Best single-option recommendation endpoint.

use crate::api::setup::{resolve_setup, PriceSource, SetupQuery};
use crate::api::AppState;
use crate::domain::{Greeks, TradeRecommendation};
use crate::engine::sizing;
use crate::error::AppError;
use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizingAdvisory {
    /// Contracts the selector sized by the budget floor rule.
    pub budget_contracts: u32,
    /// Conservative quarter-Kelly alternative.
    pub kelly_contracts: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub found: bool,
    pub price_source: PriceSource,
    pub current_price: f64,
    pub implied_vol: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<TradeRecommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeks: Option<Greeks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizing: Option<SizingAdvisory>,
}

pub async fn get_recommendation(
    Query(params): Query<SetupQuery>,
    State(state): State<AppState>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let resolved = resolve_setup(&state, &params).await?;
    let setup = resolved.setup;

    let recommendation = state.selector.find_best_strike(&setup)?;

    let (greeks, sizing) = match &recommendation {
        Some(rec) => {
            // Same-day contracts still have a fraction of a session left.
            let greeks_dte = if setup.days_to_expiry == 0 {
                0.25
            } else {
                setup.days_to_expiry as f64
            };
            let greeks = state.pricing.greeks(
                setup.current_price,
                rec.strike,
                greeks_dte,
                setup.implied_vol,
                setup.option_type,
            )?;
            let sizing = SizingAdvisory {
                budget_contracts: rec.contracts,
                kelly_contracts: sizing::kelly_contracts(
                    setup.risk_amount,
                    rec.entry_premium,
                    state.config.max_contracts,
                    state.config.kelly_fraction,
                ),
            };
            (Some(greeks), Some(sizing))
        }
        None => (None, None),
    };

    Ok(Json(RecommendationResponse {
        found: recommendation.is_some(),
        price_source: resolved.price_source,
        current_price: setup.current_price,
        implied_vol: setup.implied_vol,
        recommendation,
        greeks,
        sizing,
    }))
}
