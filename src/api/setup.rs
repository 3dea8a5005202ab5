//! Shared query resolution: index levels in, a priced TradeSetup out.

use crate::api::AppState;
use crate::datasource::{implied_vol_estimate, ticker};
use crate::domain::{Instrument, InstrumentLevels, PriceLevels, TradeDirection, TradeSetup};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Common query parameters for recommendation, spreads and comparison.
/// Entry/stop/target are index levels; `currentPrice` is an optional
/// manual fallback in instrument prices, `iv` an optional volatility
/// override.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupQuery {
    pub instrument: Instrument,
    pub direction: TradeDirection,
    pub entry: f64,
    pub stop: f64,
    pub target: f64,
    pub risk_amount: f64,
    #[serde(default)]
    pub dte: u32,
    pub iv: Option<f64>,
    pub current_price: Option<f64>,
}

/// Where the resolved current price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PriceSource {
    Live,
    Manual,
    ConvertedEntry,
}

#[derive(Debug)]
pub struct ResolvedSetup {
    pub setup: TradeSetup,
    pub levels: InstrumentLevels,
    pub price_source: PriceSource,
}

/// Validate the index triple, convert it, and resolve the instrument's
/// current price and volatility.
///
/// Price resolution order: live quote, then the caller's manual
/// `currentPrice`, then the converted entry level. A provider failure is
/// only surfaced when the caller gave no manual fallback.
pub async fn resolve_setup(state: &AppState, q: &SetupQuery) -> Result<ResolvedSetup, AppError> {
    let index = PriceLevels::new(q.entry, q.stop, q.target, q.direction)?;
    let conversions = state.converter.convert(&index);
    let levels = *conversions
        .iter()
        .find(|c| c.instrument == q.instrument)
        .expect("converter covers the full instrument set");

    let symbol = ticker(q.instrument);
    let (current_price, price_source) = match state.datasource.fetch_spot(symbol).await {
        Ok(Some(price)) => (price, PriceSource::Live),
        Ok(None) => match q.current_price {
            Some(price) => (price, PriceSource::Manual),
            None => (levels.entry, PriceSource::ConvertedEntry),
        },
        Err(e) => match q.current_price {
            Some(price) => {
                warn!(symbol, error = %e, "live quote failed, using manual price");
                (price, PriceSource::Manual)
            }
            None => return Err(e.into()),
        },
    };

    let implied_vol = match q.iv {
        Some(iv) => iv,
        None => {
            implied_vol_estimate(
                state.datasource.as_ref(),
                symbol,
                current_price,
                q.dte,
                state.config.default_implied_vol,
            )
            .await
        }
    };

    Ok(ResolvedSetup {
        setup: TradeSetup {
            current_price,
            entry: levels.entry,
            stop: levels.stop,
            target: levels.target,
            risk_amount: q.risk_amount,
            option_type: q.direction.option_type(),
            days_to_expiry: q.dte,
            implied_vol,
        },
        levels,
        price_source,
    })
}
