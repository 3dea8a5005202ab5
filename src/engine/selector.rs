//! Exhaustive scored search for the best single-option strike.

use crate::domain::{trade_id, TradeRecommendation, TradeSetup};
use crate::engine::{strikes, EngineError, EngineParams, PricingEngine, OPTION_MULTIPLIER};
use tracing::debug;

/// Weight of the distance-from-entry penalty in the candidate score.
const DISTANCE_PENALTY_WEIGHT: f64 = 10.0;

/// Scores candidate strikes against a risk budget and probability floor
/// and returns the single best affordable contract.
///
/// The search space is a bounded one-dimensional strike list, scanned
/// exhaustively; given identical inputs the result is deterministic.
#[derive(Debug, Clone, Copy)]
pub struct StrikeSelector {
    pricing: PricingEngine,
    min_probability: f64,
    max_contracts: u32,
    target_time_fraction: f64,
}

impl StrikeSelector {
    pub fn new(params: &EngineParams) -> Self {
        Self {
            pricing: PricingEngine::new(params.risk_free_rate),
            min_probability: params.min_probability,
            max_contracts: params.max_contracts,
            target_time_fraction: params.target_time_fraction,
        }
    }

    /// Find the best strike for a setup.
    ///
    /// `Err` is reserved for invalid input (non-positive risk budget or
    /// current price); a search that completes with no candidate passing
    /// the affordability and probability gates returns `Ok(None)`.
    pub fn find_best_strike(
        &self,
        setup: &TradeSetup,
    ) -> Result<Option<TradeRecommendation>, EngineError> {
        if setup.risk_amount <= 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "risk amount must be positive, got {}",
                setup.risk_amount
            )));
        }
        if setup.current_price <= 0.0 {
            return Err(EngineError::NonPositiveSpot(setup.current_price));
        }

        let t = setup.time_to_expiry_years();
        let candidates =
            strikes::candidate_strikes(setup.current_price, setup.target, setup.option_type);
        debug!(
            candidates = candidates.len(),
            dte = setup.days_to_expiry,
            "scanning strikes"
        );

        let mut best: Option<TradeRecommendation> = None;
        for strike in candidates {
            let Some(candidate) = self.evaluate(setup, strike, t)? else {
                continue;
            };
            if best.as_ref().map_or(true, |b| candidate.score > b.score) {
                best = Some(candidate);
            }
        }
        Ok(best)
    }

    /// Price and score one candidate strike; None when it fails a gate.
    fn evaluate(
        &self,
        setup: &TradeSetup,
        strike: f64,
        t: f64,
    ) -> Result<Option<TradeRecommendation>, EngineError> {
        let premium = self
            .pricing
            .price(setup.entry, strike, t, setup.implied_vol, setup.option_type)?;
        // Unaffordable within the budget at even one contract.
        if premium <= 0.0 || premium * OPTION_MULTIPLIER > setup.risk_amount {
            return Ok(None);
        }

        let contracts = ((setup.risk_amount / (premium * OPTION_MULTIPLIER)) as u32)
            .min(self.max_contracts);
        if contracts == 0 {
            return Ok(None);
        }
        let actual_risk = contracts as f64 * premium * OPTION_MULTIPLIER;

        // Exit leg: reprice at the target with the remaining time scaled
        // by the named reach-target assumption (default: half the time).
        let target_premium = self.pricing.price(
            setup.target,
            strike,
            t * self.target_time_fraction,
            setup.implied_vol,
            setup.option_type,
        )?;
        let max_profit = contracts as f64 * (target_premium - premium) * OPTION_MULTIPLIER;

        let breakeven = self.pricing.breakeven(strike, premium, setup.option_type);
        let probability = self.pricing.probability_of_profit(
            setup.entry,
            breakeven,
            setup.days_to_expiry as f64,
            setup.implied_vol,
            setup.is_bullish(),
        )?;
        if probability < self.min_probability {
            return Ok(None);
        }

        let reward_risk_ratio = max_profit / actual_risk;
        let distance_penalty =
            (strike - setup.entry).abs() / setup.entry * DISTANCE_PENALTY_WEIGHT;
        let score = reward_risk_ratio * probability - distance_penalty;

        Ok(Some(TradeRecommendation {
            id: trade_id(),
            option_type: setup.option_type,
            strike,
            entry_premium: premium,
            target_premium,
            contracts,
            total_risk: actual_risk,
            max_profit,
            breakeven,
            probability,
            reward_risk_ratio,
            score,
        }))
    }
}
