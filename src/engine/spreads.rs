//! Two- and three-leg debit structures built at fixed strikes.

use crate::domain::{
    trade_id, LegSide, OptionType, SpreadKind, SpreadLeg, SpreadRecommendation, TradeSetup,
};
use crate::engine::{strikes, EngineError, EngineParams, PricingEngine, OPTION_MULTIPLIER};

/// Builds vertical spreads and butterflies from closed-form leg values,
/// reusing the shared standard-strike rounding.
#[derive(Debug, Clone, Copy)]
pub struct SpreadBuilder {
    pricing: PricingEngine,
    max_contracts: u32,
    wing_pct: f64,
}

impl SpreadBuilder {
    pub fn new(params: &EngineParams) -> Self {
        Self {
            pricing: PricingEngine::new(params.risk_free_rate),
            max_contracts: params.max_contracts,
            wing_pct: params.butterfly_wing_pct,
        }
    }

    /// Debit vertical: long the entry-side strike, short the target-side
    /// strike. `Ok(None)` when the strikes collapse to one, the model
    /// says the structure would be a credit, or the budget affords no
    /// spread.
    pub fn vertical_spread(
        &self,
        setup: &TradeSetup,
    ) -> Result<Option<SpreadRecommendation>, EngineError> {
        self.validate(setup)?;
        let t = setup.time_to_expiry_years();

        let long_strike = strikes::round_to_standard(setup.entry);
        let short_strike = strikes::round_to_standard(setup.target);
        let width = (short_strike - long_strike).abs();
        if width <= 0.0 {
            return Ok(None);
        }

        let long_premium = self.leg_premium(setup, long_strike, t)?;
        let short_premium = self.leg_premium(setup, short_strike, t)?;
        let net_debit = long_premium - short_premium;
        // A non-positive debit would make this a credit structure, which
        // this model does not trade.
        if net_debit <= 0.0 {
            return Ok(None);
        }

        let Some(contracts) = self.affordable_contracts(setup.risk_amount, net_debit) else {
            return Ok(None);
        };

        let max_profit = (width - net_debit) * contracts as f64 * OPTION_MULTIPLIER;
        let max_loss = net_debit * contracts as f64 * OPTION_MULTIPLIER;
        let breakeven = match setup.option_type {
            OptionType::Call => long_strike + net_debit,
            OptionType::Put => long_strike - net_debit,
        };
        let probability = self.pricing.probability_of_profit(
            setup.entry,
            breakeven,
            setup.days_to_expiry as f64,
            setup.implied_vol,
            setup.is_bullish(),
        )?;

        let mut legs = vec![
            SpreadLeg {
                strike: long_strike,
                side: LegSide::Long,
                ratio: 1,
                premium: long_premium,
            },
            SpreadLeg {
                strike: short_strike,
                side: LegSide::Short,
                ratio: 1,
                premium: short_premium,
            },
        ];
        legs.sort_by(|a, b| a.strike.partial_cmp(&b.strike).unwrap());

        Ok(Some(SpreadRecommendation {
            id: trade_id(),
            kind: SpreadKind::Vertical,
            option_type: setup.option_type,
            legs,
            net_debit,
            contracts,
            max_profit,
            max_loss,
            breakevens: vec![breakeven],
            probability: Some(probability),
        }))
    }

    /// Long butterfly pinned at the target strike, wings a whole number
    /// of strike increments closest to 2% of current price per side.
    ///
    /// With symmetric wings and a single volatility across strikes the
    /// closed form is strictly convex in strike, so the 1/-2/1 package
    /// must cost a positive debit; a non-positive debit is rejected.
    pub fn butterfly(
        &self,
        setup: &TradeSetup,
    ) -> Result<Option<SpreadRecommendation>, EngineError> {
        self.validate(setup)?;
        let t = setup.time_to_expiry_years();

        let center = strikes::round_to_standard(setup.target);
        let increment = strikes::standard_increment(center);
        let wing_span = setup.current_price * self.wing_pct;
        let wing_steps = (wing_span / increment).round().max(1.0);
        let wing = wing_steps * increment;

        let lower = center - wing;
        let upper = center + wing;
        if lower <= 0.0 {
            return Ok(None);
        }

        let lower_premium = self.leg_premium(setup, lower, t)?;
        let center_premium = self.leg_premium(setup, center, t)?;
        let upper_premium = self.leg_premium(setup, upper, t)?;
        let net_debit = lower_premium - 2.0 * center_premium + upper_premium;
        if net_debit <= 0.0 {
            return Ok(None);
        }

        let Some(contracts) = self.affordable_contracts(setup.risk_amount, net_debit) else {
            return Ok(None);
        };

        // Full wing value is collected only on an exact pin at expiry.
        let max_profit = (wing - net_debit) * contracts as f64 * OPTION_MULTIPLIER;
        let max_loss = net_debit * contracts as f64 * OPTION_MULTIPLIER;
        let breakevens = vec![lower + net_debit, upper - net_debit];

        Ok(Some(SpreadRecommendation {
            id: trade_id(),
            kind: SpreadKind::Butterfly,
            option_type: setup.option_type,
            legs: vec![
                SpreadLeg {
                    strike: lower,
                    side: LegSide::Long,
                    ratio: 1,
                    premium: lower_premium,
                },
                SpreadLeg {
                    strike: center,
                    side: LegSide::Short,
                    ratio: 2,
                    premium: center_premium,
                },
                SpreadLeg {
                    strike: upper,
                    side: LegSide::Long,
                    ratio: 1,
                    premium: upper_premium,
                },
            ],
            net_debit,
            contracts,
            max_profit,
            max_loss,
            breakevens,
            probability: None,
        }))
    }

    fn validate(&self, setup: &TradeSetup) -> Result<(), EngineError> {
        if setup.risk_amount <= 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "risk amount must be positive, got {}",
                setup.risk_amount
            )));
        }
        if setup.current_price <= 0.0 {
            return Err(EngineError::NonPositiveSpot(setup.current_price));
        }
        Ok(())
    }

    fn leg_premium(&self, setup: &TradeSetup, strike: f64, t: f64) -> Result<f64, EngineError> {
        self.pricing
            .price(setup.entry, strike, t, setup.implied_vol, setup.option_type)
    }

    /// Spreads affordable within the budget, capped; None when zero.
    fn affordable_contracts(&self, risk_amount: f64, net_debit: f64) -> Option<u32> {
        let contracts =
            ((risk_amount / (net_debit * OPTION_MULTIPLIER)) as u32).min(self.max_contracts);
        (contracts > 0).then_some(contracts)
    }
}
