//! Black-Scholes option valuation and sensitivities.
//!
//! Closed-form European pricing, Greeks, a Newton-Raphson implied-vol
//! solver, lognormal probability-of-profit, and expiry P/L. Everything is
//! a pure function of numeric inputs; out-of-domain values are rejected
//! before any formula can divide by zero.

use crate::domain::{Greeks, OptionType};
use crate::engine::{EngineError, OPTION_MULTIPLIER};

/// Floor applied to time-to-expiry (in years) inside the Greeks so the
/// formulas stay defined as expiry approaches.
const MIN_GREEKS_TIME_YEARS: f64 = 0.001;

/// Newton-Raphson settings for the implied-vol solver.
const IV_INITIAL_GUESS: f64 = 0.20;
const IV_PRICE_TOLERANCE: f64 = 0.001;
const IV_MIN_VEGA: f64 = 1e-4;
const IV_MAX_ITERATIONS: u32 = 100;
const IV_LOWER_BOUND: f64 = 0.001;
const IV_UPPER_BOUND: f64 = 5.0;

/// Best-effort implied-volatility estimate.
///
/// The solver never fails outright: if the iteration budget is exhausted
/// it returns the last iterate with `converged == false`, and callers that
/// need certainty should inspect `residual` (observed minus model price at
/// the returned volatility) rather than trusting the point estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IvEstimate {
    pub volatility: f64,
    pub converged: bool,
    pub iterations: u32,
    pub residual: f64,
}

/// Closed-form pricing engine. Cheap to construct and clone; the
/// risk-free rate is injected once instead of read from ambient state.
#[derive(Debug, Clone, Copy)]
pub struct PricingEngine {
    rate: f64,
}

impl PricingEngine {
    pub fn new(risk_free_rate: f64) -> Self {
        Self {
            rate: risk_free_rate,
        }
    }

    pub fn risk_free_rate(&self) -> f64 {
        self.rate
    }

    /// European option premium.
    ///
    /// At or past expiry (`t_years <= 0`) the value degenerates to
    /// intrinsic. Otherwise requires positive spot, strike and volatility.
    pub fn price(
        &self,
        spot: f64,
        strike: f64,
        t_years: f64,
        vol: f64,
        option_type: OptionType,
    ) -> Result<f64, EngineError> {
        if spot <= 0.0 {
            return Err(EngineError::NonPositiveSpot(spot));
        }
        if strike <= 0.0 {
            return Err(EngineError::NonPositiveStrike(strike));
        }
        if t_years <= 0.0 {
            return Ok(option_type.intrinsic(spot, strike));
        }
        if vol <= 0.0 {
            return Err(EngineError::NonPositiveVolatility(vol));
        }

        let (d1, d2) = d1_d2(spot, strike, t_years, self.rate, vol);
        let discount = (-self.rate * t_years).exp();
        let price = match option_type {
            OptionType::Call => spot * norm_cdf(d1) - strike * discount * norm_cdf(d2),
            OptionType::Put => strike * discount * norm_cdf(-d2) - spot * norm_cdf(-d1),
        };
        Ok(price)
    }

    /// Full Greeks snapshot for one contract.
    ///
    /// `dte_days` may be fractional (0.25 for a 0DTE afternoon); it is
    /// floored internally so the divisors stay positive.
    pub fn greeks(
        &self,
        spot: f64,
        strike: f64,
        dte_days: f64,
        vol: f64,
        option_type: OptionType,
    ) -> Result<Greeks, EngineError> {
        if spot <= 0.0 {
            return Err(EngineError::NonPositiveSpot(spot));
        }
        if strike <= 0.0 {
            return Err(EngineError::NonPositiveStrike(strike));
        }
        if vol <= 0.0 {
            return Err(EngineError::NonPositiveVolatility(vol));
        }

        let t = (dte_days / 365.0).max(MIN_GREEKS_TIME_YEARS);
        let r = self.rate;
        let (d1, d2) = d1_d2(spot, strike, t, r, vol);
        let pdf_d1 = norm_pdf(d1);
        let discount = (-r * t).exp();

        let (delta, theta, rho) = match option_type {
            OptionType::Call => {
                let delta = norm_cdf(d1);
                let theta = -(spot * pdf_d1 * vol / (2.0 * t.sqrt())
                    + r * strike * discount * norm_cdf(d2))
                    / 365.0;
                let rho = strike * t * discount * norm_cdf(d2) / 100.0;
                (delta, theta, rho)
            }
            OptionType::Put => {
                let delta = -norm_cdf(-d1);
                let theta = -(spot * pdf_d1 * vol / (2.0 * t.sqrt())
                    - r * strike * discount * norm_cdf(-d2))
                    / 365.0;
                let rho = -strike * t * discount * norm_cdf(-d2) / 100.0;
                (delta, theta, rho)
            }
        };

        let gamma = pdf_d1 / (spot * vol * t.sqrt());
        let vega = spot * pdf_d1 * t.sqrt() / 100.0;

        let premium = self.price(spot, strike, t, vol, option_type)?;
        // Deep-OTM premiums underflow toward zero; report zero leverage
        // there instead of an unrepresentable ratio.
        let lambda = if premium > 1e-12 {
            delta * spot / premium
        } else {
            0.0
        };

        Ok(Greeks {
            delta,
            gamma,
            theta,
            vega,
            rho,
            lambda,
        })
    }

    /// Newton-Raphson implied volatility for an observed premium.
    ///
    /// Starts at 20%, steps by price-difference over vega (frozen when
    /// vega collapses below 1e-4), clamps each iterate to [0.001, 5.0],
    /// and gives up after 100 iterations, returning the last iterate.
    pub fn implied_volatility(
        &self,
        observed_price: f64,
        spot: f64,
        strike: f64,
        t_years: f64,
        option_type: OptionType,
    ) -> Result<IvEstimate, EngineError> {
        if observed_price <= 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "observed price must be positive, got {}",
                observed_price
            )));
        }
        if spot <= 0.0 {
            return Err(EngineError::NonPositiveSpot(spot));
        }
        if strike <= 0.0 {
            return Err(EngineError::NonPositiveStrike(strike));
        }
        if t_years <= 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "time to expiry must be positive, got {}",
                t_years
            )));
        }

        let mut vol = IV_INITIAL_GUESS;
        let mut diff = f64::MAX;
        for iteration in 0..IV_MAX_ITERATIONS {
            let model = self.price(spot, strike, t_years, vol, option_type)?;
            diff = observed_price - model;

            if diff.abs() < IV_PRICE_TOLERANCE {
                return Ok(IvEstimate {
                    volatility: vol,
                    converged: true,
                    iterations: iteration,
                    residual: diff,
                });
            }

            let (d1, _) = d1_d2(spot, strike, t_years, self.rate, vol);
            let vega = spot * norm_pdf(d1) * t_years.sqrt();
            if vega > IV_MIN_VEGA {
                vol = (vol + diff / vega).clamp(IV_LOWER_BOUND, IV_UPPER_BOUND);
            }
        }

        Ok(IvEstimate {
            volatility: vol,
            converged: false,
            iterations: IV_MAX_ITERATIONS,
            residual: diff,
        })
    }

    /// One-sided probability that the underlying finishes beyond
    /// `breakeven` in the favorable direction at expiry, under a
    /// lognormal spot model with drift (r - sigma^2/2) t.
    pub fn probability_of_profit(
        &self,
        current_price: f64,
        breakeven: f64,
        dte_days: f64,
        vol: f64,
        is_bullish: bool,
    ) -> Result<f64, EngineError> {
        if current_price <= 0.0 {
            return Err(EngineError::NonPositiveSpot(current_price));
        }
        if breakeven <= 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "breakeven must be positive, got {}",
                breakeven
            )));
        }

        if dte_days <= 0.0 {
            let won = (is_bullish && current_price > breakeven)
                || (!is_bullish && current_price < breakeven);
            return Ok(if won { 1.0 } else { 0.0 });
        }
        if vol <= 0.0 {
            return Err(EngineError::NonPositiveVolatility(vol));
        }

        let t = dte_days / 365.0;
        let drift = (self.rate - 0.5 * vol * vol) * t;
        let diffusion = vol * t.sqrt();
        let z = ((breakeven / current_price).ln() - drift) / diffusion;

        let probability = if is_bullish {
            1.0 - norm_cdf(z)
        } else {
            norm_cdf(z)
        };
        Ok(probability.clamp(0.0, 1.0))
    }

    /// Signed dollar P/L of a long option held to expiry.
    pub fn option_pl(
        &self,
        spot_at_expiry: f64,
        strike: f64,
        premium_paid: f64,
        contracts: u32,
        option_type: OptionType,
    ) -> f64 {
        let intrinsic = option_type.intrinsic(spot_at_expiry, strike);
        (intrinsic - premium_paid) * contracts as f64 * OPTION_MULTIPLIER
    }

    /// Spot at expiry where the long position's profit is exactly zero.
    pub fn breakeven(&self, strike: f64, premium: f64, option_type: OptionType) -> f64 {
        match option_type {
            OptionType::Call => strike + premium,
            OptionType::Put => strike - premium,
        }
    }
}

/// Standardized log-moneyness terms of the closed form.
fn d1_d2(spot: f64, strike: f64, t: f64, rate: f64, vol: f64) -> (f64, f64) {
    let d1 = ((spot / strike).ln() + (rate + 0.5 * vol * vol) * t) / (vol * t.sqrt());
    let d2 = d1 - vol * t.sqrt();
    (d1, d2)
}

/// Standard normal CDF via the error function.
fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

/// Standard normal PDF.
fn norm_pdf(x: f64) -> f64 {
    (-(x * x) / 2.0).exp() / (2.0 * std::f64::consts::PI).sqrt()
}

/// Abramowitz & Stegun 7.1.26 rational approximation, max error 1.5e-7.
/// Antisymmetric by construction, which keeps put-call parity exact.
fn erf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

    sign * y
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: f64 = 0.0525;

    fn engine() -> PricingEngine {
        PricingEngine::new(RATE)
    }

    #[test]
    fn test_norm_cdf_known_values() {
        assert!((norm_cdf(0.0) - 0.5).abs() < 1e-7);
        assert!((norm_cdf(1.0) - 0.8413447).abs() < 1e-6);
        assert!((norm_cdf(-1.0) - 0.1586553).abs() < 1e-6);
        assert!((norm_cdf(2.0) - 0.9772499).abs() < 1e-6);
    }

    #[test]
    fn test_put_call_parity() {
        let engine = engine();
        let spot = 580.0;
        let t = 30.0 / 365.0;
        let vol = 0.20;
        for strike in [560.0, 570.0, 580.0, 590.0, 600.0] {
            let call = engine.price(spot, strike, t, vol, OptionType::Call).unwrap();
            let put = engine.price(spot, strike, t, vol, OptionType::Put).unwrap();
            let expected = spot - strike * (-RATE * t).exp();
            assert!(
                (call - put - expected).abs() < 1e-6,
                "parity violated at K={}: {} vs {}",
                strike,
                call - put,
                expected
            );
        }
    }

    #[test]
    fn test_expiry_boundary_returns_intrinsic() {
        let engine = engine();
        assert_eq!(
            engine.price(585.0, 580.0, 0.0, 0.2, OptionType::Call).unwrap(),
            5.0
        );
        assert_eq!(
            engine.price(575.0, 580.0, 0.0, 0.2, OptionType::Call).unwrap(),
            0.0
        );
        assert_eq!(
            engine.price(575.0, 580.0, -1.0, 0.2, OptionType::Put).unwrap(),
            5.0
        );
        // Volatility is irrelevant at the boundary.
        assert_eq!(
            engine.price(585.0, 580.0, 0.0, -1.0, OptionType::Call).unwrap(),
            5.0
        );
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let engine = engine();
        assert!(matches!(
            engine.price(580.0, 580.0, 0.1, 0.0, OptionType::Call),
            Err(EngineError::NonPositiveVolatility(_))
        ));
        assert!(matches!(
            engine.price(580.0, 0.0, 0.1, 0.2, OptionType::Call),
            Err(EngineError::NonPositiveStrike(_))
        ));
        assert!(matches!(
            engine.price(0.0, 580.0, 0.1, 0.2, OptionType::Call),
            Err(EngineError::NonPositiveSpot(_))
        ));
    }

    #[test]
    fn test_atm_reference_value() {
        // S=580, K=580, T=7/365, r=5.25%, sigma=20%: independently
        // computed reference premium 6.7013 and delta 0.5200.
        let engine = engine();
        let premium = engine
            .price(580.0, 580.0, 7.0 / 365.0, 0.20, OptionType::Call)
            .unwrap();
        assert!(
            (premium - 6.7013).abs() < 2e-3,
            "ATM premium off reference: {}",
            premium
        );

        let greeks = engine
            .greeks(580.0, 580.0, 7.0, 0.20, OptionType::Call)
            .unwrap();
        assert!(
            (greeks.delta - 0.5200).abs() < 5e-4,
            "ATM delta off reference: {}",
            greeks.delta
        );
    }

    #[test]
    fn test_delta_bounds() {
        let engine = engine();
        for strike in [500.0, 550.0, 580.0, 610.0, 660.0] {
            for dte in [1.0, 7.0, 30.0] {
                let call = engine.greeks(580.0, strike, dte, 0.2, OptionType::Call).unwrap();
                assert!(
                    (0.0..=1.0).contains(&call.delta),
                    "call delta out of range at K={}: {}",
                    strike,
                    call.delta
                );
                let put = engine.greeks(580.0, strike, dte, 0.2, OptionType::Put).unwrap();
                assert!(
                    (-1.0..=0.0).contains(&put.delta),
                    "put delta out of range at K={}: {}",
                    strike,
                    put.delta
                );
            }
        }
    }

    #[test]
    fn test_greeks_signs() {
        let greeks = engine()
            .greeks(580.0, 580.0, 7.0, 0.20, OptionType::Call)
            .unwrap();
        assert!(greeks.theta < 0.0, "long premium must decay");
        assert!(greeks.gamma > 0.0);
        assert!(greeks.vega > 0.0);
        assert!(greeks.rho > 0.0, "call rho positive");
        assert!(greeks.lambda > 1.0, "option leverage exceeds the stock's");

        let put = engine()
            .greeks(580.0, 580.0, 7.0, 0.20, OptionType::Put)
            .unwrap();
        assert!(put.rho < 0.0, "put rho negative");
    }

    #[test]
    fn test_implied_vol_round_trip() {
        let engine = engine();
        let spot = 580.0;
        let t = 30.0 / 365.0;
        for sigma in [0.05, 0.10, 0.20, 0.50, 1.0, 2.0] {
            for (strike, option_type) in [(580.0, OptionType::Call), (570.0, OptionType::Put)] {
                let price = engine.price(spot, strike, t, sigma, option_type).unwrap();
                let estimate = engine
                    .implied_volatility(price, spot, strike, t, option_type)
                    .unwrap();
                assert!(estimate.converged, "solver should converge at sigma={}", sigma);
                assert!(
                    (estimate.volatility - sigma).abs() < 1e-3,
                    "round trip failed: sigma={} recovered={}",
                    sigma,
                    estimate.volatility
                );
            }
        }
    }

    #[test]
    fn test_implied_vol_unconverged_is_best_effort() {
        // An observed price above the no-arbitrage ceiling can never be
        // matched; the solver must still return an estimate, flagged.
        let engine = engine();
        let estimate = engine
            .implied_volatility(1000.0, 580.0, 580.0, 7.0 / 365.0, OptionType::Call)
            .unwrap();
        assert!(!estimate.converged);
        assert!(estimate.residual.abs() >= IV_PRICE_TOLERANCE);
        assert!(estimate.volatility <= IV_UPPER_BOUND);
    }

    #[test]
    fn test_probability_expiry_degenerates() {
        let engine = engine();
        assert_eq!(
            engine.probability_of_profit(585.0, 580.0, 0.0, 0.2, true).unwrap(),
            1.0
        );
        assert_eq!(
            engine.probability_of_profit(575.0, 580.0, 0.0, 0.2, true).unwrap(),
            0.0
        );
        assert_eq!(
            engine.probability_of_profit(575.0, 580.0, 0.0, 0.2, false).unwrap(),
            1.0
        );
    }

    #[test]
    fn test_probability_in_unit_interval_and_monotone() {
        let engine = engine();
        let near = engine
            .probability_of_profit(580.0, 582.0, 7.0, 0.2, true)
            .unwrap();
        let far = engine
            .probability_of_profit(580.0, 600.0, 7.0, 0.2, true)
            .unwrap();
        assert!((0.0..=1.0).contains(&near));
        assert!((0.0..=1.0).contains(&far));
        assert!(near > far, "nearer breakeven must be likelier");
    }

    #[test]
    fn test_option_pl() {
        let engine = engine();
        // Long 2 calls at $3.50 premium, expiry at 590: (10 - 3.5) * 2 * 100.
        let pl = engine.option_pl(590.0, 580.0, 3.5, 2, OptionType::Call);
        assert!((pl - 1300.0).abs() < 1e-9);
        // Expires worthless: lose the full premium.
        let pl = engine.option_pl(570.0, 580.0, 3.5, 2, OptionType::Call);
        assert!((pl + 700.0).abs() < 1e-9);
    }

    #[test]
    fn test_breakeven_sides() {
        let engine = engine();
        assert_eq!(engine.breakeven(580.0, 3.5, OptionType::Call), 583.5);
        assert_eq!(engine.breakeven(580.0, 3.5, OptionType::Put), 576.5);
    }
}
