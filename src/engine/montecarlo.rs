//! Simulation-based valuation backend.
//!
//! Geometric-Brownian-motion path simulation behind the same input
//! domain as the closed form. Not wired into strike selection; it exists
//! as an independently testable second opinion on a premium, with a
//! standard error the closed form cannot give.

use crate::domain::OptionType;
use crate::engine::EngineError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

/// Simulated premium with sampling uncertainty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedPrice {
    pub price: f64,
    pub std_error: f64,
    /// 95% confidence interval around the discounted mean payoff.
    pub confidence_interval: (f64, f64),
    pub paths: usize,
}

/// Monte Carlo pricer with a fixed seed for reproducible estimates.
#[derive(Debug, Clone, Copy)]
pub struct MonteCarloPricer {
    rate: f64,
    paths: usize,
    seed: u64,
}

impl MonteCarloPricer {
    pub const DEFAULT_PATHS: usize = 10_000;
    pub const DEFAULT_SEED: u64 = 42;

    pub fn new(risk_free_rate: f64) -> Self {
        Self {
            rate: risk_free_rate,
            paths: Self::DEFAULT_PATHS,
            seed: Self::DEFAULT_SEED,
        }
    }

    pub fn with_paths(mut self, paths: usize) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Simulate daily GBM steps to expiry and discount the mean payoff.
    pub fn price(
        &self,
        spot: f64,
        strike: f64,
        t_years: f64,
        vol: f64,
        option_type: OptionType,
    ) -> Result<SimulatedPrice, EngineError> {
        if spot <= 0.0 {
            return Err(EngineError::NonPositiveSpot(spot));
        }
        if strike <= 0.0 {
            return Err(EngineError::NonPositiveStrike(strike));
        }
        if t_years <= 0.0 {
            let intrinsic = option_type.intrinsic(spot, strike);
            return Ok(SimulatedPrice {
                price: intrinsic,
                std_error: 0.0,
                confidence_interval: (intrinsic, intrinsic),
                paths: 0,
            });
        }
        if vol <= 0.0 {
            return Err(EngineError::NonPositiveVolatility(vol));
        }

        let steps = ((t_years * 252.0).ceil() as usize).max(1);
        let dt = t_years / steps as f64;
        let drift = (self.rate - 0.5 * vol * vol) * dt;
        let diffusion = vol * dt.sqrt();

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut payoffs = Vec::with_capacity(self.paths);
        for _ in 0..self.paths {
            let mut price = spot;
            for _ in 0..steps {
                let z: f64 = StandardNormal.sample(&mut rng);
                price *= (drift + diffusion * z).exp();
            }
            payoffs.push(option_type.intrinsic(price, strike));
        }

        let n = payoffs.len() as f64;
        let mean = payoffs.iter().sum::<f64>() / n;
        let variance = payoffs.iter().map(|p| (p - mean) * (p - mean)).sum::<f64>() / n;
        let std_error = variance.sqrt() / n.sqrt();

        let price = (-self.rate * t_years).exp() * mean;
        Ok(SimulatedPrice {
            price,
            std_error,
            confidence_interval: (price - 1.96 * std_error, price + 1.96 * std_error),
            paths: self.paths,
        })
    }
}
