//! Pure computation engines for pricing, conversion and strike selection.
//!
//! Nothing in this module performs I/O or holds shared mutable state;
//! every component is constructed from an explicit [`EngineParams`] and
//! every operation is a pure function of its inputs.

use thiserror::Error;

pub mod comparator;
pub mod converter;
pub mod montecarlo;
pub mod pricing;
pub mod selector;
pub mod sizing;
pub mod spreads;
pub mod strikes;

pub use comparator::StrategyComparator;
pub use converter::LevelConverter;
pub use montecarlo::{MonteCarloPricer, SimulatedPrice};
pub use pricing::{IvEstimate, PricingEngine};
pub use selector::StrikeSelector;
pub use spreads::SpreadBuilder;

/// Dollar value of one option point (100-share-equivalent contracts).
pub const OPTION_MULTIPLIER: f64 = 100.0;

/// Errors for out-of-domain engine inputs.
///
/// A search that completes without a viable candidate is NOT an error;
/// selectors return `Ok(None)` for that outcome and callers are expected
/// to treat it as a normal negative result.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    #[error("spot price must be positive, got {0}")]
    NonPositiveSpot(f64),
    #[error("strike must be positive, got {0}")]
    NonPositiveStrike(f64),
    #[error("volatility must be positive, got {0}")]
    NonPositiveVolatility(f64),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Explicit engine configuration, passed to each component at
/// construction instead of living in ambient globals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineParams {
    /// Annualized risk-free rate.
    pub risk_free_rate: f64,
    /// S&P 500 dividend yield used in the futures carry model.
    pub dividend_yield: f64,
    /// Assumed carry horizon for the ES fair-value basis, in days.
    pub futures_carry_days: f64,
    /// Candidates below this probability of profit are discarded.
    pub min_probability: f64,
    /// Hard cap on contracts per position.
    pub max_contracts: u32,
    /// Named modeling assumption: fraction of the remaining time left
    /// when the underlying is assumed to reach the target. Scales the
    /// exit-leg repricing in the selector.
    pub target_time_fraction: f64,
    /// Butterfly wing span as a fraction of current price per side.
    pub butterfly_wing_pct: f64,
    /// Quarter-Kelly scaling applied to the sizing advisory.
    pub kelly_fraction: f64,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.0525,
            dividend_yield: 0.0142,
            futures_carry_days: 30.0,
            min_probability: 0.25,
            max_contracts: 100,
            target_time_fraction: 0.5,
            butterfly_wing_pct: 0.02,
            kelly_fraction: 0.25,
        }
    }
}
