//! The shared input record for strike selection and spread construction.

use crate::domain::OptionType;
use serde::{Deserialize, Serialize};

/// One fully-specified trade setup on a single instrument.
///
/// All prices are instrument-level prices (already converted from the
/// index), not index points. `implied_vol` is annualized (0.20 = 20%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeSetup {
    /// Live (or manually supplied) price of the instrument.
    pub current_price: f64,
    /// Planned entry level.
    pub entry: f64,
    /// Stop-loss level on the underlying.
    pub stop: f64,
    /// Profit target on the underlying.
    pub target: f64,
    /// Maximum dollars at risk for the position.
    pub risk_amount: f64,
    pub option_type: OptionType,
    /// Days to expiration; 0 means same-day expiry.
    pub days_to_expiry: u32,
    /// Annualized implied volatility assumption.
    pub implied_vol: f64,
}

impl TradeSetup {
    /// Time to expiry in years, floored at one hour for same-day contracts.
    pub fn time_to_expiry_years(&self) -> f64 {
        (self.days_to_expiry as f64 / 365.0).max(1.0 / 365.0 / 24.0)
    }

    pub fn is_bullish(&self) -> bool {
        self.option_type.is_call()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(days: u32) -> TradeSetup {
        TradeSetup {
            current_price: 580.0,
            entry: 580.0,
            stop: 578.0,
            target: 584.0,
            risk_amount: 1000.0,
            option_type: OptionType::Call,
            days_to_expiry: days,
            implied_vol: 0.20,
        }
    }

    #[test]
    fn test_zero_dte_floors_at_one_hour() {
        let t = setup(0).time_to_expiry_years();
        assert!((t - 1.0 / 365.0 / 24.0).abs() < 1e-12);
    }

    #[test]
    fn test_positive_dte_in_years() {
        let t = setup(7).time_to_expiry_years();
        assert!((t - 7.0 / 365.0).abs() < 1e-12);
    }
}
