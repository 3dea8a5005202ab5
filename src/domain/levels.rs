//! Validated entry/stop/target price triple.

use crate::domain::TradeDirection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One instrument's entry, stop and target. Immutable once constructed;
/// the constructor enforces that stop and target lie on opposite sides of
/// entry, consistent with the trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevels {
    pub entry: f64,
    pub stop: f64,
    pub target: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum LevelsError {
    #[error("levels must be positive: entry={entry}, stop={stop}, target={target}")]
    NonPositive { entry: f64, stop: f64, target: f64 },
    #[error("stop loss must be below entry for long trades")]
    LongStopAboveEntry,
    #[error("target must be above entry for long trades")]
    LongTargetBelowEntry,
    #[error("stop loss must be above entry for short trades")]
    ShortStopBelowEntry,
    #[error("target must be below entry for short trades")]
    ShortTargetAboveEntry,
}

impl PriceLevels {
    pub fn new(
        entry: f64,
        stop: f64,
        target: f64,
        direction: TradeDirection,
    ) -> Result<Self, LevelsError> {
        if entry <= 0.0 || stop <= 0.0 || target <= 0.0 {
            return Err(LevelsError::NonPositive {
                entry,
                stop,
                target,
            });
        }
        match direction {
            TradeDirection::Long => {
                if stop >= entry {
                    return Err(LevelsError::LongStopAboveEntry);
                }
                if target <= entry {
                    return Err(LevelsError::LongTargetBelowEntry);
                }
            }
            TradeDirection::Short => {
                if stop <= entry {
                    return Err(LevelsError::ShortStopBelowEntry);
                }
                if target >= entry {
                    return Err(LevelsError::ShortTargetAboveEntry);
                }
            }
        }
        Ok(PriceLevels {
            entry,
            stop,
            target,
        })
    }

    /// Points at risk between entry and stop.
    pub fn risk_points(&self) -> f64 {
        (self.entry - self.stop).abs()
    }

    /// Points of reward between entry and target.
    pub fn reward_points(&self) -> f64 {
        (self.target - self.entry).abs()
    }

    /// Reward/risk ratio of the underlying setup.
    pub fn reward_risk_ratio(&self) -> f64 {
        self.reward_points() / self.risk_points()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_long_levels() {
        let levels = PriceLevels::new(5800.0, 5780.0, 5840.0, TradeDirection::Long).unwrap();
        assert_eq!(levels.risk_points(), 20.0);
        assert_eq!(levels.reward_points(), 40.0);
        assert!((levels.reward_risk_ratio() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_valid_short_levels() {
        let levels = PriceLevels::new(5800.0, 5820.0, 5760.0, TradeDirection::Short).unwrap();
        assert_eq!(levels.risk_points(), 20.0);
        assert_eq!(levels.reward_points(), 40.0);
    }

    #[test]
    fn test_long_stop_above_entry_rejected() {
        let err = PriceLevels::new(5800.0, 5810.0, 5840.0, TradeDirection::Long).unwrap_err();
        assert_eq!(err, LevelsError::LongStopAboveEntry);
    }

    #[test]
    fn test_long_target_below_entry_rejected() {
        let err = PriceLevels::new(5800.0, 5780.0, 5790.0, TradeDirection::Long).unwrap_err();
        assert_eq!(err, LevelsError::LongTargetBelowEntry);
    }

    #[test]
    fn test_short_side_violations_rejected() {
        assert_eq!(
            PriceLevels::new(5800.0, 5780.0, 5760.0, TradeDirection::Short).unwrap_err(),
            LevelsError::ShortStopBelowEntry
        );
        assert_eq!(
            PriceLevels::new(5800.0, 5820.0, 5810.0, TradeDirection::Short).unwrap_err(),
            LevelsError::ShortTargetAboveEntry
        );
    }

    #[test]
    fn test_non_positive_rejected() {
        assert!(matches!(
            PriceLevels::new(0.0, 5780.0, 5840.0, TradeDirection::Long),
            Err(LevelsError::NonPositive { .. })
        ));
    }
}
