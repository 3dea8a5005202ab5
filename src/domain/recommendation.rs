//! Result value objects: Greeks, trade and spread recommendations.

use crate::domain::OptionType;
use serde::{Deserialize, Serialize};

/// Short unique id for a produced recommendation (first uuid segment).
pub fn trade_id() -> String {
    uuid::Uuid::new_v4().to_string()[..8].to_string()
}

/// Sensitivities for one (spot, strike, expiry, vol, type) tuple.
///
/// Theta is per calendar day (negative for long premium), vega per 1%
/// volatility change, rho per 1% rate change, lambda the leverage ratio
/// delta * spot / premium.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
    pub lambda: f64,
}

/// The best single-option trade for a setup, selected as the arg-max of
/// score among all candidates that met the risk and probability gates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecommendation {
    pub id: String,
    pub option_type: OptionType,
    pub strike: f64,
    /// Model premium paid per contract at entry.
    pub entry_premium: f64,
    /// Model value per contract if the underlying reaches the target.
    pub target_premium: f64,
    pub contracts: u32,
    /// Dollars actually committed: contracts * premium * 100.
    pub total_risk: f64,
    pub max_profit: f64,
    pub breakeven: f64,
    /// Probability the underlying finishes beyond breakeven at expiry.
    pub probability: f64,
    pub reward_risk_ratio: f64,
    pub score: f64,
}

/// Which side of a spread leg is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegSide {
    Long,
    Short,
}

/// One leg of a multi-leg structure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadLeg {
    pub strike: f64,
    pub side: LegSide,
    /// Contracts per spread unit (2 for the butterfly body).
    pub ratio: u32,
    /// Model premium per contract for this leg at entry.
    pub premium: f64,
}

/// Multi-leg structure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpreadKind {
    Vertical,
    Butterfly,
}

impl std::fmt::Display for SpreadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpreadKind::Vertical => write!(f, "vertical"),
            SpreadKind::Butterfly => write!(f, "butterfly"),
        }
    }
}

/// A constructed debit spread sized to the risk budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadRecommendation {
    pub id: String,
    pub kind: SpreadKind,
    pub option_type: OptionType,
    /// Ordered low-strike-first legs.
    pub legs: Vec<SpreadLeg>,
    /// Net premium paid per spread unit.
    pub net_debit: f64,
    pub contracts: u32,
    pub max_profit: f64,
    pub max_loss: f64,
    /// One breakeven for verticals, two for butterflies.
    pub breakevens: Vec<f64>,
    /// Defined only where the structure has a single directional breakeven.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
}

/// Strategy label for the comparison table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrategyKind {
    SingleOption,
    VerticalSpread,
    Butterfly,
}

/// One row of the side-by-side strategy comparison. Metric fields are
/// None when the strategy produced no viable structure for the setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyRow {
    pub strategy: StrategyKind,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contracts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_profit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_loss: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward_risk_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
}

/// Tabulated output of the strategy comparator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyComparison {
    pub rows: Vec<StrategyRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_id_is_short_and_unique() {
        let a = trade_id();
        let b = trade_id();
        assert_eq!(a.len(), 8);
        assert_ne!(a, b);
    }

    #[test]
    fn test_spread_serialization_skips_missing_probability() {
        let rec = SpreadRecommendation {
            id: "deadbeef".to_string(),
            kind: SpreadKind::Butterfly,
            option_type: OptionType::Call,
            legs: vec![],
            net_debit: 1.0,
            contracts: 1,
            max_profit: 100.0,
            max_loss: 100.0,
            breakevens: vec![580.0, 590.0],
            probability: None,
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert!(json.get("probability").is_none());
        assert_eq!(json["kind"], "butterfly");
    }
}
