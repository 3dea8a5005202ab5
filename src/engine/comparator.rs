//! Side-by-side tabulation of the three strategies for one setup.

use crate::domain::{
    SpreadRecommendation, StrategyComparison, StrategyKind, StrategyRow, TradeRecommendation,
    TradeSetup,
};
use crate::engine::{EngineError, EngineParams, SpreadBuilder, StrikeSelector};

/// Runs the single-option selector and both spread constructors with one
/// shared parameter set and tabulates the results. Pure aggregation; all
/// algorithmic content lives in the components it calls.
#[derive(Debug, Clone, Copy)]
pub struct StrategyComparator {
    selector: StrikeSelector,
    spreads: SpreadBuilder,
}

impl StrategyComparator {
    pub fn new(params: &EngineParams) -> Self {
        Self {
            selector: StrikeSelector::new(params),
            spreads: SpreadBuilder::new(params),
        }
    }

    pub fn compare(&self, setup: &TradeSetup) -> Result<StrategyComparison, EngineError> {
        let single = self.selector.find_best_strike(setup)?;
        let vertical = self.spreads.vertical_spread(setup)?;
        let butterfly = self.spreads.butterfly(setup)?;

        Ok(StrategyComparison {
            rows: vec![
                single_row(single.as_ref()),
                spread_row(StrategyKind::VerticalSpread, vertical.as_ref()),
                spread_row(StrategyKind::Butterfly, butterfly.as_ref()),
            ],
        })
    }
}

fn single_row(rec: Option<&TradeRecommendation>) -> StrategyRow {
    match rec {
        Some(rec) => StrategyRow {
            strategy: StrategyKind::SingleOption,
            found: true,
            contracts: Some(rec.contracts),
            max_profit: Some(rec.max_profit),
            max_loss: Some(rec.total_risk),
            reward_risk_ratio: Some(rec.reward_risk_ratio),
            probability: Some(rec.probability),
        },
        None => empty_row(StrategyKind::SingleOption),
    }
}

fn spread_row(strategy: StrategyKind, rec: Option<&SpreadRecommendation>) -> StrategyRow {
    match rec {
        Some(rec) => StrategyRow {
            strategy,
            found: true,
            contracts: Some(rec.contracts),
            max_profit: Some(rec.max_profit),
            max_loss: Some(rec.max_loss),
            reward_risk_ratio: (rec.max_loss > 0.0).then(|| rec.max_profit / rec.max_loss),
            probability: rec.probability,
        },
        None => empty_row(strategy),
    }
}

fn empty_row(strategy: StrategyKind) -> StrategyRow {
    StrategyRow {
        strategy,
        found: false,
        contracts: None,
        max_profit: None,
        max_loss: None,
        reward_risk_ratio: None,
        probability: None,
    }
}
