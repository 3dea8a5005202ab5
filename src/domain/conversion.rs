//! Per-instrument converted level record.

use crate::domain::Instrument;
use serde::{Deserialize, Serialize};

/// Entry/stop/target expressed in one instrument's own prices.
///
/// Recomputed from the index triple on every input change; never mutated
/// in place. `fair_value` is the additive futures basis and is present
/// only for instruments that carry one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentLevels {
    pub instrument: Instrument,
    pub entry: f64,
    pub stop: f64,
    pub target: f64,
    pub conversion_factor: f64,
    pub contract_multiplier: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fair_value: Option<f64>,
}

impl InstrumentLevels {
    /// Width of the full stop-to-target range in instrument points.
    pub fn range(&self) -> f64 {
        (self.target - self.stop).abs()
    }
}
