//! Domain types for level conversion and option strategy selection.
//!
//! This module provides:
//! - Primitives: OptionType, TradeDirection, Instrument
//! - Validated PriceLevels triple and the TradeSetup input record
//! - Per-instrument InstrumentLevels conversion records
//! - Result objects: Greeks, TradeRecommendation, SpreadRecommendation,
//!   StrategyComparison

pub mod conversion;
pub mod levels;
pub mod primitives;
pub mod recommendation;
pub mod setup;

pub use conversion::InstrumentLevels;
pub use levels::{LevelsError, PriceLevels};
pub use primitives::{Instrument, OptionType, TradeDirection};
pub use recommendation::{
    trade_id, Greeks, LegSide, SpreadKind, SpreadLeg, SpreadRecommendation, StrategyComparison,
    StrategyKind, StrategyRow, TradeRecommendation,
};
pub use setup::TradeSetup;
