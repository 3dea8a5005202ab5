pub mod api;
pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;

pub use config::Config;
pub use datasource::{MarketDataError, MarketDataSource, MockDataSource, YahooDataSource};
pub use domain::{
    Greeks, Instrument, InstrumentLevels, OptionType, PriceLevels, SpreadRecommendation,
    StrategyComparison, TradeDirection, TradeRecommendation, TradeSetup,
};
pub use engine::{
    EngineParams, LevelConverter, MonteCarloPricer, PricingEngine, SpreadBuilder,
    StrategyComparator, StrikeSelector,
};
pub use error::AppError;
