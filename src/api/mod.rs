pub mod comparison;
pub mod health;
pub mod levels;
pub mod market;
pub mod recommendation;
pub mod setup;
pub mod spreads;

use crate::config::Config;
use crate::datasource::MarketDataSource;
use crate::engine::{
    LevelConverter, PricingEngine, SpreadBuilder, StrategyComparator, StrikeSelector,
};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub datasource: Arc<dyn MarketDataSource>,
    pub pricing: PricingEngine,
    pub converter: LevelConverter,
    pub selector: StrikeSelector,
    pub spreads: SpreadBuilder,
    pub comparator: StrategyComparator,
}

impl AppState {
    pub fn new(config: Config, datasource: Arc<dyn MarketDataSource>) -> Self {
        let params = config.engine_params();
        Self {
            config,
            datasource,
            pricing: PricingEngine::new(params.risk_free_rate),
            converter: LevelConverter::new(&params),
            selector: StrikeSelector::new(&params),
            spreads: SpreadBuilder::new(&params),
            comparator: StrategyComparator::new(&params),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/market", get(market::get_market))
        .route("/v1/levels", get(levels::get_levels))
        .route("/v1/recommendation", get(recommendation::get_recommendation))
        .route("/v1/spreads", get(spreads::get_spreads))
        .route("/v1/comparison", get(comparison::get_comparison))
        .layer(cors)
        .with_state(state)
}
