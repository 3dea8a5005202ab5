//! Market data abstraction: spot quotes, option-chain snapshots and
//! daily closes from an external provider.
//!
//! Implementations own all blocking concerns (network, retry/backoff,
//! rate limiting, caching); values are complete before they reach the
//! engine. Every fetch is best-effort: a missing quote is `Ok(None)`,
//! and callers are expected to fall back to manually supplied prices.

use crate::domain::{Instrument, OptionType};
use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

pub mod mock;
pub mod yahoo;

pub use mock::MockDataSource;
pub use yahoo::YahooDataSource;

/// Provider ticker for an instrument.
pub fn ticker(instrument: Instrument) -> &'static str {
    match instrument {
        Instrument::Spy => "SPY",
        Instrument::Xsp => "^XSP",
        Instrument::Es => "ES=F",
        Instrument::Spx => "^GSPC",
    }
}

/// CBOE volatility index ticker, tracked alongside the instrument set.
pub const VIX_TICKER: &str = "^VIX";

/// Default volatility assumption when neither a chain nor history is
/// available.
pub const DEFAULT_VOLATILITY: f64 = 0.20;

/// One strike row of an option-chain snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainQuote {
    pub strike: f64,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub last_price: Option<f64>,
    pub volume: Option<u64>,
    pub open_interest: Option<u64>,
    pub implied_volatility: Option<f64>,
}

impl ChainQuote {
    /// Mid price when both sides are quoted, else the last trade.
    pub fn mid_price(&self) -> Option<f64> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) if bid > 0.0 && ask > 0.0 => Some((bid + ask) / 2.0),
            _ => self.last_price,
        }
    }
}

/// Option chain snapshot for one symbol and expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionChain {
    pub expiry: NaiveDate,
    pub underlying_price: Option<f64>,
    pub calls: Vec<ChainQuote>,
    pub puts: Vec<ChainQuote>,
}

impl OptionChain {
    /// The quoted strike nearest to a requested one.
    pub fn quote_near(&self, option_type: OptionType, strike: f64) -> Option<&ChainQuote> {
        let side = match option_type {
            OptionType::Call => &self.calls,
            OptionType::Put => &self.puts,
        };
        side.iter().min_by(|a, b| {
            (a.strike - strike)
                .abs()
                .partial_cmp(&(b.strike - strike).abs())
                .unwrap()
        })
    }

    /// Mean implied volatility of quotes within 2% of spot, both sides.
    pub fn atm_implied_vol(&self, spot: f64) -> Option<f64> {
        let lower = spot * 0.98;
        let upper = spot * 1.02;
        let ivs: Vec<f64> = self
            .calls
            .iter()
            .chain(self.puts.iter())
            .filter(|q| q.strike >= lower && q.strike <= upper)
            .filter_map(|q| q.implied_volatility)
            .collect();
        if ivs.is_empty() {
            return None;
        }
        Some(ivs.iter().sum::<f64>() / ivs.len() as f64)
    }
}

/// Error type for market data operations.
#[derive(Debug, Clone, Error)]
pub enum MarketDataError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Rate limited")]
    RateLimited,
}

/// Market data source trait.
///
/// Implementations must handle retry/backoff and caching internally; a
/// symbol the provider cannot quote right now is `Ok(None)`, not an
/// error.
#[async_trait]
pub trait MarketDataSource: Send + Sync + fmt::Debug {
    /// Current price for a provider ticker, if available.
    async fn fetch_spot(&self, symbol: &str) -> Result<Option<f64>, MarketDataError>;

    /// Option-chain snapshot for the listed expiry nearest `dte` days
    /// out, if the symbol has listed options.
    async fn fetch_option_chain(
        &self,
        symbol: &str,
        dte: u32,
    ) -> Result<Option<OptionChain>, MarketDataError>;

    /// Most recent daily closes, oldest first.
    async fn fetch_daily_closes(
        &self,
        symbol: &str,
        days: u32,
    ) -> Result<Vec<f64>, MarketDataError>;
}

/// Annualized close-to-close volatility from a daily price series.
/// Needs at least two usable returns; ignores non-positive prints.
pub fn historical_volatility(closes: &[f64]) -> Option<f64> {
    let returns: Vec<f64> = closes
        .windows(2)
        .filter(|w| w[0] > 0.0 && w[1] > 0.0)
        .map(|w| (w[1] / w[0]).ln())
        .collect();
    if returns.len() < 2 {
        return None;
    }
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance =
        returns.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / returns.len() as f64;
    Some(variance.sqrt() * (252.0_f64).sqrt())
}

/// Best-effort implied-volatility estimate for a symbol: mean ATM chain
/// IV, else realized volatility over the last month of closes, else the
/// caller's flat default.
pub async fn implied_vol_estimate(
    source: &dyn MarketDataSource,
    symbol: &str,
    spot: f64,
    dte: u32,
    default_vol: f64,
) -> f64 {
    if let Ok(Some(chain)) = source.fetch_option_chain(symbol, dte).await {
        if let Some(iv) = chain.atm_implied_vol(spot) {
            return iv;
        }
    }
    if let Ok(closes) = source.fetch_daily_closes(symbol, 25).await {
        if let Some(hv) = historical_volatility(&closes) {
            return hv;
        }
    }
    default_vol
}

/// Concurrent spot snapshot of the instrument set plus VIX. Symbols the
/// provider cannot quote are omitted; XSP falls back to SPY x 10.
pub async fn snapshot_prices(source: &dyn MarketDataSource) -> HashMap<String, f64> {
    let symbols: Vec<(&str, &str)> = Instrument::ALL
        .iter()
        .map(|&i| (i.as_str(), ticker(i)))
        .chain(std::iter::once(("VIX", VIX_TICKER)))
        .collect();

    let fetches = symbols
        .iter()
        .map(|(_, provider)| source.fetch_spot(provider));
    let results = join_all(fetches).await;

    let mut prices = HashMap::new();
    for ((name, _), result) in symbols.iter().zip(results) {
        if let Ok(Some(price)) = result {
            prices.insert(name.to_string(), price);
        }
    }
    if !prices.contains_key("XSP") {
        if let Some(spy) = prices.get("SPY").copied() {
            prices.insert("XSP".to_string(), spy * 10.0);
        }
    }
    prices
}
