//! Mock market data source for testing without network calls.

use super::{MarketDataError, MarketDataSource, OptionChain};
use async_trait::async_trait;
use std::collections::HashMap;

/// Mock data source returning predefined quotes, chains and closes.
#[derive(Debug, Clone, Default)]
pub struct MockDataSource {
    spots: HashMap<String, f64>,
    chains: HashMap<String, OptionChain>,
    closes: HashMap<String, Vec<f64>>,
}

impl MockDataSource {
    /// Create a new mock data source with no data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the spot price returned for a provider ticker.
    pub fn with_spot(mut self, symbol: &str, price: f64) -> Self {
        self.spots.insert(symbol.to_string(), price);
        self
    }

    /// Set the option chain returned for a provider ticker.
    pub fn with_chain(mut self, symbol: &str, chain: OptionChain) -> Self {
        self.chains.insert(symbol.to_string(), chain);
        self
    }

    /// Set the daily close series returned for a provider ticker.
    pub fn with_closes(mut self, symbol: &str, closes: Vec<f64>) -> Self {
        self.closes.insert(symbol.to_string(), closes);
        self
    }
}

#[async_trait]
impl MarketDataSource for MockDataSource {
    async fn fetch_spot(&self, symbol: &str) -> Result<Option<f64>, MarketDataError> {
        Ok(self.spots.get(symbol).copied())
    }

    async fn fetch_option_chain(
        &self,
        symbol: &str,
        _dte: u32,
    ) -> Result<Option<OptionChain>, MarketDataError> {
        Ok(self.chains.get(symbol).cloned())
    }

    async fn fetch_daily_closes(
        &self,
        symbol: &str,
        days: u32,
    ) -> Result<Vec<f64>, MarketDataError> {
        let closes = self.closes.get(symbol).cloned().unwrap_or_default();
        let keep = days as usize;
        if closes.len() > keep {
            Ok(closes[closes.len() - keep..].to_vec())
        } else {
            Ok(closes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_spot() {
        let mock = MockDataSource::new().with_spot("SPY", 580.25);
        assert_eq!(mock.fetch_spot("SPY").await.unwrap(), Some(580.25));
        assert_eq!(mock.fetch_spot("ES=F").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_mock_closes_trimmed_to_window() {
        let mock = MockDataSource::new().with_closes("SPY", (1..=30).map(|i| i as f64).collect());
        let closes = mock.fetch_daily_closes("SPY", 5).await.unwrap();
        assert_eq!(closes, vec![26.0, 27.0, 28.0, 29.0, 30.0]);
    }

    #[tokio::test]
    async fn test_mock_chain_absent() {
        let mock = MockDataSource::new();
        assert!(mock.fetch_option_chain("SPY", 0).await.unwrap().is_none());
    }
}
