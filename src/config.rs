//! Runtime configuration loaded from the environment.

use crate::engine::EngineParams;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    /// Base URL of the market-data provider.
    pub data_api_url: String,
    /// Seconds a fetched quote or chain stays fresh.
    pub cache_ttl_secs: u64,
    /// Volatility assumption when no live estimate is available.
    pub default_implied_vol: f64,
    pub risk_free_rate: f64,
    pub dividend_yield: f64,
    pub futures_carry_days: f64,
    pub min_probability: f64,
    pub max_contracts: u32,
    pub target_time_fraction: f64,
    pub butterfly_wing_pct: f64,
    pub kelly_fraction: f64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            data_api_url: "https://query1.finance.yahoo.com".to_string(),
            cache_ttl_secs: 30,
            default_implied_vol: 0.20,
            risk_free_rate: 0.0525,
            dividend_yield: 0.0142,
            futures_carry_days: 30.0,
            min_probability: 0.25,
            max_contracts: 100,
            target_time_fraction: 0.5,
            butterfly_wing_pct: 0.02,
            kelly_fraction: 0.25,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let port = parse_or(&env_map, "PORT", defaults.port)?;
        let data_api_url = env_map
            .get("DATA_API_URL")
            .cloned()
            .unwrap_or(defaults.data_api_url);
        let cache_ttl_secs = parse_or(&env_map, "CACHE_TTL_SECS", defaults.cache_ttl_secs)?;
        let default_implied_vol =
            parse_or(&env_map, "DEFAULT_IMPLIED_VOL", defaults.default_implied_vol)?;
        let risk_free_rate = parse_or(&env_map, "RISK_FREE_RATE", defaults.risk_free_rate)?;
        let dividend_yield = parse_or(&env_map, "DIVIDEND_YIELD", defaults.dividend_yield)?;
        let futures_carry_days =
            parse_or(&env_map, "FUTURES_CARRY_DAYS", defaults.futures_carry_days)?;
        let min_probability = parse_or(&env_map, "MIN_PROBABILITY", defaults.min_probability)?;
        let max_contracts = parse_or(&env_map, "MAX_CONTRACTS", defaults.max_contracts)?;
        let target_time_fraction =
            parse_or(&env_map, "TARGET_TIME_FRACTION", defaults.target_time_fraction)?;
        let butterfly_wing_pct =
            parse_or(&env_map, "BUTTERFLY_WING_PCT", defaults.butterfly_wing_pct)?;
        let kelly_fraction = parse_or(&env_map, "KELLY_FRACTION", defaults.kelly_fraction)?;

        if !(0.0..=1.0).contains(&min_probability) {
            return Err(ConfigError::InvalidValue(
                "MIN_PROBABILITY".to_string(),
                "must be within [0, 1]".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&target_time_fraction) || target_time_fraction == 0.0 {
            return Err(ConfigError::InvalidValue(
                "TARGET_TIME_FRACTION".to_string(),
                "must be within (0, 1]".to_string(),
            ));
        }
        if default_implied_vol <= 0.0 {
            return Err(ConfigError::InvalidValue(
                "DEFAULT_IMPLIED_VOL".to_string(),
                "must be positive".to_string(),
            ));
        }
        if max_contracts == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_CONTRACTS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Config {
            port,
            data_api_url,
            cache_ttl_secs,
            default_implied_vol,
            risk_free_rate,
            dividend_yield,
            futures_carry_days,
            min_probability,
            max_contracts,
            target_time_fraction,
            butterfly_wing_pct,
            kelly_fraction,
        })
    }

    /// Engine parameters for component construction.
    pub fn engine_params(&self) -> EngineParams {
        EngineParams {
            risk_free_rate: self.risk_free_rate,
            dividend_yield: self.dividend_yield,
            futures_carry_days: self.futures_carry_days,
            min_probability: self.min_probability,
            max_contracts: self.max_contracts,
            target_time_fraction: self.target_time_fraction,
            butterfly_wing_pct: self.butterfly_wing_pct,
            kelly_fraction: self.kelly_fraction,
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    env_map: &HashMap<String, String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match env_map.get(key) {
        None => Ok(default),
        Some(raw) => raw.parse::<T>().map_err(|_| {
            ConfigError::InvalidValue(
                key.to_string(),
                format!("could not parse {:?}", raw),
            )
        }),
    }
}
