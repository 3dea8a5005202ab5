//! Yahoo Finance client implementation.
//!
//! Uses the public chart and options endpoints. Responses are cached for
//! a short TTL so repeated refreshes of one setup do not hammer the
//! provider; transient failures retry with exponential backoff.

use super::{ChainQuote, MarketDataError, MarketDataSource, OptionChain};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30);

/// Yahoo Finance data source with a TTL response cache.
#[derive(Debug, Clone)]
pub struct YahooDataSource {
    client: Client,
    base_url: String,
    cache_ttl: Duration,
    cache: Arc<Mutex<HashMap<String, (Instant, serde_json::Value)>>>,
}

impl YahooDataSource {
    pub fn new(base_url: String, cache_ttl: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url,
            cache_ttl,
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Create with the public Yahoo endpoint and a 30 s cache.
    pub fn default_url() -> Self {
        Self::new(DEFAULT_BASE_URL.to_string(), DEFAULT_CACHE_TTL)
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value, MarketDataError> {
        if let Some(cached) = self.cache_lookup(url) {
            return Ok(cached);
        }

        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(20)),
            ..Default::default()
        };

        let value = retry(backoff, || async {
            let response = self
                .client
                .get(url)
                .header("User-Agent", "Mozilla/5.0")
                .send()
                .await
                .map_err(|e| backoff::Error::transient(MarketDataError::Network(e.to_string())))?;

            let status = response.status();
            if status == 429 {
                return Err(backoff::Error::transient(MarketDataError::RateLimited));
            }
            if status.is_server_error() {
                return Err(backoff::Error::transient(MarketDataError::Http {
                    status: status.as_u16(),
                    message: "Server error".to_string(),
                }));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(MarketDataError::Http {
                    status: status.as_u16(),
                    message: "Client error".to_string(),
                }));
            }

            response
                .json::<serde_json::Value>()
                .await
                .map_err(|e| backoff::Error::permanent(MarketDataError::Parse(e.to_string())))
        })
        .await?;

        self.cache_store(url, &value);
        Ok(value)
    }

    fn cache_lookup(&self, key: &str) -> Option<serde_json::Value> {
        let cache = self.cache.lock().unwrap();
        cache.get(key).and_then(|(at, value)| {
            (at.elapsed() < self.cache_ttl).then(|| value.clone())
        })
    }

    fn cache_store(&self, key: &str, value: &serde_json::Value) {
        let mut cache = self.cache.lock().unwrap();
        cache.insert(key.to_string(), (Instant::now(), value.clone()));
    }
}

#[async_trait]
impl MarketDataSource for YahooDataSource {
    async fn fetch_spot(&self, symbol: &str) -> Result<Option<f64>, MarketDataError> {
        debug!(symbol, "fetching spot");
        let url = format!(
            "{}/v8/finance/chart/{}?range=1d&interval=1m",
            self.base_url, symbol
        );
        let json = match self.get_json(&url).await {
            Ok(json) => json,
            // Unknown symbols are an absence, not a failure.
            Err(MarketDataError::Http { status: 404, .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        Ok(parse_spot(&json))
    }

    async fn fetch_option_chain(
        &self,
        symbol: &str,
        dte: u32,
    ) -> Result<Option<OptionChain>, MarketDataError> {
        debug!(symbol, dte, "fetching option chain");
        let url = format!("{}/v7/finance/options/{}", self.base_url, symbol);
        let json = match self.get_json(&url).await {
            Ok(json) => json,
            Err(MarketDataError::Http { status: 404, .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        let Some(expirations) = parse_expirations(&json) else {
            return Ok(None);
        };
        let target = Utc::now().timestamp() + dte as i64 * 86_400;
        let Some(&expiry_ts) = expirations
            .iter()
            .min_by_key(|&&ts| (ts - target).abs())
        else {
            return Ok(None);
        };

        // The bare endpoint already carries the nearest expiry's chain;
        // only refetch when a different listed date is closer.
        let json = if Some(expiry_ts) == default_expiry(&json) {
            json
        } else {
            let url = format!(
                "{}/v7/finance/options/{}?date={}",
                self.base_url, symbol, expiry_ts
            );
            self.get_json(&url).await?
        };

        match parse_chain(&json) {
            Ok(chain) => Ok(Some(chain)),
            Err(e) => {
                warn!(symbol, error = %e, "discarding unparseable chain");
                Ok(None)
            }
        }
    }

    async fn fetch_daily_closes(
        &self,
        symbol: &str,
        days: u32,
    ) -> Result<Vec<f64>, MarketDataError> {
        debug!(symbol, days, "fetching daily closes");
        let url = format!(
            "{}/v8/finance/chart/{}?range={}d&interval=1d",
            self.base_url,
            symbol,
            // A few extra sessions so weekends and holidays still leave
            // enough closes in the window.
            days + 5
        );
        let json = match self.get_json(&url).await {
            Ok(json) => json,
            Err(MarketDataError::Http { status: 404, .. }) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let mut closes = parse_closes(&json);
        let keep = days as usize;
        if closes.len() > keep {
            closes.drain(..closes.len() - keep);
        }
        Ok(closes)
    }
}

fn chart_result(json: &serde_json::Value) -> Option<&serde_json::Value> {
    json.get("chart")?.get("result")?.get(0)
}

fn parse_spot(json: &serde_json::Value) -> Option<f64> {
    let meta = chart_result(json)?.get("meta")?;
    meta.get("regularMarketPrice")
        .and_then(|v| v.as_f64())
        .or_else(|| meta.get("chartPreviousClose").and_then(|v| v.as_f64()))
}

fn parse_closes(json: &serde_json::Value) -> Vec<f64> {
    chart_result(json)
        .and_then(|r| r.get("indicators")?.get("quote")?.get(0)?.get("close"))
        .and_then(|c| c.as_array())
        .map(|closes| closes.iter().filter_map(|v| v.as_f64()).collect())
        .unwrap_or_default()
}

fn option_result(json: &serde_json::Value) -> Option<&serde_json::Value> {
    json.get("optionChain")?.get("result")?.get(0)
}

fn parse_expirations(json: &serde_json::Value) -> Option<Vec<i64>> {
    let dates = option_result(json)?.get("expirationDates")?.as_array()?;
    let parsed: Vec<i64> = dates.iter().filter_map(|v| v.as_i64()).collect();
    (!parsed.is_empty()).then_some(parsed)
}

fn default_expiry(json: &serde_json::Value) -> Option<i64> {
    option_result(json)?
        .get("options")?
        .get(0)?
        .get("expirationDate")?
        .as_i64()
}

fn parse_chain(json: &serde_json::Value) -> Result<OptionChain, MarketDataError> {
    let result =
        option_result(json).ok_or_else(|| MarketDataError::Parse("missing result".to_string()))?;
    let options = result
        .get("options")
        .and_then(|o| o.get(0))
        .ok_or_else(|| MarketDataError::Parse("missing options".to_string()))?;

    let expiry_ts = options
        .get("expirationDate")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| MarketDataError::Parse("missing expirationDate".to_string()))?;
    let expiry = DateTime::<Utc>::from_timestamp(expiry_ts, 0)
        .ok_or_else(|| MarketDataError::Parse(format!("bad expiry timestamp {}", expiry_ts)))?
        .date_naive();

    let underlying_price = result
        .get("quote")
        .and_then(|q| q.get("regularMarketPrice"))
        .and_then(|v| v.as_f64());

    Ok(OptionChain {
        expiry,
        underlying_price,
        calls: parse_quotes(options.get("calls")),
        puts: parse_quotes(options.get("puts")),
    })
}

fn parse_quotes(side: Option<&serde_json::Value>) -> Vec<ChainQuote> {
    let Some(rows) = side.and_then(|s| s.as_array()) else {
        return Vec::new();
    };
    rows.iter()
        .filter_map(|row| {
            Some(ChainQuote {
                strike: row.get("strike")?.as_f64()?,
                bid: row.get("bid").and_then(|v| v.as_f64()),
                ask: row.get("ask").and_then(|v| v.as_f64()),
                last_price: row.get("lastPrice").and_then(|v| v.as_f64()),
                volume: row.get("volume").and_then(|v| v.as_u64()),
                open_interest: row.get("openInterest").and_then(|v| v.as_u64()),
                implied_volatility: row.get("impliedVolatility").and_then(|v| v.as_f64()),
            })
        })
        .collect()
}
