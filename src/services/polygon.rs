// src/services/polygon.rs
use anyhow::Context;
use chrono::NaiveDate;
use log::{error, info};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::env;
use std::fmt;

use crate::models::{DividendEvent, SplitEvent};

const DEFAULT_BASE_URL: &str = "https://api.polygon.io";

/// Failures originating at the market-data vendor. These propagate unchanged
/// through the compute pipeline so the boundary layer can pick the transport
/// status; nothing here is retried or swallowed.
#[derive(Debug)]
pub enum MarketDataError {
    RateLimited,
    SymbolNotSupported(String),
    Upstream(reqwest::Error),
}

impl fmt::Display for MarketDataError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MarketDataError::RateLimited => write!(f, "Polygon API rate limit exceeded"),
            MarketDataError::SymbolNotSupported(symbol) => {
                write!(f, "Symbol not supported: {}", symbol)
            }
            MarketDataError::Upstream(err) => write!(f, "Upstream market-data error: {}", err),
        }
    }
}

impl std::error::Error for MarketDataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MarketDataError::Upstream(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MarketDataError {
    fn from(err: reqwest::Error) -> Self {
        MarketDataError::Upstream(err)
    }
}

#[derive(Deserialize)]
struct DividendHistoryResponse {
    results: Option<Vec<DividendEvent>>,
}

#[derive(Deserialize)]
struct SplitHistoryResponse {
    results: Option<Vec<SplitEvent>>,
}

#[derive(Deserialize)]
struct PrevCloseResponse {
    results: Option<Vec<PrevCloseBar>>,
}

#[derive(Deserialize)]
struct PrevCloseBar {
    #[serde(rename = "c")]
    close: f64,
}

/// Thin client for the Polygon REST API. Holds one shared reqwest client;
/// every call is independent, with no caching or cross-request state.
pub struct PolygonClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl PolygonClient {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = env::var("POLYGON_API_KEY")
            .context("POLYGON_API_KEY environment variable is required")?;
        let base_url =
            env::var("POLYGON_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            http: Client::new(),
            base_url,
            api_key,
        })
    }

    async fn get_json<T>(
        &self,
        symbol: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, MarketDataError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => {
                error!("Polygon rate limit hit while fetching {}", path);
                return Err(MarketDataError::RateLimited);
            }
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => {
                error!("Polygon rejected symbol {} on {}", symbol, path);
                return Err(MarketDataError::SymbolNotSupported(symbol.to_string()));
            }
            _ => {}
        }

        let response = response.error_for_status()?;
        Ok(response.json::<T>().await?)
    }

    /// Previous-day close for the symbol. A payload with no bars is reported
    /// as a zero price, which the composer turns into an invalid result.
    pub async fn fetch_current_price(&self, symbol: &str) -> Result<f64, MarketDataError> {
        let path = format!("/v2/aggs/ticker/{}/prev", symbol);
        let payload: PrevCloseResponse = self
            .get_json(symbol, &path, &[("adjusted", "true".to_string())])
            .await?;

        let price = payload
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|bar| bar.close)
            .unwrap_or(0.0);

        info!("Fetched current price for {}: {}", symbol, price);
        Ok(price)
    }

    /// Dividend events with an ex-date on or after `from_date`.
    pub async fn fetch_dividend_history(
        &self,
        symbol: &str,
        from_date: NaiveDate,
    ) -> Result<Vec<DividendEvent>, MarketDataError> {
        let payload: DividendHistoryResponse = self
            .get_json(
                symbol,
                "/v3/reference/dividends",
                &[
                    ("ticker", symbol.to_string()),
                    ("ex_dividend_date.gte", from_date.to_string()),
                    ("limit", "1000".to_string()),
                ],
            )
            .await?;

        let dividends = payload.results.unwrap_or_default();
        info!("Fetched {} dividend events for {}", dividends.len(), symbol);
        Ok(dividends)
    }

    /// Splits executed on or after `from_date`.
    pub async fn fetch_split_history(
        &self,
        symbol: &str,
        from_date: NaiveDate,
    ) -> Result<Vec<SplitEvent>, MarketDataError> {
        let payload: SplitHistoryResponse = self
            .get_json(
                symbol,
                "/v3/reference/splits",
                &[
                    ("ticker", symbol.to_string()),
                    ("execution_date.gte", from_date.to_string()),
                    ("limit", "100".to_string()),
                ],
            )
            .await?;

        let splits = payload.results.unwrap_or_default();
        info!("Fetched {} split events for {}", splits.len(), symbol);
        Ok(splits)
    }
}
