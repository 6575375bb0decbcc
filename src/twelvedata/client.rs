// =============================================================================
// Twelve Data REST API Client (/time_series endpoint)
// =============================================================================
//
// SECURITY: The API key travels as the `apikey` query parameter, so request
// URLs are never logged. Vendor failures arrive two ways: an HTTP error
// status, or an HTTP 200 whose JSON carries `"status": "error"`; both are
// normalised into `Err`.
// =============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::market_data::{PriceBar, PriceSeries};
use crate::source::PriceSource;
use crate::types::Interval;

/// Production endpoint.
const DEFAULT_BASE_URL: &str = "https://api.twelvedata.com";

/// Exchange selector sent with every request; keeps symbol lookups on forex.
const FOREX_EXCHANGE: &str = "forex";

/// Twelve Data REST client for historical forex series.
#[derive(Clone)]
pub struct TwelveDataClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl TwelveDataClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Create a client against the production endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom endpoint.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");

        let base_url = base_url.into();
        debug!(base_url = %base_url, "TwelveDataClient initialised");

        Self {
            api_key: api_key.into(),
            base_url,
            client,
        }
    }
}

#[async_trait]
impl PriceSource for TwelveDataClient {
    /// GET /time_series: historical OHLC bars, newest-first on the wire.
    #[instrument(skip(self), name = "twelvedata::time_series")]
    async fn time_series(
        &self,
        symbol: &str,
        interval: Interval,
        outputsize: u32,
    ) -> Result<PriceSeries> {
        let url = format!("{}/time_series", self.base_url);
        let query = [
            ("symbol", symbol.to_string()),
            ("interval", interval.api_code().to_string()),
            ("outputsize", outputsize.to_string()),
            ("exchange", FOREX_EXCHANGE.to_string()),
            ("apikey", self.api_key.clone()),
        ];

        let resp = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .context("GET /time_series request failed")?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .context("failed to read time_series response body")?;

        if !status.is_success() {
            anyhow::bail!("Twelve Data GET /time_series returned {status}: {body}");
        }

        let series = parse_time_series(symbol, interval, &body)?;
        debug!(symbol, interval = %interval, bars = series.len(), "time series fetched");
        Ok(series)
    }
}

impl std::fmt::Debug for TwelveDataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwelveDataClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Response parsing
// -----------------------------------------------------------------------------

/// JSON envelope returned by GET /time_series.  Error responses reuse the
/// same shape with `status == "error"` and no `values`.
#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    values: Vec<RawBar>,
}

/// One OHLC row as the vendor sends it: every numeric field is a string.
#[derive(Debug, Deserialize)]
struct RawBar {
    datetime: String,
    open: String,
    high: String,
    low: String,
    close: String,
}

/// Parse a /time_series response body into a normalised series.
fn parse_time_series(symbol: &str, interval: Interval, body: &str) -> Result<PriceSeries> {
    let resp: TimeSeriesResponse =
        serde_json::from_str(body).context("failed to parse time_series response")?;

    if resp.status.as_deref() == Some("error") {
        anyhow::bail!(
            "Twelve Data error {}: {}",
            resp.code.unwrap_or(0),
            resp.message.unwrap_or_else(|| "unknown error".to_string())
        );
    }

    let mut bars = Vec::with_capacity(resp.values.len());
    for raw in &resp.values {
        bars.push(parse_bar(raw)?);
    }

    Ok(PriceSeries::new(symbol, interval, bars))
}

fn parse_bar(raw: &RawBar) -> Result<PriceBar> {
    Ok(PriceBar {
        timestamp: parse_datetime(&raw.datetime)?,
        open: parse_price("open", &raw.open)?,
        high: parse_price("high", &raw.high)?,
        low: parse_price("low", &raw.low)?,
        close: parse_price("close", &raw.close)?,
    })
}

/// Daily rows come as `2024-03-08`, intraday rows as `2024-03-08 15:00:00`.
fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("failed to parse datetime '{s}'"))?;
    Ok(date.and_time(NaiveTime::MIN))
}

/// The vendor sends prices as JSON strings.
fn parse_price(name: &str, value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .with_context(|| format!("failed to parse {name} '{value}' as f64"))
}
