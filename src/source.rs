// =============================================================================
// Price source abstraction
// =============================================================================

use anyhow::Result;
use async_trait::async_trait;

use crate::market_data::PriceSeries;
use crate::types::Interval;

/// A provider of historical OHLC data for currency pairs.
///
/// The production implementation talks to the Twelve Data REST API; tests
/// substitute in-memory sources to drive the retry and caching paths
/// deterministically.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch up to `outputsize` bars for `symbol` at `interval`.
    ///
    /// A successful response with no bars is a valid result and comes back as
    /// an empty series; transport and vendor errors come back as `Err`.
    async fn time_series(
        &self,
        symbol: &str,
        interval: Interval,
        outputsize: u32,
    ) -> Result<PriceSeries>;
}
