use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::Interval;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single OHLC bar from the vendor time-series feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Headline price statistics for a series, rounded to five decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub last_close: f64,
    pub period_high: f64,
    pub period_low: f64,
}

// ---------------------------------------------------------------------------
// PriceSeries -- chronologically ordered bars for one (symbol, interval)
// ---------------------------------------------------------------------------

/// A run of OHLC bars for one `(symbol, interval)` pair, held oldest-first.
/// Construct through [`PriceSeries::new`] so ordering and uniqueness hold
/// regardless of the order the vendor returned the bars in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub interval: Interval,
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series from bars in any order. Bars are sorted oldest-first and
    /// duplicate timestamps are dropped, keeping the first occurrence.
    pub fn new(symbol: impl Into<String>, interval: Interval, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        bars.dedup_by_key(|b| b.timestamp);
        Self {
            symbol: symbol.into(),
            interval,
            bars,
        }
    }

    /// An empty series that still carries the identity of the request.
    pub fn empty(symbol: impl Into<String>, interval: Interval) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            bars: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Close prices, oldest-first.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Close price of the most recent bar, if any.
    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    /// Latest close plus the high/low over the whole series. Returns `None`
    /// for an empty series.
    pub fn summary(&self) -> Option<PriceSummary> {
        let last_close = self.last_close()?;
        let period_high = self.bars.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let period_low = self.bars.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        Some(PriceSummary {
            last_close: round_5dp(last_close),
            period_high: round_5dp(period_high),
            period_low: round_5dp(period_low),
        })
    }
}

/// Major-pair quotes carry five decimal places, so summary stats keep the same
/// precision.
fn round_5dp(value: f64) -> f64 {
    (value * 100_000.0).round() / 100_000.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveTime};

    fn ts(day: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_time(NaiveTime::MIN)
            + Duration::days(day)
    }

    fn bar(day: i64, close: f64) -> PriceBar {
        PriceBar {
            timestamp: ts(day),
            open: close - 0.001,
            high: close + 0.002,
            low: close - 0.002,
            close,
        }
    }

    #[test]
    fn new_sorts_oldest_first() {
        // Vendor responses arrive newest-first.
        let series = PriceSeries::new(
            "EUR/USD",
            Interval::Daily,
            vec![bar(2, 1.09), bar(0, 1.07), bar(1, 1.08)],
        );
        assert_eq!(series.closes(), vec![1.07, 1.08, 1.09]);
        assert_eq!(series.last_close(), Some(1.09));
    }

    #[test]
    fn new_drops_duplicate_timestamps_keeping_first() {
        let series = PriceSeries::new(
            "EUR/USD",
            Interval::Daily,
            vec![bar(0, 1.07), bar(1, 1.08), bar(1, 9.99)],
        );
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![1.07, 1.08]);
    }

    #[test]
    fn empty_series_has_no_summary() {
        let series = PriceSeries::empty("GBP/USD", Interval::Hourly);
        assert!(series.is_empty());
        assert_eq!(series.last_close(), None);
        assert!(series.summary().is_none());
    }

    #[test]
    fn summary_covers_whole_series_and_rounds() {
        let mut bars = vec![bar(0, 1.071239), bar(1, 1.085551), bar(2, 1.080004)];
        bars[1].high = 1.091237;
        bars[0].low = 1.0644444;
        let series = PriceSeries::new("EUR/USD", Interval::Daily, bars);

        let summary = series.summary().expect("non-empty series");
        assert!((summary.last_close - 1.08).abs() < 1e-12);
        assert!((summary.period_high - 1.09124).abs() < 1e-12);
        assert!((summary.period_low - 1.06444).abs() < 1e-12);
    }
}
