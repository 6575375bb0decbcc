// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators the analyzer runs
// over each price series.  The per-bar functions return `Option<f64>` so
// callers are forced to handle the warm-up region where a value is undefined.

pub mod rsi;
pub mod sma;

use serde::{Deserialize, Serialize};

use crate::market_data::{PriceBar, PriceSeries};

/// Short-horizon moving average window.
pub const SMA_SHORT_WINDOW: usize = 20;
/// Long-horizon moving average window.
pub const SMA_LONG_WINDOW: usize = 50;
/// RSI lookback window.
pub const RSI_WINDOW: usize = 14;

/// One bar of the input series annotated with its indicator values.  Each
/// indicator is `None` until its own warm-up window is filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub bar: PriceBar,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub rsi_14: Option<f64>,
}

/// Annotate every bar of `series` with SMA-20, SMA-50 and RSI-14.
///
/// The output has exactly one row per input bar, in the same oldest-first
/// order.  The computation reads only the closes, so calling it twice on the
/// same series yields identical rows.
pub fn compute_indicators(series: &PriceSeries) -> Vec<IndicatorRow> {
    let closes = series.closes();
    let sma_20 = sma::sma_series(&closes, SMA_SHORT_WINDOW);
    let sma_50 = sma::sma_series(&closes, SMA_LONG_WINDOW);
    let rsi_14 = rsi::rsi_series(&closes, RSI_WINDOW);

    series
        .bars
        .iter()
        .enumerate()
        .map(|(i, bar)| IndicatorRow {
            bar: bar.clone(),
            sma_20: sma_20[i],
            sma_50: sma_50[i],
            rsi_14: rsi_14[i],
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Interval;
    use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

    fn ts(day: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_time(NaiveTime::MIN)
            + Duration::days(day)
    }

    fn series_from_closes(closes: &[f64]) -> PriceSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                timestamp: ts(i as i64),
                open: close,
                high: close + 0.001,
                low: close - 0.001,
                close,
            })
            .collect();
        PriceSeries::new("EUR/USD", Interval::Daily, bars)
    }

    #[test]
    fn empty_series_yields_no_rows() {
        let series = PriceSeries::empty("EUR/USD", Interval::Daily);
        assert!(compute_indicators(&series).is_empty());
    }

    #[test]
    fn one_row_per_bar_in_order() {
        let closes: Vec<f64> = (1..=60).map(|x| x as f64).collect();
        let series = series_from_closes(&closes);
        let rows = compute_indicators(&series);

        assert_eq!(rows.len(), series.len());
        for (row, bar) in rows.iter().zip(&series.bars) {
            assert_eq!(&row.bar, bar);
        }
    }

    #[test]
    fn warmup_boundaries_per_indicator() {
        let closes: Vec<f64> = (1..=60).map(|x| x as f64).collect();
        let rows = compute_indicators(&series_from_closes(&closes));

        // SMA-20 becomes defined at index 19, SMA-50 at 49, RSI-14 at 14.
        assert!(rows[18].sma_20.is_none());
        assert!(rows[19].sma_20.is_some());
        assert!(rows[48].sma_50.is_none());
        assert!(rows[49].sma_50.is_some());
        assert!(rows[13].rsi_14.is_none());
        assert!(rows[14].rsi_14.is_some());
    }

    #[test]
    fn short_series_keeps_undefined_columns() {
        // 30 bars: SMA-20 and RSI-14 become defined, SMA-50 never does.
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let rows = compute_indicators(&series_from_closes(&closes));

        assert_eq!(rows.len(), 30);
        assert!(rows.iter().all(|r| r.sma_50.is_none()));
        assert!(rows[29].sma_20.is_some());
        assert!(rows[29].rsi_14.is_some());
    }

    #[test]
    fn recompute_is_identical() {
        let closes: Vec<f64> = (1..=60).map(|x| (x as f64).sin() + 10.0).collect();
        let series = series_from_closes(&closes);
        assert_eq!(compute_indicators(&series), compute_indicators(&series));
    }
}
