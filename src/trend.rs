// =============================================================================
// Trend Classification
// =============================================================================
//
// Classifies the direction and strength of a symbol's recent move from its
// indicator rows.
//
// Decision rule (percent change over the last 20 bars):
//   direction:  > +1%  => Bullish,   < -1% => Bearish,   otherwise Sideways
//   strength:   |change| > 5% => Strong,  > 2% => Moderate,  else Weak

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::indicators::IndicatorRow;
use crate::types::{RsiZone, TrendDirection, TrendStrength};

/// How many bars back the current close is compared against.
pub const TREND_LOOKBACK: usize = 20;
/// Minimum rows needed to classify (the lookback bar plus the current one).
pub const MIN_TREND_ROWS: usize = TREND_LOOKBACK + 1;

const INSIGHT_STRONG_BULLISH: &str =
    "Strong bullish trend detected. Consider buying opportunities.";
const INSIGHT_STRONG_BEARISH: &str =
    "Strong bearish trend detected. Consider selling opportunities.";
const INSIGHT_OVERBOUGHT: &str =
    "Market may be overbought. Consider taking profits or short entries.";
const INSIGHT_OVERSOLD: &str = "Market may be oversold. Consider buying opportunities.";
const INSIGHT_NO_SIGNAL: &str =
    "No strong signals detected. Market may be in consolidation phase.";

/// Full verdict for a single symbol's series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendVerdict {
    pub direction: TrendDirection,
    pub strength: TrendStrength,
    /// Percent change over the lookback, rounded to two decimals.  `None`
    /// when there was not enough history to classify.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<f64>,
    /// Final RSI reading rounded to two decimals, 0.0 when the last window
    /// was undefined.  `None` when there was not enough history to classify.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsi_value: Option<f64>,
}

impl TrendVerdict {
    fn unknown() -> Self {
        Self {
            direction: TrendDirection::Unknown,
            strength: TrendStrength::Unknown,
            change_percent: None,
            rsi_value: None,
        }
    }

    /// Zone of the final RSI reading, when one exists.
    pub fn rsi_zone(&self) -> Option<RsiZone> {
        self.rsi_value.map(RsiZone::from_value)
    }

    /// One-line trading note derived from the verdict.
    pub fn insight(&self) -> &'static str {
        if self.direction == TrendDirection::Unknown {
            return INSIGHT_NO_SIGNAL;
        }
        let rsi = self.rsi_value.unwrap_or(0.0);
        match (self.direction, self.strength) {
            (TrendDirection::Bullish, TrendStrength::Strong) => INSIGHT_STRONG_BULLISH,
            (TrendDirection::Bearish, TrendStrength::Strong) => INSIGHT_STRONG_BEARISH,
            _ if rsi > 70.0 => INSIGHT_OVERBOUGHT,
            _ if rsi < 30.0 => INSIGHT_OVERSOLD,
            _ => INSIGHT_NO_SIGNAL,
        }
    }
}

/// Classify the trend for a series of indicator rows (oldest-first).
///
/// Returns an unknown verdict when fewer than [`MIN_TREND_ROWS`] rows exist.
/// Direction and strength thresholds compare the raw percent change; only the
/// reported fields are rounded.
pub fn classify_trend(rows: &[IndicatorRow]) -> TrendVerdict {
    if rows.len() < MIN_TREND_ROWS {
        debug!(
            rows = rows.len(),
            "trend classification: insufficient data (need >= 21 rows)"
        );
        return TrendVerdict::unknown();
    }

    let last = &rows[rows.len() - 1];
    let price_now = last.bar.close;
    // Falls back to the first row when fewer than a full lookback of prior
    // bars exists.
    let price_then = rows[rows.len().saturating_sub(MIN_TREND_ROWS)].bar.close;
    let change = (price_now - price_then) / price_then * 100.0;

    let direction = if change > 1.0 {
        TrendDirection::Bullish
    } else if change < -1.0 {
        TrendDirection::Bearish
    } else {
        TrendDirection::Sideways
    };

    let strength = if change.abs() > 5.0 {
        TrendStrength::Strong
    } else if change.abs() > 2.0 {
        TrendStrength::Moderate
    } else {
        TrendStrength::Weak
    };

    let rsi_value = last.rsi_14.map(round_2dp).unwrap_or(0.0);

    debug!(
        direction = %direction,
        strength = %strength,
        change_percent = format!("{change:.2}"),
        rsi = format!("{rsi_value:.2}"),
        "trend classification complete"
    );

    TrendVerdict {
        direction,
        strength,
        change_percent: Some(round_2dp(change)),
        rsi_value: Some(rsi_value),
    }
}

/// Round to two decimals for reporting.
fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
