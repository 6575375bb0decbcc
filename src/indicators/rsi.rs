// =============================================================================
// Relative Strength Index (RSI), rolling-mean variant
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1: compute price changes (deltas) from consecutive closes.
// Step 2: split each delta into a gain (delta when positive, else 0) and a
//         loss (|delta| when negative, else 0).
// Step 3: average the trailing `window` gains and losses with a plain
//         rolling mean.  No exponential smoothing is applied, so each value
//         depends only on its own window.
// Step 4: RS  = mean_gain / mean_loss
//         RSI = 100 - 100 / (1 + RS)
//
// Thresholds:  RSI > 70 => overbought,  RSI < 30 => oversold.
// =============================================================================

/// Compute the aligned RSI series for the given `closes` and `window`.
///
/// The returned vector always has the same length as `closes`; position `i`
/// holds `Some(rsi)` once a full window of deltas is available (`i >= window`)
/// and `None` before that.
///
/// # Edge cases
/// - `window == 0` => all `None`
/// - `closes.len() < window + 1` => all `None` (need `window` deltas)
/// - A window with losses but no gains yields 0, and one with gains but no
///   losses saturates at 100.
/// - A perfectly flat window has no gains and no losses, which leaves RS
///   undefined; the value stays `None`.
pub fn rsi_series(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if window == 0 || closes.len() < window + 1 {
        return out;
    }

    let window_f = window as f64;
    for i in window..closes.len() {
        // Trailing deltas for closes[i - window + 1 ..= i].
        let mut sum_gain = 0.0_f64;
        let mut sum_loss = 0.0_f64;
        for j in (i + 1 - window)..=i {
            let delta = closes[j] - closes[j - 1];
            if delta > 0.0 {
                sum_gain += delta;
            } else {
                sum_loss += delta.abs();
            }
        }

        out[i] = rsi_from_means(sum_gain / window_f, sum_loss / window_f);
    }

    out
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert mean gain / mean loss into an RSI value in [0, 100].
///
/// - If both means are zero the ratio is 0/0, so there is no value.
/// - If mean loss is zero (only gains), RSI saturates at 100.0.
/// - Returns `None` when the result is non-finite.
fn rsi_from_means(mean_gain: f64, mean_loss: f64) -> Option<f64> {
    if mean_loss == 0.0 && mean_gain == 0.0 {
        return None;
    }

    let rsi = if mean_loss == 0.0 {
        100.0
    } else {
        let rs = mean_gain / mean_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    if rsi.is_finite() {
        Some(rsi)
    } else {
        None
    }
}
