// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// The SMA at a bar is the arithmetic mean of the trailing `window` closes,
// that bar's close included.  The value is undefined until a full window of
// history exists, so a series produces `None` for its first `window - 1` bars.
// =============================================================================

/// Compute the aligned SMA series for the given `closes` and `window`.
///
/// The returned vector always has the same length as `closes`; position `i`
/// holds `Some(mean)` once `i + 1 >= window` and `None` before that.
///
/// # Edge cases
/// - `window == 0` => all `None` (a zero-width mean is meaningless)
/// - `closes.len() < window` => all `None`
pub fn sma_series(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; closes.len()];
    }

    let mut out = Vec::with_capacity(closes.len());
    for i in 0..closes.len() {
        if i + 1 >= window {
            let sum: f64 = closes[i + 1 - window..=i].iter().sum();
            out.push(Some(sum / window as f64));
        } else {
            out.push(None);
        }
    }
    out
}
