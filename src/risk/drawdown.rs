//! # Drawdown
//!
//! $$
//! d_t = \frac{v_t - \max_{s \le t} v_s}{\max_{s \le t} v_s}
//! $$
//!
//! Decline from the running peak of a value series. Values are never
//! positive; the duration statistic counts the longest consecutive run
//! of strictly negative drawdown.

/// Drawdown at each point of a value series; all entries ≤ 0.
pub fn drawdown_series(values: &[f64]) -> Vec<f64> {
  let mut peak = f64::NEG_INFINITY;
  values
    .iter()
    .map(|&v| {
      peak = peak.max(v);
      if peak > 0.0 {
        (v - peak) / peak
      } else {
        0.0
      }
    })
    .collect()
}

/// Deepest drawdown, i.e. the minimum of the series; 0 when empty.
pub fn max_drawdown(drawdowns: &[f64]) -> f64 {
  drawdowns.iter().copied().fold(0.0, f64::min)
}

/// Longest run of consecutive days under water (drawdown < 0).
///
/// The counter resets on any non-negative day; the reported maximum is
/// independent of which dip is deepest.
pub fn longest_drawdown(drawdowns: &[f64]) -> usize {
  let mut longest = 0usize;
  let mut current = 0usize;
  for &d in drawdowns {
    if d < 0.0 {
      current += 1;
      longest = longest.max(current);
    } else {
      current = 0;
    }
  }

  longest
}
