//! # Descriptive Statistics
//!
//! $$
//! \gamma_1 = \frac{m_3}{m_2^{3/2}}, \qquad \gamma_2 = \frac{m_4}{m_2^2} - 3
//! $$
//!
//! Scalar helpers shared by the moment estimator and the risk metrics.
//! Higher moments use population (biased) formulas; `sample_std` takes an
//! explicit degrees-of-freedom delta so callers choose the estimator.

/// Arithmetic mean; 0 for an empty slice.
pub fn sample_mean(xs: &[f64]) -> f64 {
  if xs.is_empty() {
    0.0
  } else {
    xs.iter().sum::<f64>() / xs.len() as f64
  }
}

/// Standard deviation with `ddof` degrees-of-freedom correction.
///
/// `ddof = 1` gives the unbiased sample estimator, `ddof = 0` the
/// population one. Returns 0 when fewer than `ddof + 1` observations.
pub fn sample_std(xs: &[f64], ddof: usize) -> f64 {
  if xs.len() <= ddof {
    return 0.0;
  }

  let mean = sample_mean(xs);
  let mut acc = 0.0;
  for &x in xs {
    let d = x - mean;
    acc += d * d;
  }

  (acc / (xs.len() - ddof) as f64).sqrt()
}

fn central_moment(xs: &[f64], order: i32) -> f64 {
  if xs.is_empty() {
    return 0.0;
  }

  let mean = sample_mean(xs);
  xs.iter().map(|&x| (x - mean).powi(order)).sum::<f64>() / xs.len() as f64
}

/// Population skewness `m3 / m2^{3/2}`; 0 for a constant series.
pub fn skewness(xs: &[f64]) -> f64 {
  let m2 = central_moment(xs, 2);
  if m2 <= 0.0 {
    return 0.0;
  }

  central_moment(xs, 3) / m2.powf(1.5)
}

/// Population excess kurtosis `m4 / m2^2 - 3`; 0 for a constant series.
pub fn excess_kurtosis(xs: &[f64]) -> f64 {
  let m2 = central_moment(xs, 2);
  if m2 <= 0.0 {
    return 0.0;
  }

  central_moment(xs, 4) / (m2 * m2) - 3.0
}

/// Empirical percentile with linear interpolation between order statistics.
///
/// `p` is in percent on `[0, 100]`. Matches the numpy default method.
pub fn percentile(xs: &[f64], p: f64) -> f64 {
  if xs.is_empty() {
    return 0.0;
  }

  let mut sorted = xs.to_vec();
  sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

  let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
  let lo = rank.floor() as usize;
  let hi = rank.ceil() as usize;
  if lo == hi {
    return sorted[lo];
  }

  let frac = rank - lo as f64;
  sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;

  use super::*;

  #[test]
  fn std_ddof_matches_known_values() {
    let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    assert_relative_eq!(sample_std(&xs, 0), 2.0, epsilon = 1e-12);
    assert_relative_eq!(sample_std(&xs, 1), (32.0f64 / 7.0).sqrt(), epsilon = 1e-12);
  }

  #[test]
  fn symmetric_series_has_zero_skew() {
    let xs = [-2.0, -1.0, 0.0, 1.0, 2.0];
    assert_relative_eq!(skewness(&xs), 0.0, epsilon = 1e-12);
  }

  #[test]
  fn constant_series_has_zero_higher_moments() {
    let xs = [0.5; 10];
    assert_eq!(skewness(&xs), 0.0);
    assert_eq!(excess_kurtosis(&xs), 0.0);
  }

  #[test]
  fn uniform_spread_has_negative_excess_kurtosis() {
    let xs: Vec<f64> = (0..100).map(|i| i as f64).collect();
    assert!(excess_kurtosis(&xs) < 0.0);
  }

  #[test]
  fn percentile_interpolates_linearly() {
    let xs = [1.0, 2.0, 3.0, 4.0];
    assert_relative_eq!(percentile(&xs, 0.0), 1.0, epsilon = 1e-12);
    assert_relative_eq!(percentile(&xs, 50.0), 2.5, epsilon = 1e-12);
    assert_relative_eq!(percentile(&xs, 100.0), 4.0, epsilon = 1e-12);
    assert_relative_eq!(percentile(&xs, 25.0), 1.75, epsilon = 1e-12);
  }

  #[test]
  fn percentile_handles_unsorted_input() {
    let xs = [3.0, 1.0, 4.0, 2.0];
    assert_relative_eq!(percentile(&xs, 50.0), 2.5, epsilon = 1e-12);
  }
}
