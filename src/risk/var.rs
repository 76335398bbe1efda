//! # Tail Risk
//!
//! $$
//! \mathrm{VaR}_c = -(\mu + z_{1-c}\,\sigma)
//! $$
//!
//! Parametric and historical Value at Risk, expected shortfall and the
//! Sortino ratio. VaR figures are quoted as positive losses; parametric
//! VaR assumes normality, historical VaR is distribution-free.

use statrs::distribution::ContinuousCDF;
use statrs::distribution::Normal;

use crate::error::PortfolioError;
use crate::error::Result;
use crate::market::TRADING_DAYS;
use crate::stats::descriptive::percentile;
use crate::stats::descriptive::sample_mean;
use crate::stats::descriptive::sample_std;

/// Parametric (Gaussian) VaR at `confidence`, as a positive loss.
///
/// Uses the population standard deviation of the series.
pub fn parametric_var(returns: &[f64], confidence: f64) -> Result<f64> {
  if returns.is_empty() {
    return Err(PortfolioError::EmptySeries);
  }

  let mean = sample_mean(returns);
  let std = sample_std(returns, 0);
  let z = standard_normal_quantile(1.0 - confidence);

  Ok(-(mean + z * std))
}

/// Historical (empirical-percentile) VaR at `confidence`.
pub fn historical_var(returns: &[f64], confidence: f64) -> Result<f64> {
  if returns.is_empty() {
    return Err(PortfolioError::EmptySeries);
  }

  Ok(-percentile(returns, (1.0 - confidence) * 100.0))
}

/// Conditional VaR (expected shortfall) at `confidence`.
///
/// Mean loss over returns strictly below the historical VaR threshold;
/// when no return falls below it the tail is degenerate and the VaR
/// value itself is returned.
pub fn cvar(returns: &[f64], confidence: f64) -> Result<f64> {
  let var = historical_var(returns, confidence)?;

  let tail: Vec<f64> = returns.iter().copied().filter(|r| *r < -var).collect();
  if tail.is_empty() {
    return Ok(var);
  }

  Ok(-sample_mean(&tail))
}

/// Annualized Sortino ratio against an annual risk-free rate.
///
/// Downside deviation is the population standard deviation of the
/// negative returns only; a series with no downside has an infinite
/// ratio by definition.
pub fn sortino(returns: &[f64], risk_free: f64) -> Result<f64> {
  if returns.is_empty() {
    return Err(PortfolioError::EmptySeries);
  }

  let annual_return = sample_mean(returns) * TRADING_DAYS;

  let negatives: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
  if negatives.is_empty() {
    return Ok(f64::INFINITY);
  }

  let downside = sample_std(&negatives, 0) * TRADING_DAYS.sqrt();
  if downside == 0.0 {
    return Ok(f64::INFINITY);
  }

  Ok((annual_return - risk_free) / downside)
}

fn standard_normal_quantile(p: f64) -> f64 {
  let normal = Normal::new(0.0, 1.0).unwrap();
  normal.inverse_cdf(p)
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;

  use super::*;

  fn series() -> Vec<f64> {
    vec![
      0.012, -0.008, 0.004, -0.015, 0.009, 0.002, -0.003, 0.007, -0.011, 0.005,
    ]
  }

  #[test]
  fn parametric_var_matches_closed_form() {
    let xs = series();
    let mean = sample_mean(&xs);
    let std = sample_std(&xs, 0);
    // z for the 5th percentile of the standard normal.
    let z = -1.6448536269514722;

    let var = parametric_var(&xs, 0.95).unwrap();
    assert_relative_eq!(var, -(mean + z * std), epsilon = 1e-9);
  }

  #[test]
  fn cvar_dominates_historical_var() {
    for confidence in [0.90, 0.95, 0.99] {
      let var = historical_var(&series(), confidence).unwrap();
      let cvar = cvar(&series(), confidence).unwrap();
      assert!(cvar >= var - 1e-12, "CVaR {cvar} < VaR {var}");
    }
  }

  #[test]
  fn flat_series_has_zero_cvar() {
    let flat = vec![0.0; 50];
    assert_relative_eq!(cvar(&flat, 0.95).unwrap(), 0.0, epsilon = 1e-12);
  }

  #[test]
  fn degenerate_tail_returns_var_itself() {
    // All mass at one value: nothing lies strictly below the threshold.
    let constant = vec![0.01; 20];
    let var = historical_var(&constant, 0.95).unwrap();
    let cv = cvar(&constant, 0.95).unwrap();
    assert_relative_eq!(cv, var, epsilon = 1e-12);
  }

  #[test]
  fn sortino_is_infinite_without_downside() {
    let gains = vec![0.01, 0.02, 0.005, 0.0];
    assert!(sortino(&gains, 0.05).unwrap().is_infinite());
  }

  #[test]
  fn sortino_uses_only_negative_returns() {
    let xs = vec![0.02, -0.01, 0.03, -0.01, 0.02];
    // Downside deviation of {-0.01, -0.01} is 0 → infinite by the
    // zero-downside-deviation guard.
    assert!(sortino(&xs, 0.0).unwrap().is_infinite());

    let mixed = vec![0.02, -0.01, 0.03, -0.03, 0.02];
    let ratio = sortino(&mixed, 0.0).unwrap();
    assert!(ratio.is_finite());
    assert!(ratio > 0.0);
  }

  #[test]
  fn empty_series_is_an_error() {
    assert!(parametric_var(&[], 0.95).is_err());
    assert!(historical_var(&[], 0.95).is_err());
    assert!(sortino(&[], 0.0).is_err());
  }
}
