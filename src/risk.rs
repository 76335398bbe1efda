//! # Risk Metrics Engine
//!
//! $$
//! \mathrm{CVaR}_c = -\,\mathbb E\big[r \mid r < -\mathrm{VaR}_c\big]
//! $$
//!
//! Tail risk, downside ratios, drawdown statistics and benchmark-relative
//! metrics. Everything operates on plain return/value series and returns
//! plain structured values; rendering is a collaborator concern.

pub mod benchmark;
pub mod drawdown;
pub mod var;

pub use benchmark::compare_with_benchmark;
pub use benchmark::BenchmarkComparison;
pub use drawdown::drawdown_series;
pub use drawdown::longest_drawdown;
pub use drawdown::max_drawdown;
pub use var::cvar;
pub use var::historical_var;
pub use var::parametric_var;
pub use var::sortino;

use ndarray::Array1;

use crate::error::PortfolioError;
use crate::error::Result;
use crate::market::ReturnMatrix;
use crate::market::TRADING_DAYS;
use crate::optimize::sharpe_ratio;
use crate::stats::descriptive::excess_kurtosis;
use crate::stats::descriptive::sample_mean;
use crate::stats::descriptive::sample_std;
use crate::stats::descriptive::skewness;

/// Full risk profile of a weighted portfolio return series.
#[derive(Clone, Debug)]
pub struct RiskReport {
  /// Annualized mean return.
  pub annual_return: f64,
  /// Annualized volatility.
  pub annual_volatility: f64,
  /// Sharpe ratio; 0 on zero volatility.
  pub sharpe: f64,
  /// Sortino ratio; +∞ when there is no downside.
  pub sortino: f64,
  /// Confidence level the VaR/CVaR figures refer to.
  pub confidence: f64,
  /// Daily parametric VaR at `confidence`.
  pub var_daily: f64,
  /// Daily parametric VaR at 99%.
  pub var_daily_99: f64,
  /// Annualized (×√252) parametric VaR at `confidence`.
  pub var_annual: f64,
  /// Daily CVaR at `confidence`.
  pub cvar_daily: f64,
  /// Annualized (×√252) CVaR at `confidence`.
  pub cvar_annual: f64,
  /// Population skewness of daily returns.
  pub skewness: f64,
  /// Population excess kurtosis of daily returns.
  pub kurtosis: f64,
}

/// Compute the full risk report for `weights` applied to a return panel.
///
/// Weights are renormalized to sum to 1 before the series is formed.
pub fn portfolio_risk_report(
  returns: &ReturnMatrix,
  weights: &Array1<f64>,
  risk_free: f64,
  confidence: f64,
) -> Result<RiskReport> {
  let total: f64 = weights.sum();
  if total <= 0.0 {
    return Err(PortfolioError::InfeasibleConstraint(
      "weights must have positive mass".to_string(),
    ));
  }

  let normalized = weights / total;
  let series = returns.weighted(&normalized)?;
  let series: Vec<f64> = series.to_vec();

  if series.is_empty() {
    return Err(PortfolioError::EmptySeries);
  }

  let annual_return = sample_mean(&series) * TRADING_DAYS;
  let annual_volatility = sample_std(&series, 1) * TRADING_DAYS.sqrt();
  let var_daily = parametric_var(&series, confidence)?;
  let cvar_daily = cvar(&series, confidence)?;

  Ok(RiskReport {
    annual_return,
    annual_volatility,
    sharpe: sharpe_ratio(annual_return, annual_volatility, risk_free),
    sortino: sortino(&series, risk_free)?,
    confidence,
    var_daily,
    var_daily_99: parametric_var(&series, 0.99)?,
    var_annual: var_daily * TRADING_DAYS.sqrt(),
    cvar_daily,
    cvar_annual: cvar_daily * TRADING_DAYS.sqrt(),
    skewness: skewness(&series),
    kurtosis: excess_kurtosis(&series),
  })
}
