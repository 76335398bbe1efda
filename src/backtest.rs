//! # Walk-Forward Backtest
//!
//! $$
//! V_t = V_{t-1}\,\big(1 + \mathbf w^\top \mathbf r_t\big)
//! $$
//!
//! Simulates holding a target allocation through historical daily
//! returns, resetting to the target weights every rebalance window.
//! Weight drift between rebalances is not modeled: the current weights
//! stay fixed until the next reset rather than evolving with relative
//! price moves.

use chrono::NaiveDate;
use impl_new_derive::ImplNew;
use ndarray::Array1;

use crate::error::PortfolioError;
use crate::error::Result;
use crate::market::PriceMatrix;
use crate::market::TRADING_DAYS;
use crate::optimize::sharpe_ratio;
use crate::risk::benchmark::DatedSeries;
use crate::risk::cvar;
use crate::risk::drawdown_series;
use crate::risk::longest_drawdown;
use crate::risk::max_drawdown;
use crate::risk::parametric_var;
use crate::risk::sortino;
use crate::stats::descriptive::sample_std;

/// Walk-forward simulation settings.
#[derive(ImplNew, Clone, Debug)]
pub struct Backtester {
  /// Trading days between resets to the target weights.
  pub rebalance_window: usize,
  /// Capital at the first trading date.
  pub initial_capital: f64,
  /// Annual risk-free rate for Sharpe/Sortino.
  pub risk_free: f64,
  /// Confidence level for the VaR/CVaR summary figures.
  pub confidence: f64,
}

impl Default for Backtester {
  fn default() -> Self {
    Self {
      // Quarterly (~63 trading days).
      rebalance_window: 63,
      initial_capital: 100_000.0,
      risk_free: 0.0,
      confidence: 0.95,
    }
  }
}

/// Outcome of one simulation run. Created once, never mutated.
#[derive(Clone, Debug)]
pub struct BacktestResult {
  /// Trading dates of the value series (first row holds the initial capital).
  pub dates: Vec<NaiveDate>,
  /// Portfolio value per trading date.
  pub values: Vec<f64>,
  /// Daily portfolio returns, one entry per date after the first.
  pub returns: Vec<f64>,
  /// Drawdown per trading date; entries ≤ 0.
  pub drawdown: Vec<f64>,
  /// Capital at the first date.
  pub initial_capital: f64,
  /// Capital at the last date.
  pub final_capital: f64,
  /// Total return over the run.
  pub total_return: f64,
  /// Annualized return, exponent `252 / n`.
  pub annualized_return: f64,
  /// Annualized volatility of daily returns.
  pub annualized_volatility: f64,
  /// Sharpe ratio of the run; 0 on zero volatility.
  pub sharpe: f64,
  /// Sortino ratio of the run; +∞ without downside.
  pub sortino: f64,
  /// Deepest drawdown (≤ 0).
  pub max_drawdown: f64,
  /// Longest run of consecutive under-water days.
  pub max_drawdown_duration: usize,
  /// Confidence level of the VaR/CVaR figures.
  pub confidence: f64,
  /// Daily parametric VaR.
  pub var_daily: f64,
  /// Annualized (×√252) parametric VaR.
  pub var_annual: f64,
  /// Daily CVaR.
  pub cvar_daily: f64,
  /// Annualized (×√252) CVaR.
  pub cvar_annual: f64,
  /// Number of daily return observations.
  pub n_days: usize,
}

impl BacktestResult {
  /// Value series paired with its dates, for benchmark comparison.
  pub fn value_series(&self) -> Result<DatedSeries> {
    DatedSeries::new(self.dates.clone(), self.values.clone())
  }
}

impl Backtester {
  /// Simulate holding `target_weights` through the price history.
  ///
  /// Instruments missing from the panel are ignored and the remaining
  /// weights renormalized to sum to 1; no overlap at all is an
  /// insufficient-data outcome.
  pub fn run(
    &self,
    prices: &PriceMatrix,
    target_weights: &[(String, f64)],
  ) -> Result<BacktestResult> {
    let mut columns = Vec::new();
    let mut weights = Vec::new();
    for (ticker, weight) in target_weights {
      if let Some(j) = prices.tickers().iter().position(|t| t == ticker) {
        columns.push(j);
        weights.push(*weight);
      }
    }

    if columns.is_empty() {
      return Err(PortfolioError::InsufficientData {
        required: 1,
        actual: 0,
      });
    }

    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
      return Err(PortfolioError::InfeasibleConstraint(
        "target weights must have positive mass".to_string(),
      ));
    }
    let target: Array1<f64> = Array1::from_iter(weights.into_iter().map(|w| w / total));

    let values = prices.values();
    let n_days = prices.n_obs() - 1;
    if n_days == 0 {
      return Err(PortfolioError::InsufficientData {
        required: 2,
        actual: 1,
      });
    }

    let mut capital = self.initial_capital;
    let mut value_series = Vec::with_capacity(n_days + 1);
    value_series.push(capital);
    let mut returns = Vec::with_capacity(n_days);

    let mut current = target.clone();
    let mut days_since_rebalance = 0usize;

    for day in 1..=n_days {
      let mut day_return = 0.0;
      for (slot, &j) in columns.iter().enumerate() {
        let asset_return = values[[day, j]] / values[[day - 1, j]] - 1.0;
        day_return += current[slot] * asset_return;
      }

      capital *= 1.0 + day_return;
      value_series.push(capital);
      returns.push(day_return);

      days_since_rebalance += 1;
      if days_since_rebalance >= self.rebalance_window {
        current = target.clone();
        days_since_rebalance = 0;
      }
    }

    let total_return = capital / self.initial_capital - 1.0;
    let annualized_return =
      (1.0 + total_return).powf(TRADING_DAYS / n_days as f64) - 1.0;
    let annualized_volatility = sample_std(&returns, 1) * TRADING_DAYS.sqrt();

    let drawdown = drawdown_series(&value_series);
    let var_daily = parametric_var(&returns, self.confidence)?;
    let cvar_daily = cvar(&returns, self.confidence)?;

    let result = BacktestResult {
      dates: prices.dates().to_vec(),
      values: value_series,
      initial_capital: self.initial_capital,
      final_capital: capital,
      total_return,
      annualized_return,
      annualized_volatility,
      sharpe: sharpe_ratio(annualized_return, annualized_volatility, self.risk_free),
      sortino: sortino(&returns, self.risk_free)?,
      max_drawdown: max_drawdown(&drawdown),
      max_drawdown_duration: longest_drawdown(&drawdown),
      confidence: self.confidence,
      var_daily,
      var_annual: var_daily * TRADING_DAYS.sqrt(),
      cvar_daily,
      cvar_annual: cvar_daily * TRADING_DAYS.sqrt(),
      n_days,
      drawdown,
      returns,
    };

    tracing::info!(
      n_days,
      final_capital = result.final_capital,
      annualized_return = result.annualized_return,
      max_drawdown = result.max_drawdown,
      "backtest complete"
    );

    Ok(result)
  }
}
