//! # Objectives and Results
//!
//! $$
//! \mathbf w^\* = \arg\max_{\mathbf w}\ \frac{\mathbb E[R_p] - r_f}{\sigma_p}
//! $$
//!
//! Tagged objective variants, solver configuration and the immutable
//! per-call result container.

use impl_new_derive::ImplNew;
use ndarray::Array1;

/// Optimization objective dispatched to the shared constrained solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Objective {
  /// Minimize portfolio volatility `√(wᵀΣw)`.
  MinVolatility,
  /// Maximize the Sharpe ratio against the configured risk-free rate.
  MaxSharpe,
  /// Maximize expected return subject to a volatility ceiling.
  MaxReturn {
    /// Annualized volatility the portfolio may not exceed.
    max_volatility: f64,
  },
}

impl Objective {
  /// Short label used in diagnostics.
  pub fn label(&self) -> &'static str {
    match self {
      Objective::MinVolatility => "min-volatility",
      Objective::MaxSharpe => "max-sharpe",
      Objective::MaxReturn { .. } => "max-return",
    }
  }
}

/// Solver configuration.
///
/// Tolerance and iteration cap are numerical budget, not semantics: a
/// solve that exhausts them still returns its best iterate flagged
/// `success = false`.
#[derive(ImplNew, Clone, Debug)]
pub struct OptimizerConfig {
  /// Annual risk-free rate (decimal).
  pub risk_free: f64,
  /// Per-asset weight cap (decimal fraction of the portfolio).
  pub max_weight: f64,
  /// Optional cardinality limit on the number of instruments held.
  pub max_assets: Option<usize>,
  /// Nelder-Mead iteration cap.
  pub max_iters: u64,
  /// Nelder-Mead standard-deviation tolerance.
  pub sd_tolerance: f64,
}

impl Default for OptimizerConfig {
  fn default() -> Self {
    Self {
      risk_free: 0.0,
      max_weight: 1.0,
      max_assets: None,
      max_iters: 5000,
      sd_tolerance: 1e-9,
    }
  }
}

/// Output of one optimization call. Created once, never mutated.
#[derive(Clone, Debug)]
pub struct OptimizationResult {
  /// Portfolio weights in `tickers` order; excluded instruments hold 0.
  pub weights: Array1<f64>,
  /// Expected annual return `w · μ`.
  pub expected_return: f64,
  /// Annual volatility `√(wᵀΣw)`.
  pub volatility: f64,
  /// Sharpe ratio; 0 when volatility is 0.
  pub sharpe: f64,
  /// Instrument identifiers aligned with `weights`.
  pub tickers: Vec<String>,
  /// Whether the solve converged and satisfied its constraints.
  pub success: bool,
  /// Diagnostic detail, `"converged"` on success.
  pub message: String,
}

impl OptimizationResult {
  /// Indices of instruments with weight above `epsilon`.
  pub fn held_assets(&self, epsilon: f64) -> Vec<usize> {
    self
      .weights
      .iter()
      .enumerate()
      .filter(|(_, w)| **w > epsilon)
      .map(|(i, _)| i)
      .collect()
  }
}
