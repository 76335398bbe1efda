//! # Portfolio Optimizer
//!
//! $$
//! \min_{\mathbf w}\ f(\mathbf w)\quad \text{s.t.}\ \sum_i w_i = 1,\
//! 0 \le w_i \le w_{\max}
//! $$
//!
//! Constrained mean-variance optimization. Three objectives share one
//! Nelder-Mead penalty solve; feasibility (full investment, long-only,
//! per-asset cap) holds for every iterate by construction, so the solver
//! only has to trade off the objective and any extra penalty terms.

pub mod cardinality;
pub mod objective;
pub mod solver;

use ndarray::Array1;
use ndarray::Array2;

pub use objective::Objective;
pub use objective::OptimizationResult;
pub use objective::OptimizerConfig;

use crate::error::Result;
use crate::stats::MomentEstimates;

/// Expected portfolio return `w · μ`.
pub fn portfolio_return(weights: &Array1<f64>, mean: &Array1<f64>) -> f64 {
  weights.dot(mean)
}

/// Portfolio volatility `√(wᵀ Σ w)`; clamped at zero against roundoff.
pub fn portfolio_volatility(weights: &Array1<f64>, cov: &Array2<f64>) -> f64 {
  weights.dot(&cov.dot(weights)).max(0.0).sqrt()
}

/// Sharpe ratio `(r - r_f) / σ`, defined as 0 when volatility is 0.
pub fn sharpe_ratio(expected_return: f64, volatility: f64, risk_free: f64) -> f64 {
  if volatility > 0.0 {
    (expected_return - risk_free) / volatility
  } else {
    0.0
  }
}

/// Solve the configured objective over the full instrument set, applying
/// the two-stage cardinality pipeline when `config.max_assets` binds.
pub fn optimize(
  objective: Objective,
  moments: &MomentEstimates,
  config: &OptimizerConfig,
) -> Result<OptimizationResult> {
  match config.max_assets {
    Some(limit) if limit < moments.n_assets() => {
      cardinality::two_stage(objective, moments, config, limit)
    }
    _ => solver::solve_constrained(objective, None, moments, config),
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use ndarray::array;

  use super::*;

  #[test]
  fn algebraic_identities_hold_for_any_weights() {
    let w = array![0.25, 0.75];
    let mean = array![0.1, 0.2];
    let cov = array![[0.04, 0.01], [0.01, 0.09]];

    let ret = portfolio_return(&w, &mean);
    assert_relative_eq!(ret, 0.25 * 0.1 + 0.75 * 0.2, epsilon = 1e-15);

    let var: f64 = 0.0625 * 0.04 + 0.5625 * 0.09 + 2.0 * 0.25 * 0.75 * 0.01;
    assert_relative_eq!(portfolio_volatility(&w, &cov), var.sqrt(), epsilon = 1e-15);
  }

  #[test]
  fn zero_volatility_sharpe_is_zero() {
    assert_eq!(sharpe_ratio(0.2, 0.0, 0.05), 0.0);
  }
}
