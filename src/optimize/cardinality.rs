//! # Cardinality Limit
//!
//! $$
//! \lVert \mathbf w \rVert_0 \le m
//! $$
//!
//! Two-stage policy: solve the full universe, keep the `m` largest
//! weights, re-solve the identical objective on that subset, scatter the
//! reduced solution back with exact zeros. Optimal for the selected
//! subset; which subset is selected is heuristic (exhaustive subset
//! search is combinatorial).

use ndarray::Array1;

use crate::error::Result;
use crate::optimize::portfolio_return;
use crate::optimize::portfolio_volatility;
use crate::optimize::sharpe_ratio;
use crate::optimize::solver;
use crate::optimize::Objective;
use crate::optimize::OptimizationResult;
use crate::optimize::OptimizerConfig;
use crate::stats::MomentEstimates;

/// Solve `objective` holding at most `limit` instruments.
///
/// Callers guarantee `limit < moments.n_assets()`.
pub(crate) fn two_stage(
  objective: Objective,
  moments: &MomentEstimates,
  config: &OptimizerConfig,
  limit: usize,
) -> Result<OptimizationResult> {
  let k = moments.n_assets();

  let full = solver::solve_constrained(objective, None, moments, config)?;

  // Largest weights win; ties fall back to sort stability.
  let mut order: Vec<usize> = (0..k).collect();
  order.sort_by(|&a, &b| {
    full.weights[b]
      .partial_cmp(&full.weights[a])
      .unwrap_or(std::cmp::Ordering::Equal)
  });
  let mut selected = order[..limit].to_vec();
  selected.sort_unstable();

  tracing::debug!(
    objective = objective.label(),
    limit,
    universe = k,
    ?selected,
    "restricting to largest full-solve weights"
  );

  let sub_moments = moments.select(&selected)?;
  let sub = solver::solve_constrained(objective, None, &sub_moments, config)?;

  let mut weights = Array1::zeros(k);
  for (pos, &i) in selected.iter().enumerate() {
    weights[i] = sub.weights[pos];
  }

  let expected_return = portfolio_return(&weights, moments.mean());
  let volatility = portfolio_volatility(&weights, moments.cov());
  let sharpe = sharpe_ratio(expected_return, volatility, config.risk_free);

  let success = full.success && sub.success;
  let message = if success {
    "converged".to_string()
  } else if !sub.success {
    format!("restricted solve: {}", sub.message)
  } else {
    format!("full solve: {}", full.message)
  };

  Ok(OptimizationResult {
    weights,
    expected_return,
    volatility,
    sharpe,
    tickers: moments.tickers().to_vec(),
    success,
    message,
  })
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use ndarray::array;

  use super::*;
  use crate::optimize::optimize;

  fn moments() -> MomentEstimates {
    MomentEstimates::from_parts(
      vec![
        "AAA".to_string(),
        "BBB".to_string(),
        "CCC".to_string(),
        "DDD".to_string(),
      ],
      array![0.10, 0.15, 0.05, 0.20],
      array![
        [0.04, 0.0, 0.0, 0.0],
        [0.0, 0.09, 0.0, 0.0],
        [0.0, 0.0, 0.01, 0.0],
        [0.0, 0.0, 0.0, 0.16]
      ],
    )
    .unwrap()
  }

  #[test]
  fn holds_exactly_the_cardinality_limit() {
    let config = OptimizerConfig {
      max_assets: Some(2),
      ..Default::default()
    };

    let result = optimize(Objective::MinVolatility, &moments(), &config).unwrap();

    assert_eq!(result.held_assets(1e-6).len(), 2);
    assert_relative_eq!(result.weights.sum(), 1.0, epsilon = 1e-6);
    // Excluded instruments carry exact zeros, not residue.
    let zeros = result
      .weights
      .iter()
      .filter(|w| **w == 0.0)
      .count();
    assert_eq!(zeros, 2);
  }

  #[test]
  fn min_volatility_keeps_the_low_variance_pair() {
    let config = OptimizerConfig {
      max_assets: Some(2),
      ..Default::default()
    };

    let result = optimize(Objective::MinVolatility, &moments(), &config).unwrap();

    // Full-universe weights ∝ 1/σ²; the two largest sit on CCC and AAA.
    // Reduced re-solve over (0.04, 0.01) gives (0.2, 0.8).
    assert_relative_eq!(result.weights[0], 0.2, epsilon = 0.05);
    assert_relative_eq!(result.weights[2], 0.8, epsilon = 0.05);
    assert_eq!(result.weights[1], 0.0);
    assert_eq!(result.weights[3], 0.0);
  }

  #[test]
  fn limit_at_or_above_universe_is_a_plain_solve() {
    let config = OptimizerConfig {
      max_assets: Some(4),
      ..Default::default()
    };

    let result = optimize(Objective::MinVolatility, &moments(), &config).unwrap();
    // No scatter stage: all four instruments may carry weight.
    assert!(result.held_assets(1e-6).len() >= 3);
  }

  #[test]
  fn metrics_are_computed_on_the_full_universe() {
    let config = OptimizerConfig {
      risk_free: 0.05,
      max_assets: Some(2),
      ..Default::default()
    };

    let m = moments();
    let result = optimize(Objective::MaxSharpe, &m, &config).unwrap();

    assert_relative_eq!(
      result.expected_return,
      portfolio_return(&result.weights, m.mean()),
      epsilon = 1e-12
    );
    assert_relative_eq!(
      result.volatility,
      portfolio_volatility(&result.weights, m.cov()),
      epsilon = 1e-12
    );
  }
}
