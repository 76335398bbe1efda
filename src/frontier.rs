//! # Efficient Frontier
//!
//! $$
//! \sigma^\*(\bar r) = \min_{\mathbf w}\ \sqrt{\mathbf w^\top \Sigma \mathbf w}
//! \quad \text{s.t.}\ \mathbf w^\top \mu = \bar r
//! $$
//!
//! Sweeps evenly spaced target returns over `[min μ, max μ]`, solving an
//! independent constrained min-volatility problem per target. Points are
//! independent, so the sweep fans out across the rayon pool. Failed
//! targets are dropped from the output but stay countable via
//! [`EfficientFrontier::dropped`].

use ndarray_stats::QuantileExt;
use rayon::prelude::*;

use crate::error::PortfolioError;
use crate::error::Result;
use crate::optimize::sharpe_ratio;
use crate::optimize::solver;
use crate::optimize::Objective;
use crate::optimize::OptimizerConfig;
use crate::stats::MomentEstimates;

/// One point on the risk/return boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrontierPoint {
  /// Target annual return of the sub-solve.
  pub target_return: f64,
  /// Minimum annual volatility achieving that target.
  pub volatility: f64,
  /// Implied Sharpe `(target - r_f) / σ`; 0 on zero volatility.
  pub sharpe: f64,
}

/// Frontier points ordered by increasing target return.
///
/// The sequence may be shorter than requested: targets whose sub-solve
/// failed are omitted, and `attempted` records the original grid size.
#[derive(Clone, Debug)]
pub struct EfficientFrontier {
  points: Vec<FrontierPoint>,
  attempted: usize,
}

impl EfficientFrontier {
  /// Surviving points, ascending in target return.
  pub fn points(&self) -> &[FrontierPoint] {
    &self.points
  }

  /// Number of grid targets attempted.
  pub fn attempted(&self) -> usize {
    self.attempted
  }

  /// Number of targets whose sub-solve failed.
  pub fn dropped(&self) -> usize {
    self.attempted - self.points.len()
  }

  /// Number of surviving points.
  pub fn len(&self) -> usize {
    self.points.len()
  }

  /// True when no point survived.
  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }
}

/// Trace the efficient frontier on `num_points` evenly spaced targets.
///
/// `config.max_assets` is ignored: the frontier is defined over the full
/// universe.
pub fn generate_frontier(
  moments: &MomentEstimates,
  config: &OptimizerConfig,
  num_points: usize,
) -> Result<EfficientFrontier> {
  if moments.n_assets() == 0 || num_points == 0 {
    return Err(PortfolioError::InsufficientData {
      required: 1,
      actual: 0,
    });
  }

  let lo = *moments
    .mean()
    .min()
    .map_err(|_| PortfolioError::EmptySeries)?;
  let hi = *moments
    .mean()
    .max()
    .map_err(|_| PortfolioError::EmptySeries)?;

  let targets: Vec<f64> = if num_points == 1 {
    vec![lo]
  } else {
    let step = (hi - lo) / (num_points - 1) as f64;
    (0..num_points).map(|i| lo + step * i as f64).collect()
  };

  let points: Vec<FrontierPoint> = targets
    .par_iter()
    .map(|&target| {
      match solver::solve_constrained(Objective::MinVolatility, Some(target), moments, config) {
        Ok(res) if res.success => Some(FrontierPoint {
          target_return: target,
          volatility: res.volatility,
          sharpe: sharpe_ratio(target, res.volatility, config.risk_free),
        }),
        _ => None,
      }
    })
    .collect::<Vec<_>>()
    .into_iter()
    .flatten()
    .collect();

  let frontier = EfficientFrontier {
    points,
    attempted: num_points,
  };

  if frontier.dropped() > 0 {
    tracing::warn!(
      attempted = frontier.attempted(),
      dropped = frontier.dropped(),
      "frontier targets failed to solve"
    );
  } else {
    tracing::info!(points = frontier.len(), "frontier traced");
  }

  Ok(frontier)
}
