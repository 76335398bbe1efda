//! # Constrained Solve
//!
//! $$
//! \mathbf w(\mathbf x) = \Pi_{[0,w_{\max}]}\big(\mathrm{softmax}(\mathbf x)\big)
//! $$
//!
//! Nelder-Mead over an unconstrained parameter vector. Softmax maps the
//! parameters onto the simplex and an exact capped-simplex projection
//! enforces the per-asset bound, so every iterate is feasible. Equality
//! and inequality side constraints (target return, volatility cap) enter
//! as quadratic penalties.

use argmin::core::CostFunction;
use argmin::core::Error;
use argmin::core::Executor;
use argmin::core::TerminationReason;
use argmin::core::TerminationStatus;
use argmin::solver::neldermead::NelderMead;
use ndarray::Array1;
use ndarray::Array2;

use crate::error::PortfolioError;
use crate::error::Result;
use crate::optimize::portfolio_return;
use crate::optimize::portfolio_volatility;
use crate::optimize::sharpe_ratio;
use crate::optimize::Objective;
use crate::optimize::OptimizationResult;
use crate::optimize::OptimizerConfig;
use crate::stats::MomentEstimates;

/// Weight of the quadratic penalty terms.
pub(crate) const PENALTY: f64 = 1e4;

/// Accepted residual on a target-return equality constraint.
pub(crate) const RETURN_TOLERANCE: f64 = 1e-3;

/// Accepted overshoot on a volatility-cap inequality constraint.
pub(crate) const VOLATILITY_TOLERANCE: f64 = 1e-4;

pub(crate) fn softmax(x: &[f64]) -> Vec<f64> {
  if x.is_empty() {
    return Vec::new();
  }

  let max_x = x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
  let exps: Vec<f64> = x.iter().map(|&v| (v - max_x).exp()).collect();
  let sum: f64 = exps.iter().sum();

  if sum < 1e-15 {
    vec![1.0 / x.len() as f64; x.len()]
  } else {
    exps.iter().map(|&e| e / sum).collect()
  }
}

/// Project a simplex point onto the capped simplex
/// `{w : Σw = 1, 0 ≤ wᵢ ≤ cap}`.
///
/// Requires `cap * len ≥ 1`. Entries at the cap are frozen and the free
/// remainder rescaled until no entry exceeds the cap; terminates in at
/// most `len` passes.
pub(crate) fn project_capped_simplex(mut w: Vec<f64>, cap: f64) -> Vec<f64> {
  let n = w.len();
  if n == 0 || cap >= 1.0 {
    return w;
  }

  let mut capped = vec![false; n];
  loop {
    let fixed = capped.iter().filter(|c| **c).count() as f64 * cap;
    let budget = 1.0 - fixed;
    let free_mass: f64 = w
      .iter()
      .zip(&capped)
      .filter(|(_, c)| !**c)
      .map(|(v, _)| *v)
      .sum();

    if free_mass > f64::EPSILON {
      let scale = budget / free_mass;
      for (v, c) in w.iter_mut().zip(&capped) {
        if !*c {
          *v *= scale;
        }
      }
    } else {
      let free_n = capped.iter().filter(|c| !**c).count();
      if free_n == 0 {
        break;
      }
      let share = budget / free_n as f64;
      for (v, c) in w.iter_mut().zip(&capped) {
        if !*c {
          *v = share;
        }
      }
    }

    let mut newly_capped = false;
    for (i, v) in w.iter_mut().enumerate() {
      if !capped[i] && *v >= cap {
        *v = cap;
        capped[i] = true;
        newly_capped = true;
      }
    }

    if !newly_capped {
      break;
    }
  }

  w
}

/// Map an unconstrained parameter vector to a feasible weight vector.
pub(crate) fn feasible_weights(x: &[f64], cap: f64) -> Array1<f64> {
  Array1::from_vec(project_capped_simplex(softmax(x), cap))
}

struct PenaltyCost {
  mean: Array1<f64>,
  cov: Array2<f64>,
  objective: Objective,
  target_return: Option<f64>,
  max_weight: f64,
  risk_free: f64,
}

impl CostFunction for PenaltyCost {
  type Param = Vec<f64>;
  type Output = f64;

  fn cost(&self, x: &Self::Param) -> std::result::Result<Self::Output, Error> {
    let w = feasible_weights(x, self.max_weight);
    let ret = portfolio_return(&w, &self.mean);
    let vol = portfolio_volatility(&w, &self.cov);

    let mut cost = match self.objective {
      Objective::MinVolatility => vol,
      Objective::MaxSharpe => -sharpe_ratio(ret, vol, self.risk_free),
      Objective::MaxReturn { max_volatility } => {
        -ret + PENALTY * (vol - max_volatility).max(0.0).powi(2)
      }
    };

    if let Some(target) = self.target_return {
      cost += PENALTY * (ret - target).powi(2);
    }

    Ok(cost)
  }
}

/// Run one constrained solve.
///
/// `target_return` adds the frontier's `w · μ = target` equality. Solver
/// non-convergence and unsatisfied penalty residuals are reported through
/// the result's `success`/`message`, never as an `Err`.
pub(crate) fn solve_constrained(
  objective: Objective,
  target_return: Option<f64>,
  moments: &MomentEstimates,
  config: &OptimizerConfig,
) -> Result<OptimizationResult> {
  let k = moments.n_assets();
  if k == 0 {
    return Err(PortfolioError::InsufficientData {
      required: 1,
      actual: 0,
    });
  }

  if config.max_weight <= 0.0 || config.max_weight * (k as f64) < 1.0 - 1e-12 {
    return Err(PortfolioError::InfeasibleConstraint(format!(
      "max_weight {} cannot span the simplex over {k} assets",
      config.max_weight
    )));
  }

  let cost = PenaltyCost {
    mean: moments.mean().clone(),
    cov: moments.cov().clone(),
    objective,
    target_return,
    max_weight: config.max_weight,
    risk_free: config.risk_free,
  };

  // Uniform 1/K start: softmax of the zero vector.
  let x0 = vec![0.0; k];
  let mut simplex = Vec::with_capacity(k + 1);
  simplex.push(x0.clone());
  for i in 0..k {
    let mut point = x0.clone();
    point[i] = 1.0;
    simplex.push(point);
  }

  let (best_x, mut success, mut message) =
    match NelderMead::new(simplex).with_sd_tolerance(config.sd_tolerance) {
      Ok(solver) => match Executor::new(cost, solver)
        .configure(|state| state.max_iters(config.max_iters))
        .run()
      {
        Ok(res) => {
          let best = res.state.best_param.clone().unwrap_or_else(|| x0.clone());
          let (ok, msg) = describe_termination(&res.state.termination_status);
          tracing::debug!(
            objective = objective.label(),
            iters = res.state.iter,
            termination = %msg,
            "solve finished"
          );
          (best, ok, msg)
        }
        Err(err) => (x0.clone(), false, format!("solver error: {err}")),
      },
      Err(err) => (x0, false, format!("solver setup error: {err}")),
    };

  let weights = feasible_weights(&best_x, config.max_weight);
  let expected_return = portfolio_return(&weights, moments.mean());
  let volatility = portfolio_volatility(&weights, moments.cov());

  if let Some(target) = target_return {
    if (expected_return - target).abs() > RETURN_TOLERANCE {
      success = false;
      message = format!(
        "target return missed: achieved {expected_return:.6}, wanted {target:.6}"
      );
    }
  }

  if let Objective::MaxReturn { max_volatility } = objective {
    if volatility > max_volatility + VOLATILITY_TOLERANCE {
      success = false;
      message = format!(
        "volatility cap exceeded: {volatility:.6} > {max_volatility:.6}"
      );
    }
  }

  if !success {
    tracing::warn!(objective = objective.label(), %message, "solve did not converge");
  }

  let sharpe = sharpe_ratio(expected_return, volatility, config.risk_free);

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

fn describe_termination(status: &TerminationStatus) -> (bool, String) {
  match status {
    TerminationStatus::Terminated(TerminationReason::SolverConverged) => {
      (true, "converged".to_string())
    }
    TerminationStatus::Terminated(TerminationReason::MaxItersReached) => {
      (false, "maximum iterations reached".to_string())
    }
    TerminationStatus::Terminated(reason) => (false, format!("terminated: {reason:?}")),
    TerminationStatus::NotTerminated => (false, "solver did not terminate".to_string()),
  }
}
