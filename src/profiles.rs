//! # Risk Profiles
//!
//! $$
//! \text{profile} \mapsto (\text{objective},\ \sigma_{\max})
//! $$
//!
//! Static investor profiles mapping to an optimizer objective and a
//! maximum tolerated annual volatility. Pure configuration, never
//! mutated at runtime.

use std::fmt::Display;

use crate::error::Result;
use crate::optimize::optimize;
use crate::optimize::Objective;
use crate::optimize::OptimizationResult;
use crate::optimize::OptimizerConfig;
use crate::stats::MomentEstimates;

/// Investor risk appetite.
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum RiskProfile {
  /// Prioritizes stability: minimum-volatility allocation.
  Conservative,
  /// Balances risk and return: maximum-Sharpe allocation.
  #[default]
  Moderate,
  /// Chases return under a volatility ceiling.
  Aggressive,
}

impl RiskProfile {
  /// Maximum tolerated annual volatility for the profile.
  pub fn max_volatility(&self) -> f64 {
    match self {
      RiskProfile::Conservative => 0.20,
      RiskProfile::Moderate => 0.35,
      RiskProfile::Aggressive => 0.50,
    }
  }

  /// Optimizer objective the profile maps to.
  ///
  /// The aggressive ceiling is the profile's own volatility bound.
  pub fn objective(&self) -> Objective {
    match self {
      RiskProfile::Conservative => Objective::MinVolatility,
      RiskProfile::Moderate => Objective::MaxSharpe,
      RiskProfile::Aggressive => Objective::MaxReturn {
        max_volatility: self.max_volatility(),
      },
    }
  }

  /// One-line description of the appetite.
  pub fn description(&self) -> &'static str {
    match self {
      RiskProfile::Conservative => {
        "Prioritizes safety and stability; accepts lower returns for lower volatility."
      }
      RiskProfile::Moderate => "Balances risk and return; targets the best attainable Sharpe.",
      RiskProfile::Aggressive => {
        "Prioritizes return; tolerates high volatility up to the profile ceiling."
      }
    }
  }

  /// All profiles, mildest first.
  pub fn all() -> [RiskProfile; 3] {
    [
      RiskProfile::Conservative,
      RiskProfile::Moderate,
      RiskProfile::Aggressive,
    ]
  }
}

impl Display for RiskProfile {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      RiskProfile::Conservative => write!(f, "Conservative"),
      RiskProfile::Moderate => write!(f, "Moderate"),
      RiskProfile::Aggressive => write!(f, "Aggressive"),
    }
  }
}

/// Optimize for a profile, dispatching to its objective.
pub fn optimize_for_profile(
  profile: RiskProfile,
  moments: &MomentEstimates,
  config: &OptimizerConfig,
) -> Result<OptimizationResult> {
  optimize(profile.objective(), moments, config)
}
