//! # Errors
//!
//! $$
//! \text{input} \notin \text{dom}(f) \Rightarrow \text{typed failure}
//! $$
//!
//! Typed failures for the analytics pipeline. Solver non-convergence is
//! deliberately *not* represented here: an optimization that fails to
//! converge still yields its best iterate with `success = false`.

use thiserror::Error;

/// Errors surfaced by the portfolio analytics pipeline.
#[derive(Debug, Error)]
pub enum PortfolioError {
  /// Not enough observations or instruments to compute anything meaningful.
  #[error("insufficient data: required {required}, got {actual}")]
  InsufficientData {
    /// Minimum count required by the operation.
    required: usize,
    /// Count actually available.
    actual: usize,
  },

  /// Vector/matrix dimensions disagree.
  #[error("dimension mismatch: expected {expected}, got {actual}")]
  DimensionMismatch {
    /// Expected length/dimension.
    expected: usize,
    /// Length/dimension actually supplied.
    actual: usize,
  },

  /// Constraint set admits no feasible weight vector.
  #[error("infeasible constraint: {0}")]
  InfeasibleConstraint(String),

  /// A metric was requested on an empty series.
  #[error("empty series")]
  EmptySeries,
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, PortfolioError>;
