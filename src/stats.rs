//! # Statistics Engine
//!
//! $$
//! \hat\mu = 252\,\bar r, \qquad \hat\Sigma = 252\,\mathrm{cov}(r)
//! $$
//!
//! Turns a return panel into the annualized moments the optimizer
//! consumes, plus per-instrument descriptive metrics for reporting.

pub mod descriptive;
pub mod moments;

pub use descriptive::excess_kurtosis;
pub use descriptive::percentile;
pub use descriptive::sample_mean;
pub use descriptive::sample_std;
pub use descriptive::skewness;
pub use moments::asset_metrics;
pub use moments::AssetMetrics;
pub use moments::MomentEstimates;
