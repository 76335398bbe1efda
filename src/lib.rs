//! # markowitz-rs
//!
//! $$
//! \mathbf w^\* = \arg\min_{\mathbf w}\ \mathbf w^\top \Sigma \mathbf w
//! \quad \text{s.t.}\ \mathbf w^\top \mathbf 1 = 1,\ \mathbf w^\top \mu = \bar r
//! $$
//!
//! Mean-variance portfolio analytics: moment estimation, constrained
//! optimization with cardinality limits, efficient-frontier tracing,
//! walk-forward backtesting and tail-risk metrics.
//!
//! The crate is a pure data-in/data-out core. It consumes a price panel
//! and configuration scalars and emits plain structured results; data
//! retrieval, instrument catalogs and rendering live with collaborators.
//! Every operation is synchronous, CPU-bound and free of shared mutable
//! state, so independent calls parallelize trivially; the frontier
//! sweep already fans out across the rayon pool internally.

pub mod backtest;
pub mod error;
pub mod frontier;
pub mod market;
pub mod optimize;
pub mod profiles;
pub mod risk;
pub mod stats;

pub use backtest::BacktestResult;
pub use backtest::Backtester;
pub use error::PortfolioError;
pub use frontier::generate_frontier;
pub use frontier::EfficientFrontier;
pub use frontier::FrontierPoint;
pub use market::PriceMatrix;
pub use market::ReturnMatrix;
pub use optimize::optimize;
pub use optimize::Objective;
pub use optimize::OptimizationResult;
pub use optimize::OptimizerConfig;
pub use profiles::optimize_for_profile;
pub use profiles::RiskProfile;
pub use risk::compare_with_benchmark;
pub use risk::portfolio_risk_report;
pub use stats::MomentEstimates;
