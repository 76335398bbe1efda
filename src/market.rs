//! # Market Data
//!
//! $$
//! P \in \mathbb{R}^{T \times K}, \quad r_t = \ln\frac{P_t}{P_{t-1}}
//! $$
//!
//! Price/return containers consumed by the statistics engine, the
//! backtester and the risk metrics. The crate assumes complete panels:
//! gap handling happens once at ingestion, never downstream.

pub mod prices;
pub mod returns;

pub use prices::PriceMatrix;
pub use prices::PeriodSummary;
pub use returns::ReturnMatrix;

/// Trading days per year used for all annualization.
pub const TRADING_DAYS: f64 = 252.0;

/// Approximate trading days per month, for period summaries.
pub const TRADING_DAYS_PER_MONTH: f64 = 21.0;
