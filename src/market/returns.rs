//! # Return Matrix
//!
//! $$
//! R \in \mathbb{R}^{(T-1) \times K}
//! $$
//!
//! Differenced return panel. Immutable once computed; the first price
//! observation is consumed by the differencing.

use chrono::NaiveDate;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::ArrayView1;
use ndarray::ArrayView2;

use crate::error::PortfolioError;
use crate::error::Result;

/// Date-indexed panel of per-instrument returns.
#[derive(Clone, Debug)]
pub struct ReturnMatrix {
  dates: Vec<NaiveDate>,
  tickers: Vec<String>,
  values: Array2<f64>,
}

impl ReturnMatrix {
  /// Wrap a return panel; shapes must agree and at least one row exist.
  pub fn new(dates: Vec<NaiveDate>, tickers: Vec<String>, values: Array2<f64>) -> Result<Self> {
    if dates.is_empty() {
      return Err(PortfolioError::EmptySeries);
    }

    if values.nrows() != dates.len() {
      return Err(PortfolioError::DimensionMismatch {
        expected: dates.len(),
        actual: values.nrows(),
      });
    }

    if values.ncols() != tickers.len() {
      return Err(PortfolioError::DimensionMismatch {
        expected: tickers.len(),
        actual: values.ncols(),
      });
    }

    Ok(Self {
      dates,
      tickers,
      values,
    })
  }

  /// Number of return observations.
  pub fn n_obs(&self) -> usize {
    self.dates.len()
  }

  /// Number of instrument columns.
  pub fn n_assets(&self) -> usize {
    self.tickers.len()
  }

  /// Dates of the return rows, oldest first.
  pub fn dates(&self) -> &[NaiveDate] {
    &self.dates
  }

  /// Instrument identifiers in column order.
  pub fn tickers(&self) -> &[String] {
    &self.tickers
  }

  /// Raw return values, rows = dates, columns = instruments.
  pub fn values(&self) -> ArrayView2<'_, f64> {
    self.values.view()
  }

  /// Column view for one instrument, if present.
  pub fn column(&self, ticker: &str) -> Option<ArrayView1<'_, f64>> {
    let j = self.tickers.iter().position(|t| t == ticker)?;
    Some(self.values.column(j))
  }

  /// Weighted cross-section: the portfolio return series `R w`.
  ///
  /// Weight order must match the ticker order of the panel.
  pub fn weighted(&self, weights: &Array1<f64>) -> Result<Array1<f64>> {
    if weights.len() != self.tickers.len() {
      return Err(PortfolioError::DimensionMismatch {
        expected: self.tickers.len(),
        actual: weights.len(),
      });
    }

    Ok(self.values.dot(weights))
  }
}
