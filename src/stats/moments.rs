//! # Moment Estimates
//!
//! $$
//! \hat\Sigma = \frac{252}{N-1} (R - \bar R)^\top (R - \bar R)
//! $$
//!
//! Annualized mean vector and sample covariance of a return panel. The
//! covariance is symmetric by construction and deliberately *not*
//! repaired when noisy input makes it numerically non-PSD; that case
//! surfaces downstream as a non-converged solve.

use ndarray::Array1;
use ndarray::Array2;
use ndarray::Axis;

use crate::error::PortfolioError;
use crate::error::Result;
use crate::market::ReturnMatrix;
use crate::market::TRADING_DAYS;
use crate::stats::descriptive::sample_std;

/// Annualized first and second moments of a return panel.
#[derive(Clone, Debug)]
pub struct MomentEstimates {
  tickers: Vec<String>,
  mean: Array1<f64>,
  cov: Array2<f64>,
}

impl MomentEstimates {
  /// Estimate moments from daily returns; requires at least 2 rows.
  pub fn estimate(returns: &ReturnMatrix) -> Result<Self> {
    let n = returns.n_obs();
    if n < 2 {
      return Err(PortfolioError::InsufficientData {
        required: 2,
        actual: n,
      });
    }

    let values = returns.values();
    let daily_mean = values
      .mean_axis(Axis(0))
      .ok_or(PortfolioError::EmptySeries)?;

    let centered = &values - &daily_mean.view().insert_axis(Axis(0));
    let cov = centered.t().dot(&centered) * (TRADING_DAYS / (n - 1) as f64);

    Ok(Self {
      tickers: returns.tickers().to_vec(),
      mean: daily_mean * TRADING_DAYS,
      cov,
    })
  }

  /// Build from already-annualized moments (useful for synthetic setups).
  pub fn from_parts(tickers: Vec<String>, mean: Array1<f64>, cov: Array2<f64>) -> Result<Self> {
    if mean.len() != tickers.len() {
      return Err(PortfolioError::DimensionMismatch {
        expected: tickers.len(),
        actual: mean.len(),
      });
    }

    if cov.nrows() != mean.len() || cov.ncols() != mean.len() {
      return Err(PortfolioError::DimensionMismatch {
        expected: mean.len(),
        actual: cov.nrows(),
      });
    }

    Ok(Self { tickers, mean, cov })
  }

  /// Instrument identifiers in moment order.
  pub fn tickers(&self) -> &[String] {
    &self.tickers
  }

  /// Annualized mean return vector.
  pub fn mean(&self) -> &Array1<f64> {
    &self.mean
  }

  /// Annualized covariance matrix.
  pub fn cov(&self) -> &Array2<f64> {
    &self.cov
  }

  /// Number of instruments.
  pub fn n_assets(&self) -> usize {
    self.tickers.len()
  }

  /// Restrict the moments to a subset of instrument indices.
  ///
  /// Index order is preserved in the output.
  pub fn select(&self, indices: &[usize]) -> Result<Self> {
    for &i in indices {
      if i >= self.tickers.len() {
        return Err(PortfolioError::DimensionMismatch {
          expected: self.tickers.len(),
          actual: i,
        });
      }
    }

    let tickers = indices.iter().map(|&i| self.tickers[i].clone()).collect();
    let mean = indices.iter().map(|&i| self.mean[i]).collect();
    let mut cov = Array2::zeros((indices.len(), indices.len()));
    for (a, &i) in indices.iter().enumerate() {
      for (b, &j) in indices.iter().enumerate() {
        cov[[a, b]] = self.cov[[i, j]];
      }
    }

    Self::from_parts(tickers, mean, cov)
  }
}

/// Per-instrument descriptive metrics for reporting.
///
/// These feed tables, not the optimizer.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetMetrics {
  /// Instrument identifier.
  pub ticker: String,
  /// Annualized mean return.
  pub annual_return: f64,
  /// Annualized volatility (sample std × √252).
  pub annual_volatility: f64,
  /// Sharpe ratio against the supplied risk-free rate; 0 on zero vol.
  pub sharpe: f64,
}

/// Annual return/volatility/Sharpe per instrument, sorted by Sharpe
/// descending.
pub fn asset_metrics(returns: &ReturnMatrix, risk_free: f64) -> Vec<AssetMetrics> {
  let values = returns.values();
  let mut out: Vec<AssetMetrics> = returns
    .tickers()
    .iter()
    .enumerate()
    .map(|(j, ticker)| {
      let col: Vec<f64> = values.column(j).to_vec();
      let annual_return =
        col.iter().sum::<f64>() / col.len().max(1) as f64 * TRADING_DAYS;
      let annual_volatility = sample_std(&col, 1) * TRADING_DAYS.sqrt();
      let sharpe = if annual_volatility > 0.0 {
        (annual_return - risk_free) / annual_volatility
      } else {
        0.0
      };

      AssetMetrics {
        ticker: ticker.clone(),
        annual_return,
        annual_volatility,
        sharpe,
      }
    })
    .collect();

  out.sort_by(|a, b| b.sharpe.partial_cmp(&a.sharpe).unwrap_or(std::cmp::Ordering::Equal));
  out
}
