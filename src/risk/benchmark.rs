//! # Benchmark Comparison
//!
//! $$
//! \alpha = r_p - \big(r_f + \beta\,(r_b - r_f)\big)
//! $$
//!
//! CAPM-style comparison of a portfolio value series against a benchmark
//! price series, aligned on their common trading dates.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::PortfolioError;
use crate::error::Result;
use crate::market::TRADING_DAYS;
use crate::stats::descriptive::sample_mean;
use crate::stats::descriptive::sample_std;

/// Minimum overlapping observations for a meaningful comparison.
pub const MIN_OVERLAP: usize = 10;

/// A date-indexed value series (portfolio values or benchmark prices).
#[derive(Clone, Debug)]
pub struct DatedSeries {
  dates: Vec<NaiveDate>,
  values: Vec<f64>,
}

impl DatedSeries {
  /// Pair dates with values; lengths must agree.
  pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
    if dates.len() != values.len() {
      return Err(PortfolioError::DimensionMismatch {
        expected: dates.len(),
        actual: values.len(),
      });
    }

    Ok(Self { dates, values })
  }

  /// Dates of the series.
  pub fn dates(&self) -> &[NaiveDate] {
    &self.dates
  }

  /// Values of the series.
  pub fn values(&self) -> &[f64] {
    &self.values
  }
}

/// Benchmark-relative performance metrics on the common date range.
#[derive(Clone, Debug)]
pub struct BenchmarkComparison {
  /// Number of overlapping observations used.
  pub n_common: usize,
  /// Annualized portfolio return over the common range.
  pub portfolio_annual_return: f64,
  /// Annualized benchmark return over the common range.
  pub benchmark_annual_return: f64,
  /// Annualized benchmark volatility.
  pub benchmark_volatility: f64,
  /// CAPM alpha of the portfolio.
  pub alpha: f64,
  /// CAPM beta; 1 when benchmark variance is 0.
  pub beta: f64,
  /// Pearson correlation of daily returns.
  pub correlation: f64,
  /// Annualized tracking error.
  pub tracking_error: f64,
  /// Excess annualized return over tracking error; 0 when TE is 0.
  pub information_ratio: f64,
  /// Annualized excess return over the benchmark.
  pub excess_return: f64,
  /// Portfolio values rebased to 100 at the first common date.
  pub portfolio_indexed: Vec<f64>,
  /// Benchmark values rebased to 100 at the first common date.
  pub benchmark_indexed: Vec<f64>,
}

/// Compare a portfolio value series with a benchmark price series.
///
/// Requires at least [`MIN_OVERLAP`] common dates; fewer is an explicit
/// insufficient-data outcome, not a computation attempt.
pub fn compare_with_benchmark(
  portfolio: &DatedSeries,
  benchmark: &DatedSeries,
  risk_free: f64,
) -> Result<BenchmarkComparison> {
  let bench_index: HashMap<NaiveDate, usize> = benchmark
    .dates()
    .iter()
    .enumerate()
    .map(|(i, d)| (*d, i))
    .collect();

  let mut port = Vec::new();
  let mut bench = Vec::new();
  for (i, date) in portfolio.dates().iter().enumerate() {
    if let Some(&j) = bench_index.get(date) {
      port.push(portfolio.values()[i]);
      bench.push(benchmark.values()[j]);
    }
  }

  let n_common = port.len();
  if n_common < MIN_OVERLAP {
    return Err(PortfolioError::InsufficientData {
      required: MIN_OVERLAP,
      actual: n_common,
    });
  }

  let port_rets = simple_returns(&port);
  let bench_rets = simple_returns(&bench);
  let n = port_rets.len() as f64;

  let port_total = port[n_common - 1] / port[0] - 1.0;
  let bench_total = bench[n_common - 1] / bench[0] - 1.0;
  let portfolio_annual_return = (1.0 + port_total).powf(TRADING_DAYS / n) - 1.0;
  let benchmark_annual_return = (1.0 + bench_total).powf(TRADING_DAYS / n) - 1.0;
  let benchmark_volatility = sample_std(&bench_rets, 1) * TRADING_DAYS.sqrt();

  // OLS slope of portfolio on benchmark returns equals cov/var.
  let beta = linreg::linear_regression::<f64, f64, f64>(&bench_rets, &port_rets)
    .map(|(slope, _)| slope)
    .unwrap_or(1.0);
  let alpha =
    portfolio_annual_return - (risk_free + beta * (benchmark_annual_return - risk_free));

  let diffs: Vec<f64> = port_rets
    .iter()
    .zip(bench_rets.iter())
    .map(|(p, b)| p - b)
    .collect();
  let tracking_error = sample_std(&diffs, 1) * TRADING_DAYS.sqrt();

  let excess_return = portfolio_annual_return - benchmark_annual_return;
  let information_ratio = if tracking_error > 0.0 {
    excess_return / tracking_error
  } else {
    0.0
  };

  Ok(BenchmarkComparison {
    n_common,
    portfolio_annual_return,
    benchmark_annual_return,
    benchmark_volatility,
    alpha,
    beta,
    correlation: pearson(&port_rets, &bench_rets),
    tracking_error,
    information_ratio,
    excess_return,
    portfolio_indexed: rebase(&port),
    benchmark_indexed: rebase(&bench),
  })
}

fn simple_returns(values: &[f64]) -> Vec<f64> {
  values
    .windows(2)
    .map(|pair| pair[1] / pair[0] - 1.0)
    .collect()
}

fn rebase(values: &[f64]) -> Vec<f64> {
  let base = values[0];
  values.iter().map(|v| v / base * 100.0).collect()
}

fn pearson(x: &[f64], y: &[f64]) -> f64 {
  let n = x.len().min(y.len());
  if n < 2 {
    return 0.0;
  }

  let mx = sample_mean(x);
  let my = sample_mean(y);

  let mut cov = 0.0;
  let mut sx = 0.0;
  let mut sy = 0.0;
  for i in 0..n {
    let dx = x[i] - mx;
    let dy = y[i] - my;
    cov += dx * dy;
    sx += dx * dx;
    sy += dy * dy;
  }

  let denom = (sx * sy).sqrt();
  if denom < 1e-15 {
    0.0
  } else {
    (cov / denom).clamp(-1.0, 1.0)
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;

  use super::*;

  fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap() + chrono::Duration::days(day as i64 - 1)
  }

  fn dates(n: usize) -> Vec<NaiveDate> {
    (1..=n as u32).map(d).collect()
  }

  fn wiggle(n: usize, scale: f64) -> Vec<f64> {
    let mut v = vec![100.0];
    for i in 1..n {
      let r = scale * ((i as f64 * 0.7).sin() * 0.01 + 0.001);
      let last = *v.last().unwrap();
      v.push(last * (1.0 + r));
    }
    v
  }

  #[test]
  fn too_few_common_dates_is_insufficient_data() {
    let a = DatedSeries::new(dates(5), wiggle(5, 1.0)).unwrap();
    let b = DatedSeries::new(dates(5), wiggle(5, 1.0)).unwrap();

    assert!(matches!(
      compare_with_benchmark(&a, &b, 0.0),
      Err(PortfolioError::InsufficientData { required: MIN_OVERLAP, actual: 5 })
    ));
  }

  #[test]
  fn identical_series_has_unit_beta_and_zero_alpha() {
    let values = wiggle(30, 1.0);
    let a = DatedSeries::new(dates(30), values.clone()).unwrap();
    let b = DatedSeries::new(dates(30), values).unwrap();

    let cmp = compare_with_benchmark(&a, &b, 0.05).unwrap();
    assert_eq!(cmp.n_common, 30);
    assert_relative_eq!(cmp.beta, 1.0, epsilon = 1e-9);
    assert_relative_eq!(cmp.correlation, 1.0, epsilon = 1e-9);
    assert_relative_eq!(cmp.alpha, 0.0, epsilon = 1e-9);
    assert_relative_eq!(cmp.tracking_error, 0.0, epsilon = 1e-9);
    assert_eq!(cmp.information_ratio, 0.0);
  }

  #[test]
  fn leveraged_portfolio_doubles_beta() {
    let n = 40;
    let bench = wiggle(n, 1.0);
    let bench_rets = simple_returns(&bench);

    let mut port = vec![100.0];
    for r in &bench_rets {
      let last = *port.last().unwrap();
      port.push(last * (1.0 + 2.0 * r));
    }

    let a = DatedSeries::new(dates(n), port).unwrap();
    let b = DatedSeries::new(dates(n), bench).unwrap();

    let cmp = compare_with_benchmark(&a, &b, 0.0).unwrap();
    assert_relative_eq!(cmp.beta, 2.0, epsilon = 1e-6);
    assert_relative_eq!(cmp.correlation, 1.0, epsilon = 1e-9);
  }

  #[test]
  fn alignment_skips_missing_dates() {
    // Benchmark is missing a third of the dates; alignment keeps the rest.
    let n = 30;
    let port_dates = dates(n);
    let bench_dates: Vec<NaiveDate> = port_dates
      .iter()
      .enumerate()
      .filter(|(i, _)| i % 3 != 0)
      .map(|(_, d)| *d)
      .collect();
    let bench_values = wiggle(bench_dates.len(), 1.0);

    let a = DatedSeries::new(port_dates, wiggle(n, 1.0)).unwrap();
    let b = DatedSeries::new(bench_dates.clone(), bench_values).unwrap();

    let cmp = compare_with_benchmark(&a, &b, 0.0).unwrap();
    assert_eq!(cmp.n_common, bench_dates.len());
    assert_relative_eq!(cmp.portfolio_indexed[0], 100.0, epsilon = 1e-12);
    assert_relative_eq!(cmp.benchmark_indexed[0], 100.0, epsilon = 1e-12);
  }
}
