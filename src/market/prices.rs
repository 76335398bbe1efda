//! # Price Matrix
//!
//! $$
//! P = (p_{t,i}), \quad t_1 < t_2 < \dots < t_T
//! $$
//!
//! Date-ordered adjusted close panel. Rows are trading dates (strictly
//! increasing, unique), columns are instruments (unique identifiers).
//! After ingestion every cell is populated.

use chrono::NaiveDate;
use ndarray::Array2;
use ndarray::ArrayView1;
use ndarray::ArrayView2;

use crate::error::PortfolioError;
use crate::error::Result;
use crate::market::TRADING_DAYS;
use crate::market::TRADING_DAYS_PER_MONTH;
use crate::market::returns::ReturnMatrix;

/// Minimum fraction of dates an instrument must cover to survive ingestion.
pub const MIN_COVERAGE: f64 = 0.8;

/// Minimum number of usable instruments after ingestion.
pub const MIN_INSTRUMENTS: usize = 3;

/// Complete panel of adjusted closing prices.
#[derive(Clone, Debug)]
pub struct PriceMatrix {
  dates: Vec<NaiveDate>,
  tickers: Vec<String>,
  values: Array2<f64>,
}

/// Coarse description of the span covered by a panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeriodSummary {
  /// Number of trading-date rows.
  pub observations: usize,
  /// Approximate calendar months covered (~21 trading days each).
  pub months: usize,
  /// Approximate years covered (one decimal of precision).
  pub years: f64,
  /// First trading date.
  pub start: NaiveDate,
  /// Last trading date.
  pub end: NaiveDate,
}

impl PriceMatrix {
  /// Build a panel from an already-complete matrix.
  ///
  /// Fails fast on empty input, duplicate/unordered dates, duplicate
  /// tickers or a shape mismatch.
  pub fn new(dates: Vec<NaiveDate>, tickers: Vec<String>, values: Array2<f64>) -> Result<Self> {
    if dates.is_empty() || tickers.is_empty() {
      return Err(PortfolioError::InsufficientData {
        required: 1,
        actual: 0,
      });
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

    for pair in dates.windows(2) {
      if pair[1] <= pair[0] {
        return Err(PortfolioError::InfeasibleConstraint(format!(
          "dates must be strictly increasing: {} !< {}",
          pair[0], pair[1]
        )));
      }
    }

    for (i, t) in tickers.iter().enumerate() {
      if tickers[..i].contains(t) {
        return Err(PortfolioError::InfeasibleConstraint(format!(
          "duplicate ticker: {t}"
        )));
      }
    }

    Ok(Self {
      dates,
      tickers,
      values,
    })
  }

  /// Ingest per-instrument `(date, close)` series into a complete panel.
  ///
  /// Aligns everything on the union of dates, drops instruments covering
  /// fewer than [`MIN_COVERAGE`] of the rows, then forward-fills and
  /// back-fills the remaining gaps. At least [`MIN_INSTRUMENTS`] must
  /// survive.
  pub fn from_series(series: &[(String, Vec<(NaiveDate, f64)>)]) -> Result<Self> {
    let mut dates: Vec<NaiveDate> = series
      .iter()
      .flat_map(|(_, obs)| obs.iter().map(|(d, _)| *d))
      .collect();
    dates.sort_unstable();
    dates.dedup();

    if dates.is_empty() {
      return Err(PortfolioError::InsufficientData {
        required: 1,
        actual: 0,
      });
    }

    let n = dates.len();
    let min_count = (n as f64 * MIN_COVERAGE).ceil() as usize;

    let mut tickers = Vec::new();
    let mut columns: Vec<Vec<f64>> = Vec::new();

    for (ticker, obs) in series {
      let mut col = vec![f64::NAN; n];
      let mut count = 0usize;
      for (date, close) in obs {
        if let Ok(row) = dates.binary_search(date) {
          if close.is_finite() && *close > 0.0 {
            col[row] = *close;
            count += 1;
          }
        }
      }

      if count < min_count {
        tracing::warn!(%ticker, count, required = min_count, "dropping sparse instrument");
        continue;
      }

      fill_gaps(&mut col);
      tickers.push(ticker.clone());
      columns.push(col);
    }

    if tickers.len() < MIN_INSTRUMENTS {
      return Err(PortfolioError::InsufficientData {
        required: MIN_INSTRUMENTS,
        actual: tickers.len(),
      });
    }

    let mut values = Array2::zeros((n, tickers.len()));
    for (j, col) in columns.iter().enumerate() {
      for (i, v) in col.iter().enumerate() {
        values[[i, j]] = *v;
      }
    }

    Self::new(dates, tickers, values)
  }

  /// Number of trading-date rows.
  pub fn n_obs(&self) -> usize {
    self.dates.len()
  }

  /// Number of instrument columns.
  pub fn n_assets(&self) -> usize {
    self.tickers.len()
  }

  /// Trading dates, oldest first.
  pub fn dates(&self) -> &[NaiveDate] {
    &self.dates
  }

  /// Instrument identifiers in column order.
  pub fn tickers(&self) -> &[String] {
    &self.tickers
  }

  /// Raw price values, rows = dates, columns = instruments.
  pub fn values(&self) -> ArrayView2<'_, f64> {
    self.values.view()
  }

  /// Column view for one instrument, if present.
  pub fn column(&self, ticker: &str) -> Option<ArrayView1<'_, f64>> {
    let j = self.tickers.iter().position(|t| t == ticker)?;
    Some(self.values.column(j))
  }

  /// Daily log returns, one row shorter than the panel.
  pub fn log_returns(&self) -> Result<ReturnMatrix> {
    self.returns_with(|prev, cur| (cur / prev).ln())
  }

  /// Daily simple (percent) returns, one row shorter than the panel.
  pub fn simple_returns(&self) -> Result<ReturnMatrix> {
    self.returns_with(|prev, cur| cur / prev - 1.0)
  }

  fn returns_with(&self, f: impl Fn(f64, f64) -> f64) -> Result<ReturnMatrix> {
    if self.dates.len() < 2 {
      return Err(PortfolioError::InsufficientData {
        required: 2,
        actual: self.dates.len(),
      });
    }

    let t = self.dates.len() - 1;
    let k = self.tickers.len();
    let mut values = Array2::zeros((t, k));
    for i in 0..t {
      for j in 0..k {
        values[[i, j]] = f(self.values[[i, j]], self.values[[i + 1, j]]);
      }
    }

    ReturnMatrix::new(self.dates[1..].to_vec(), self.tickers.clone(), values)
  }

  /// Observation/month/year span of the panel.
  pub fn period_summary(&self) -> PeriodSummary {
    let observations = self.dates.len();
    PeriodSummary {
      observations,
      months: (observations as f64 / TRADING_DAYS_PER_MONTH).round() as usize,
      years: (observations as f64 / TRADING_DAYS * 10.0).round() / 10.0,
      start: self.dates[0],
      end: self.dates[observations - 1],
    }
  }
}

/// Forward-fill then back-fill NaN gaps in place.
fn fill_gaps(col: &mut [f64]) {
  let mut last = f64::NAN;
  for v in col.iter_mut() {
    if v.is_nan() {
      *v = last;
    } else {
      last = *v;
    }
  }

  let mut next = f64::NAN;
  for v in col.iter_mut().rev() {
    if v.is_nan() {
      *v = next;
    } else {
      next = *v;
    }
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use chrono::NaiveDate;
  use ndarray::array;

  use super::*;

  fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
  }

  fn small_panel() -> PriceMatrix {
    PriceMatrix::new(
      vec![d(2), d(3), d(4)],
      vec!["AAA".to_string(), "BBB".to_string()],
      array![[100.0, 50.0], [110.0, 49.0], [121.0, 51.0]],
    )
    .unwrap()
  }

  #[test]
  fn rejects_empty_input() {
    let res = PriceMatrix::new(vec![], vec![], Array2::zeros((0, 0)));
    assert!(matches!(
      res,
      Err(PortfolioError::InsufficientData { .. })
    ));
  }

  #[test]
  fn rejects_unordered_dates() {
    let res = PriceMatrix::new(
      vec![d(3), d(2)],
      vec!["AAA".to_string()],
      Array2::ones((2, 1)),
    );
    assert!(res.is_err());
  }

  #[test]
  fn rejects_duplicate_tickers() {
    let res = PriceMatrix::new(
      vec![d(2), d(3)],
      vec!["AAA".to_string(), "AAA".to_string()],
      Array2::ones((2, 2)),
    );
    assert!(res.is_err());
  }

  #[test]
  fn log_returns_shape_and_values() {
    let panel = small_panel();
    let rets = panel.log_returns().unwrap();

    assert_eq!(rets.n_obs(), 2);
    assert_eq!(rets.dates()[0], d(3));
    assert_relative_eq!(rets.values()[[0, 0]], (110.0f64 / 100.0).ln(), epsilon = 1e-12);
    assert_relative_eq!(rets.values()[[1, 1]], (51.0f64 / 49.0).ln(), epsilon = 1e-12);
  }

  #[test]
  fn simple_returns_match_pct_change() {
    let panel = small_panel();
    let rets = panel.simple_returns().unwrap();

    assert_relative_eq!(rets.values()[[0, 0]], 0.10, epsilon = 1e-12);
    assert_relative_eq!(rets.values()[[0, 1]], -0.02, epsilon = 1e-12);
  }

  #[test]
  fn from_series_fills_gaps_and_drops_sparse() {
    let dense: Vec<(NaiveDate, f64)> = (2..=11).map(|i| (d(i), 100.0 + i as f64)).collect();
    let gappy: Vec<(NaiveDate, f64)> = (2..=11)
      .filter(|i| *i != 5)
      .map(|i| (d(i), 50.0 + i as f64))
      .collect();
    // Covers 2 of 10 dates, below the 80% threshold.
    let sparse: Vec<(NaiveDate, f64)> = vec![(d(2), 10.0), (d(3), 11.0)];
    let third: Vec<(NaiveDate, f64)> = (2..=11).map(|i| (d(i), 30.0 + i as f64)).collect();

    let panel = PriceMatrix::from_series(&[
      ("AAA".to_string(), dense),
      ("BBB".to_string(), gappy),
      ("CCC".to_string(), sparse),
      ("DDD".to_string(), third),
    ])
    .unwrap();

    assert_eq!(panel.tickers(), &["AAA", "BBB", "DDD"]);
    assert_eq!(panel.n_obs(), 10);
    // Gap on day 5 forward-filled from day 4.
    let bbb = panel.column("BBB").unwrap();
    assert_relative_eq!(bbb[3], 54.0, epsilon = 1e-12);
  }

  #[test]
  fn from_series_requires_three_instruments() {
    let a: Vec<(NaiveDate, f64)> = (2..=6).map(|i| (d(i), 1.0 + i as f64)).collect();
    let b = a.clone();

    let res = PriceMatrix::from_series(&[("AAA".to_string(), a), ("BBB".to_string(), b)]);
    assert!(matches!(
      res,
      Err(PortfolioError::InsufficientData {
        required: MIN_INSTRUMENTS,
        actual: 2
      })
    ));
  }

  #[test]
  fn period_summary_spans_panel() {
    let panel = small_panel();
    let summary = panel.period_summary();

    assert_eq!(summary.observations, 3);
    assert_eq!(summary.start, d(2));
    assert_eq!(summary.end, d(4));
  }
}
