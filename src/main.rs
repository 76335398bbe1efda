use anyhow::Result;
use chrono::Duration;
use chrono::NaiveDate;
use ndarray::Array1;
use ndarray::Array2;
use ndarray_rand::RandomExt;
use prettytable::row;
use prettytable::Table;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::Normal;

use markowitz_rs::frontier::generate_frontier;
use markowitz_rs::market::PriceMatrix;
use markowitz_rs::optimize::OptimizerConfig;
use markowitz_rs::profiles::optimize_for_profile;
use markowitz_rs::profiles::RiskProfile;
use markowitz_rs::risk::benchmark::DatedSeries;
use markowitz_rs::risk::compare_with_benchmark;
use markowitz_rs::risk::portfolio_risk_report;
use markowitz_rs::stats::asset_metrics;
use markowitz_rs::stats::MomentEstimates;
use markowitz_rs::Backtester;

const RISK_FREE: f64 = 0.05;
const MAX_WEIGHT: f64 = 0.4;

/// Simulate one GBM price path of `n` daily closes.
fn gbm_path(rng: &mut StdRng, n: usize, s0: f64, mu: f64, sigma: f64) -> Vec<f64> {
  let dt: f64 = 1.0 / 252.0;
  let noise = Array1::random_using(n - 1, Normal::new(0.0, dt.sqrt()).unwrap(), rng);

  let mut path = Vec::with_capacity(n);
  let mut s = s0;
  path.push(s);
  for i in 1..n {
    s *= 1.0 + mu * dt + sigma * noise[i - 1];
    path.push(s);
  }

  path
}

fn synthetic_panel(n: usize) -> Result<PriceMatrix> {
  let mut rng = StdRng::seed_from_u64(42);
  let start = NaiveDate::from_ymd_opt(2021, 1, 4).unwrap();
  let dates: Vec<NaiveDate> = (0..n).map(|i| start + Duration::days(i as i64)).collect();

  let tickers = ["TECH", "BANK", "UTIL", "ENER", "CONS"];
  let drifts = [0.18, 0.11, 0.07, 0.13, 0.09];
  let sigmas = [0.35, 0.25, 0.12, 0.30, 0.18];

  let mut values = Array2::zeros((n, tickers.len()));
  for (j, (&mu, &sigma)) in drifts.iter().zip(sigmas.iter()).enumerate() {
    let path = gbm_path(&mut rng, n, 100.0, mu, sigma);
    for (i, p) in path.iter().enumerate() {
      values[[i, j]] = *p;
    }
  }

  Ok(PriceMatrix::new(
    dates,
    tickers.iter().map(|t| t.to_string()).collect(),
    values,
  )?)
}

fn main() -> Result<()> {
  let prices = synthetic_panel(756)?;
  let returns = prices.log_returns()?;
  let moments = MomentEstimates::estimate(&returns)?;

  let summary = prices.period_summary();
  println!(
    "Panel: {} instruments, {} observations ({} .. {}, ~{} years)\n",
    prices.n_assets(),
    summary.observations,
    summary.start,
    summary.end,
    summary.years
  );

  let mut table = Table::new();
  table.add_row(row!["Ticker", "Annual return", "Annual vol", "Sharpe"]);
  for m in asset_metrics(&returns, RISK_FREE) {
    table.add_row(row![
      m.ticker,
      format!("{:.2}%", m.annual_return * 100.0),
      format!("{:.2}%", m.annual_volatility * 100.0),
      format!("{:.3}", m.sharpe)
    ]);
  }
  table.printstd();

  let config = OptimizerConfig {
    risk_free: RISK_FREE,
    max_weight: MAX_WEIGHT,
    ..Default::default()
  };

  let mut chosen = None;
  for profile in RiskProfile::all() {
    let result = optimize_for_profile(profile, &moments, &config)?;

    println!(
      "\n{profile} ({}): expected return {:.2}%, volatility {:.2}%, Sharpe {:.3} [{}]",
      profile.description(),
      result.expected_return * 100.0,
      result.volatility * 100.0,
      result.sharpe,
      result.message
    );

    let mut alloc = Table::new();
    alloc.add_row(row!["Ticker", "Weight"]);
    for (ticker, weight) in result.tickers.iter().zip(result.weights.iter()) {
      if *weight > 1e-4 {
        alloc.add_row(row![ticker, format!("{:.2}%", weight * 100.0)]);
      }
    }
    alloc.printstd();

    if profile == RiskProfile::Moderate {
      chosen = Some(result);
    }
  }
  let chosen = chosen.expect("moderate profile always optimized");

  let frontier = generate_frontier(&moments, &config, 30)?;
  println!(
    "\nEfficient frontier: {} points kept, {} dropped",
    frontier.len(),
    frontier.dropped()
  );
  if let (Some(first), Some(last)) = (frontier.points().first(), frontier.points().last()) {
    println!(
      "  from (return {:.2}%, vol {:.2}%) to (return {:.2}%, vol {:.2}%)",
      first.target_return * 100.0,
      first.volatility * 100.0,
      last.target_return * 100.0,
      last.volatility * 100.0
    );
  }

  let pairs: Vec<(String, f64)> = chosen
    .tickers
    .iter()
    .cloned()
    .zip(chosen.weights.iter().copied())
    .collect();
  let backtest = Backtester::new(63, 100_000.0, RISK_FREE, 0.95).run(&prices, &pairs)?;

  let mut bt = Table::new();
  bt.add_row(row!["Metric", "Value"]);
  bt.add_row(row!["Final capital", format!("{:.2}", backtest.final_capital)]);
  bt.add_row(row![
    "Total return",
    format!("{:.2}%", backtest.total_return * 100.0)
  ]);
  bt.add_row(row![
    "Annualized return",
    format!("{:.2}%", backtest.annualized_return * 100.0)
  ]);
  bt.add_row(row![
    "Annualized vol",
    format!("{:.2}%", backtest.annualized_volatility * 100.0)
  ]);
  bt.add_row(row!["Sharpe", format!("{:.3}", backtest.sharpe)]);
  bt.add_row(row!["Sortino", format!("{:.3}", backtest.sortino)]);
  bt.add_row(row![
    "Max drawdown",
    format!(
      "{:.2}% ({} days)",
      backtest.max_drawdown * 100.0,
      backtest.max_drawdown_duration
    )
  ]);
  bt.add_row(row![
    "VaR 95% (daily)",
    format!("{:.2}%", backtest.var_daily * 100.0)
  ]);
  bt.add_row(row![
    "CVaR 95% (daily)",
    format!("{:.2}%", backtest.cvar_daily * 100.0)
  ]);
  println!("\nWalk-forward backtest (quarterly rebalance):");
  bt.printstd();

  let report = portfolio_risk_report(&returns, &chosen.weights, RISK_FREE, 0.95)?;
  println!(
    "\nRisk report: skew {:.3}, excess kurtosis {:.3}, VaR99 {:.2}%",
    report.skewness,
    report.kurtosis,
    report.var_daily_99 * 100.0
  );

  let benchmark = DatedSeries::new(
    prices.dates().to_vec(),
    prices
      .column("UTIL")
      .expect("UTIL is in the panel")
      .to_vec(),
  )?;
  let comparison = compare_with_benchmark(&backtest.value_series()?, &benchmark, RISK_FREE)?;
  println!(
    "Versus UTIL benchmark: beta {:.3}, alpha {:.2}%, tracking error {:.2}%, IR {:.3}",
    comparison.beta,
    comparison.alpha * 100.0,
    comparison.tracking_error * 100.0,
    comparison.information_ratio
  );

  Ok(())
}
