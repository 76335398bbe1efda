use std::hint::black_box;
use std::time::Instant;

use markowitz_rs::frontier::generate_frontier;
use markowitz_rs::optimize::OptimizerConfig;
use markowitz_rs::stats::MomentEstimates;
use ndarray::Array1;
use ndarray::Array2;

fn median_ms(samples: &mut [f64]) -> f64 {
  samples.sort_by(f64::total_cmp);
  samples[samples.len() / 2]
}

fn synthetic_moments(k: usize) -> MomentEstimates {
  let tickers = (0..k).map(|i| format!("A{i:03}")).collect();
  let mean = Array1::from_iter((0..k).map(|i| 0.05 + 0.10 * (i as f64 / k as f64)));

  let mut cov = Array2::zeros((k, k));
  for i in 0..k {
    let si = 0.10 + 0.25 * (i as f64 / k as f64);
    for j in 0..k {
      let sj = 0.10 + 0.25 * (j as f64 / k as f64);
      let rho = if i == j { 1.0 } else { 0.3 };
      cov[[i, j]] = rho * si * sj;
    }
  }

  MomentEstimates::from_parts(tickers, mean, cov).unwrap()
}

fn bench_case(k: usize, points: usize, warmup: usize, runs: usize) -> f64 {
  let moments = synthetic_moments(k);
  let config = OptimizerConfig::default();

  for _ in 0..warmup {
    let frontier = generate_frontier(&moments, &config, points).unwrap();
    black_box(frontier);
  }

  let mut times_ms = Vec::with_capacity(runs);
  for _ in 0..runs {
    let t0 = Instant::now();
    let frontier = generate_frontier(&moments, &config, points).unwrap();
    black_box(frontier);
    times_ms.push(t0.elapsed().as_secs_f64() * 1_000.0);
  }

  median_ms(&mut times_ms)
}

fn main() {
  println!("frontier sweep (30 points), median of 5 runs");
  for k in [5, 10, 20, 40] {
    let ms = bench_case(k, 30, 1, 5);
    println!("  {k:>3} assets: {ms:>10.2} ms");
  }
}
