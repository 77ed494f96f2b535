//! # Backtest
//!
//! $$
//! r_{p,t} = \mathbf{w}^\top \mathbf{r}_t, \qquad
//! G_t = \exp\Big(\sum_{s \le t} r_{p,s}\Big)
//! $$
//!
//! Replays a fixed weight vector through the historical log-return matrix and
//! summarizes the realized series. All metrics are computed from the realized
//! returns, never re-derived from the optimizer.

use anyhow::Result;
use anyhow::bail;
use ndarray::Array1;
use ndarray::Array2;

/// Trading days per year used for annualization.
pub const TRADING_DAYS: f64 = 252.0;

/// Summary statistics of a realized daily return series.
#[derive(Clone, Copy, Debug)]
pub struct PerformanceSummary {
  /// Mean daily return scaled by [`TRADING_DAYS`].
  pub annualized_return: f64,
  /// Daily standard deviation scaled by `sqrt(TRADING_DAYS)`.
  pub annualized_vol: f64,
  /// `(annualized_return - risk_free) / annualized_vol`.
  pub sharpe: f64,
  /// Largest peak-to-trough loss of the growth curve, in `[0, 1]`.
  pub max_drawdown: f64,
  /// `annualized_return / max_drawdown`; zero when there is no drawdown.
  pub calmar: f64,
}

/// Realized series and summary of one backtest run.
#[derive(Clone, Debug)]
pub struct BacktestResult {
  /// Daily portfolio log returns.
  pub daily_returns: Array1<f64>,
  /// Growth of one unit of capital, same length as `daily_returns`.
  pub growth: Array1<f64>,
  /// Summary statistics over the realized series.
  pub summary: PerformanceSummary,
}

/// Project a weight vector through the return matrix to daily portfolio returns.
pub fn replay(weights: &Array1<f64>, returns: &Array2<f64>) -> Result<Array1<f64>> {
  if returns.nrows() == 0 {
    bail!("empty return matrix");
  }
  if weights.len() != returns.ncols() {
    bail!(
      "{} weights for {} assets",
      weights.len(),
      returns.ncols()
    );
  }

  Ok(returns.dot(weights))
}

/// Growth of one unit of capital under daily log returns.
pub fn cumulative_growth(daily_returns: &Array1<f64>) -> Array1<f64> {
  let mut acc = 0.0;
  daily_returns
    .iter()
    .map(|&r| {
      acc += r;
      acc.exp()
    })
    .collect()
}

fn max_drawdown(growth: &Array1<f64>) -> f64 {
  let mut peak = f64::NEG_INFINITY;
  let mut mdd = 0.0f64;
  for &v in growth {
    peak = peak.max(v);
    if peak > 0.0 {
      mdd = mdd.max(1.0 - v / peak);
    }
  }
  mdd
}

/// Summarize a realized daily return series against an annualized risk-free rate.
pub fn summarize(daily_returns: &Array1<f64>, risk_free: f64) -> Result<PerformanceSummary> {
  let n = daily_returns.len();
  if n < 2 {
    bail!("need at least 2 daily returns to summarize, got {n}");
  }
  if daily_returns.iter().any(|r| !r.is_finite()) {
    bail!("realized return series contains NaN or infinite entries");
  }

  let mean = daily_returns.sum() / n as f64;
  let var = daily_returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1) as f64;

  let annualized_return = mean * TRADING_DAYS;
  let annualized_vol = var.sqrt() * TRADING_DAYS.sqrt();
  let sharpe = if annualized_vol > 1e-15 {
    (annualized_return - risk_free) / annualized_vol
  } else {
    0.0
  };

  let growth = cumulative_growth(daily_returns);
  let mdd = max_drawdown(&growth);
  let calmar = if mdd > 1e-15 {
    annualized_return / mdd
  } else {
    0.0
  };

  Ok(PerformanceSummary {
    annualized_return,
    annualized_vol,
    sharpe,
    max_drawdown: mdd,
    calmar,
  })
}

/// Backtest an already-realized daily return series (e.g. the benchmark).
pub fn backtest_series(daily_returns: &Array1<f64>, risk_free: f64) -> Result<BacktestResult> {
  let summary = summarize(daily_returns, risk_free)?;
  Ok(BacktestResult {
    daily_returns: daily_returns.clone(),
    growth: cumulative_growth(daily_returns),
    summary,
  })
}

/// Replay `weights` through `returns` and summarize the realized series.
pub fn backtest(
  weights: &Array1<f64>,
  returns: &Array2<f64>,
  risk_free: f64,
) -> Result<BacktestResult> {
  let daily = replay(weights, returns)?;
  backtest_series(&daily, risk_free)
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use ndarray::array;

  use super::*;

  #[test]
  fn replay_is_weighted_sum() {
    let weights = array![0.5, 0.5];
    let returns = array![[0.02, 0.0], [-0.01, 0.03]];

    let daily = replay(&weights, &returns).unwrap();
    assert_relative_eq!(daily[0], 0.01, epsilon = 1e-15);
    assert_relative_eq!(daily[1], 0.01, epsilon = 1e-15);
  }

  #[test]
  fn replay_rejects_mismatched_weights() {
    let weights = array![1.0];
    let returns = array![[0.02, 0.0]];

    assert!(replay(&weights, &returns).is_err());
  }

  #[test]
  fn backtest_is_deterministic() {
    let weights = array![0.3, 0.7];
    let returns = array![
      [0.01, -0.02],
      [0.005, 0.012],
      [-0.02, 0.001],
      [0.013, -0.004]
    ];

    let a = backtest(&weights, &returns, 0.0).unwrap();
    let b = backtest(&weights, &returns, 0.0).unwrap();

    assert_eq!(a.growth.to_vec(), b.growth.to_vec());
    assert_eq!(a.daily_returns.to_vec(), b.daily_returns.to_vec());
  }

  #[test]
  fn growth_curve_is_exp_of_cumsum() {
    let daily = array![0.1, -0.05, 0.02];
    let growth = cumulative_growth(&daily);

    assert_relative_eq!(growth[0], 0.1f64.exp(), epsilon = 1e-15);
    assert_relative_eq!(growth[2], 0.07f64.exp(), epsilon = 1e-12);
  }

  #[test]
  fn drawdown_on_known_series() {
    // Growth 1.0 -> 1.2 -> 0.9 -> 1.1: worst drop is 0.9 / 1.2 = 25%.
    let daily = array![
      0.0f64,
      (1.2f64 / 1.0).ln(),
      (0.9f64 / 1.2).ln(),
      (1.1f64 / 0.9).ln()
    ];

    let summary = summarize(&daily, 0.0).unwrap();
    assert_relative_eq!(summary.max_drawdown, 0.25, epsilon = 1e-12);
    assert!(summary.calmar != 0.0);
  }

  #[test]
  fn summary_rejects_degenerate_inputs() {
    assert!(summarize(&array![0.01], 0.0).is_err());
    assert!(summarize(&array![0.01, f64::NAN], 0.0).is_err());
  }

  #[test]
  fn sharpe_uses_risk_free_rate() {
    let daily = array![0.001, 0.002, 0.0005, 0.0015];
    let at_zero = summarize(&daily, 0.0).unwrap();
    let at_two_pct = summarize(&daily, 0.02).unwrap();

    assert!(at_zero.sharpe > at_two_pct.sharpe);
  }
}
