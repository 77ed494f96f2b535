//! # Return Statistics
//!
//! $$
//! r_t = \ln\frac{P_t}{P_{t-1}}, \qquad
//! \Sigma = \operatorname{Cov}(r), \qquad
//! \mu = \mathbb{E}[r]
//! $$
//!
//! Log-return conversion and sample statistics over the aligned price panel.
//! All operations fail fast on non-positive prices, NaN or degenerate shapes so
//! the solver never sees undefined inputs.

use anyhow::Result;
use anyhow::anyhow;
use anyhow::bail;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::Axis;
use ndarray_stats::CorrelationExt;

/// Convert a close-price matrix (rows = days, columns = assets) to log returns.
///
/// The output has one row fewer than the input and contains no NaN.
pub fn log_return_matrix(closes: &Array2<f64>) -> Result<Array2<f64>> {
  let (n_days, n_assets) = closes.dim();
  if n_days < 2 {
    bail!("need at least 2 price rows to compute returns, got {n_days}");
  }
  if n_assets == 0 {
    bail!("price matrix has no columns");
  }

  for ((i, j), &p) in closes.indexed_iter() {
    if !p.is_finite() || p <= 0.0 {
      bail!("non-positive or non-finite price {p} at row {i}, column {j}");
    }
  }

  let mut returns = Array2::<f64>::zeros((n_days - 1, n_assets));
  for t in 1..n_days {
    for j in 0..n_assets {
      returns[[t - 1, j]] = (closes[[t, j]] / closes[[t - 1, j]]).ln();
    }
  }

  Ok(returns)
}

/// One-dimensional log-return series from a close-price slice.
pub fn log_returns(closes: &[f64]) -> Result<Array1<f64>> {
  if closes.len() < 2 {
    bail!(
      "need at least 2 prices to compute returns, got {}",
      closes.len()
    );
  }

  let mut out = Array1::<f64>::zeros(closes.len() - 1);
  for t in 1..closes.len() {
    let (prev, curr) = (closes[t - 1], closes[t]);
    if !prev.is_finite() || !curr.is_finite() || prev <= 0.0 || curr <= 0.0 {
      bail!("non-positive or non-finite price at index {t}");
    }
    out[t - 1] = (curr / prev).ln();
  }

  Ok(out)
}

fn validate_returns(returns: &Array2<f64>) -> Result<()> {
  let (n_days, n_assets) = returns.dim();
  if n_days == 0 || n_assets == 0 {
    bail!("empty return matrix ({n_days} x {n_assets})");
  }
  if returns.iter().any(|r| !r.is_finite()) {
    bail!("return matrix contains NaN or infinite entries");
  }

  Ok(())
}

/// Sample mean return per asset.
pub fn mean_vector(returns: &Array2<f64>) -> Result<Array1<f64>> {
  validate_returns(returns)?;
  returns
    .mean_axis(Axis(0))
    .ok_or_else(|| anyhow!("empty return matrix"))
}

/// Sample covariance matrix (ddof = 1), symmetric PSD by construction.
pub fn covariance(returns: &Array2<f64>) -> Result<Array2<f64>> {
  validate_returns(returns)?;
  if returns.nrows() < 2 {
    bail!(
      "need at least 2 return rows for a sample covariance, got {}",
      returns.nrows()
    );
  }

  returns
    .t()
    .cov(1.0)
    .map_err(|e| anyhow!("covariance computation failed: {e}"))
}

/// Pearson correlation matrix across assets.
pub fn correlation(returns: &Array2<f64>) -> Result<Array2<f64>> {
  validate_returns(returns)?;
  if returns.nrows() < 2 {
    bail!(
      "need at least 2 return rows for a correlation matrix, got {}",
      returns.nrows()
    );
  }

  returns
    .t()
    .pearson_correlation()
    .map_err(|e| anyhow!("correlation computation failed: {e}"))
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use ndarray::array;

  use super::*;

  #[test]
  fn log_returns_match_definition() {
    let closes = array![[100.0, 50.0], [110.0, 45.0], [121.0, 54.0]];
    let returns = log_return_matrix(&closes).unwrap();

    assert_eq!(returns.dim(), (2, 2));
    assert_relative_eq!(returns[[0, 0]], (110.0f64 / 100.0).ln(), epsilon = 1e-15);
    assert_relative_eq!(returns[[1, 0]], (121.0f64 / 110.0).ln(), epsilon = 1e-15);
    assert_relative_eq!(returns[[0, 1]], (45.0f64 / 50.0).ln(), epsilon = 1e-15);
    assert!(returns.iter().all(|r| r.is_finite()));
  }

  #[test]
  fn non_positive_price_is_rejected() {
    let closes = array![[100.0, 50.0], [0.0, 45.0]];
    assert!(log_return_matrix(&closes).is_err());

    let closes = array![[100.0], [f64::NAN]];
    assert!(log_return_matrix(&closes).is_err());
  }

  #[test]
  fn single_row_is_rejected() {
    let closes = array![[100.0, 50.0]];
    assert!(log_return_matrix(&closes).is_err());
  }

  #[test]
  fn mean_and_covariance_on_known_data() {
    let returns = array![[0.01, 0.02], [0.03, -0.02], [0.02, 0.0]];

    let mu = mean_vector(&returns).unwrap();
    assert_relative_eq!(mu[0], 0.02, epsilon = 1e-12);
    assert_relative_eq!(mu[1], 0.0, epsilon = 1e-12);

    let cov = covariance(&returns).unwrap();
    assert_eq!(cov.dim(), (2, 2));
    assert_relative_eq!(cov[[0, 0]], 0.0001, epsilon = 1e-12);
    assert_relative_eq!(cov[[0, 1]], cov[[1, 0]], epsilon = 1e-15);
  }

  #[test]
  fn correlation_diagonal_is_one() {
    let returns = array![[0.01, 0.02], [0.03, -0.02], [0.02, 0.0], [-0.01, 0.01]];
    let corr = correlation(&returns).unwrap();

    assert_relative_eq!(corr[[0, 0]], 1.0, epsilon = 1e-12);
    assert_relative_eq!(corr[[1, 1]], 1.0, epsilon = 1e-12);
    assert!(corr[[0, 1]].abs() <= 1.0 + 1e-12);
  }

  #[test]
  fn nan_returns_are_rejected() {
    let returns = array![[0.01, f64::NAN], [0.03, -0.02]];
    assert!(mean_vector(&returns).is_err());
    assert!(covariance(&returns).is_err());
  }

  #[test]
  fn one_dimensional_log_returns() {
    let series = log_returns(&[100.0, 110.0, 99.0]).unwrap();

    assert_eq!(series.len(), 2);
    assert_relative_eq!(series[0], (110.0f64 / 100.0).ln(), epsilon = 1e-15);
    assert_relative_eq!(series[1], (99.0f64 / 110.0).ln(), epsilon = 1e-15);
  }
}
