//! # Efficient Frontier
//!
//! $$
//! \sigma(r^\*) = \min_{\mathbf{w}} \sqrt{\mathbf{w}^\top \Sigma \mathbf{w}}
//! \quad \text{s.t.} \quad \mathbf{1}^\top\mathbf{w} = 1,\ \mu^\top\mathbf{w} = r^\*
//! $$
//!
//! One convex QP per target return, solved with Clarabel. Targets are sampled
//! evenly between the 25th and 75th percentile of per-asset mean returns. An
//! infeasible target is skipped with a warning instead of failing the sweep.

use anyhow::Result;
use anyhow::anyhow;
use anyhow::bail;
use clarabel::algebra::CscMatrix;
use clarabel::solver::DefaultSettingsBuilder;
use clarabel::solver::DefaultSolver;
use clarabel::solver::IPSolver;
use clarabel::solver::SolverStatus;
use clarabel::solver::SupportedConeT;
use ndarray::Array1;
use ndarray::Array2;
use statrs::statistics::Data;
use statrs::statistics::OrderStatistics;
use tracing::info;
use tracing::warn;

use super::types::FrontierConfig;
use super::types::FrontierPoint;

/// Evenly spaced target returns between the 25th and 75th percentile of the
/// per-asset mean returns, in ascending order.
pub fn target_grid(mu: &Array1<f64>, n_targets: usize) -> Result<Vec<f64>> {
  if mu.is_empty() {
    bail!("mean-return vector is empty");
  }
  if n_targets == 0 {
    bail!("n_targets must be at least 1");
  }

  let mut data = Data::new(mu.to_vec());
  let lo = data.quantile(0.25);
  let hi = data.quantile(0.75);

  if n_targets == 1 {
    return Ok(vec![(lo + hi) / 2.0]);
  }

  let step = (hi - lo) / (n_targets - 1) as f64;
  Ok((0..n_targets).map(|i| lo + step * i as f64).collect())
}

/// Upper triangle of `2Σ` in CSC form; Clarabel's objective is `(1/2)wᵀPw`.
fn quadratic_cost(cov: &Array2<f64>) -> CscMatrix<f64> {
  let n = cov.nrows();
  let mut data = Vec::new();
  let mut indices = Vec::new();
  let mut indptr = vec![0];

  for j in 0..n {
    for i in 0..=j {
      let val = 2.0 * cov[[i, j]];
      if val.abs() > 1e-12 {
        data.push(val);
        indices.push(i);
      }
    }
    indptr.push(data.len());
  }

  CscMatrix::new(n, n, indptr, indices, data)
}

/// Constraint matrix: two equality rows (budget, target return) followed by
/// `2n` box rows (`w ≤ max`, `-w ≤ -min`).
fn constraint_matrix(mu: &Array1<f64>) -> CscMatrix<f64> {
  let n = mu.len();
  let mut data = Vec::with_capacity(4 * n);
  let mut indices = Vec::with_capacity(4 * n);
  let mut indptr = vec![0];

  for j in 0..n {
    data.push(1.0);
    indices.push(0);
    data.push(mu[j]);
    indices.push(1);
    data.push(1.0);
    indices.push(2 + j);
    data.push(-1.0);
    indices.push(2 + n + j);
    indptr.push(data.len());
  }

  CscMatrix::new(2 + 2 * n, n, indptr, indices, data)
}

/// Solve one minimum-variance QP for a fixed target return.
///
/// Returns `Ok(None)` when the target is infeasible under the weight bounds;
/// solver construction failures are hard errors.
pub fn solve_target(
  mu: &Array1<f64>,
  cov: &Array2<f64>,
  target: f64,
  min_weight: f64,
  max_weight: f64,
) -> Result<Option<Array1<f64>>> {
  let n = mu.len();
  if n == 0 {
    bail!("mean-return vector is empty");
  }
  if cov.dim() != (n, n) {
    bail!(
      "covariance shape {:?} does not match {} assets",
      cov.dim(),
      n
    );
  }

  let p = quadratic_cost(cov);
  let q = vec![0.0; n];
  let a = constraint_matrix(mu);

  let mut b = vec![1.0, target];
  b.extend(std::iter::repeat(max_weight).take(n));
  b.extend(std::iter::repeat(-min_weight).take(n));

  let cones = [
    SupportedConeT::ZeroConeT(2),
    SupportedConeT::NonnegativeConeT(2 * n),
  ];

  let settings = DefaultSettingsBuilder::default()
    .verbose(false)
    .max_iter(200)
    .build()
    .map_err(|e| anyhow!("failed to build solver settings: {e}"))?;

  let mut solver = DefaultSolver::new(&p, &q, &a, &b, &cones, settings)
    .map_err(|e| anyhow!("failed to construct solver: {e:?}"))?;
  solver.solve();

  match solver.solution.status {
    SolverStatus::Solved => {
      let weights = solver
        .solution
        .x
        .iter()
        .map(|&w| w.clamp(min_weight, max_weight))
        .collect::<Array1<f64>>();
      Ok(Some(weights))
    }
    status => {
      warn!(target_return = target, ?status, "target return skipped");
      Ok(None)
    }
  }
}

/// Sweep the QP over the target grid and collect feasible frontier points in
/// ascending target-return order.
pub fn efficient_frontier(
  mu: &Array1<f64>,
  cov: &Array2<f64>,
  config: &FrontierConfig,
) -> Result<Vec<FrontierPoint>> {
  config.validate(mu.len())?;
  if mu.iter().any(|m| !m.is_finite()) || cov.iter().any(|c| !c.is_finite()) {
    bail!("mean or covariance contains NaN or infinite entries");
  }

  let targets = target_grid(mu, config.n_targets)?;
  let mut points = Vec::with_capacity(targets.len());

  for target in targets {
    if let Some(weights) = solve_target(mu, cov, target, config.min_weight, config.max_weight)? {
      let risk = weights.dot(&cov.dot(&weights)).max(0.0).sqrt();
      points.push(FrontierPoint {
        target_return: target,
        risk,
        weights,
      });
    }
  }

  info!(
    feasible = points.len(),
    requested = config.n_targets,
    "frontier sweep complete"
  );

  Ok(points)
}

/// Index of the frontier point maximizing `(target - risk_free) / risk`.
///
/// Ties are broken by the first occurrence in sweep order. Points with
/// numerically zero risk are ignored.
pub fn max_sharpe(points: &[FrontierPoint], risk_free: f64) -> Option<usize> {
  let mut best: Option<(usize, f64)> = None;

  for (i, point) in points.iter().enumerate() {
    if point.risk < 1e-12 {
      continue;
    }
    let sharpe = (point.target_return - risk_free) / point.risk;
    match best {
      Some((_, best_sharpe)) if sharpe <= best_sharpe => {}
      _ => best = Some((i, sharpe)),
    }
  }

  best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use approx::assert_relative_eq;
  use ndarray::array;

  use super::*;
  use crate::portfolio::types::WEIGHT_SUM_TOL;

  fn synthetic_inputs() -> (Array1<f64>, Array2<f64>) {
    let mu = array![0.001, 0.002, 0.0015];
    let cov = array![
      [0.0004, 0.0, 0.0],
      [0.0, 0.0009, 0.0],
      [0.0, 0.0, 0.0006]
    ];
    (mu, cov)
  }

  #[test]
  fn target_grid_spans_interquartile_range() {
    let mu = array![0.001, 0.002, 0.0015, 0.0005];
    let grid = target_grid(&mu, 50).unwrap();

    assert_eq!(grid.len(), 50);
    for w in grid.windows(2) {
      assert!(w[1] >= w[0]);
    }
    assert!(grid[0] >= 0.0005 && grid[49] <= 0.002);
  }

  #[test]
  fn frontier_weights_sum_to_one_within_bounds() {
    let (mu, cov) = synthetic_inputs();
    let config = FrontierConfig {
      n_targets: 50,
      min_weight: 0.0,
      max_weight: 1.0,
    };

    let frontier = efficient_frontier(&mu, &cov, &config).unwrap();
    assert!(!frontier.is_empty());

    for point in &frontier {
      let sum: f64 = point.weights.sum();
      assert_abs_diff_eq!(sum, 1.0, epsilon = WEIGHT_SUM_TOL);
      for &w in &point.weights {
        assert!(w >= -WEIGHT_SUM_TOL && w <= 1.0 + WEIGHT_SUM_TOL);
      }
      assert_relative_eq!(
        point.weights.dot(&mu),
        point.target_return,
        epsilon = 1e-6
      );
    }
  }

  #[test]
  fn risk_is_nondecreasing_on_efficient_branch() {
    let (mu, cov) = synthetic_inputs();
    let config = FrontierConfig {
      n_targets: 40,
      min_weight: 0.0,
      max_weight: 1.0,
    };

    let frontier = efficient_frontier(&mu, &cov, &config).unwrap();
    let min_risk_idx = frontier
      .iter()
      .enumerate()
      .min_by(|(_, a), (_, b)| a.risk.total_cmp(&b.risk))
      .map(|(i, _)| i)
      .unwrap();

    for w in frontier[min_risk_idx..].windows(2) {
      assert!(w[1].risk >= w[0].risk - 1e-6);
    }
  }

  #[test]
  fn feasible_target_beats_equal_weight_variance() {
    let (mu, cov) = synthetic_inputs();
    let weights = solve_target(&mu, &cov, 0.0015, 0.0, 1.0).unwrap().unwrap();

    let variance = weights.dot(&cov.dot(&weights));
    let equal = array![1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0];
    let equal_variance = equal.dot(&cov.dot(&equal));

    assert!(variance <= equal_variance + 1e-12);
    assert_relative_eq!(weights.dot(&mu), 0.0015, epsilon = 1e-6);
  }

  #[test]
  fn unreachable_target_is_skipped_not_fatal() {
    let (mu, cov) = synthetic_inputs();
    // Max per-asset mean is 0.002; 0.01 is unreachable with weights in [0, 1].
    let solved = solve_target(&mu, &cov, 0.01, 0.0, 1.0).unwrap();

    assert!(solved.is_none());
  }

  #[test]
  fn max_sharpe_picks_known_maximum_and_first_tie() {
    let points = vec![
      FrontierPoint {
        target_return: 0.001,
        risk: 0.02,
        weights: array![1.0],
      },
      FrontierPoint {
        target_return: 0.002,
        risk: 0.02,
        weights: array![1.0],
      },
      FrontierPoint {
        target_return: 0.004,
        risk: 0.04,
        weights: array![1.0],
      },
    ];

    // Sharpe ratios at rf = 0: 0.05, 0.10, 0.10; indices 1 and 2 tie.
    assert_eq!(max_sharpe(&points, 0.0), Some(1));
  }

  #[test]
  fn max_sharpe_on_empty_frontier_is_none() {
    assert_eq!(max_sharpe(&[], 0.0), None);
  }

  #[test]
  fn dimension_mismatch_is_rejected() {
    let mu = array![0.001, 0.002];
    let cov = array![[0.0004]];

    assert!(solve_target(&mu, &cov, 0.0015, 0.0, 1.0).is_err());
  }
}
