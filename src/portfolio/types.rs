//! # Portfolio Types
//!
//! $$
//! (r^\*, \sigma, \mathbf{w})
//! $$
//!
//! Shared configuration and result containers for the frontier sweep.

use anyhow::Result;
use anyhow::bail;
use ndarray::Array1;

/// Numerical tolerance for the weight-sum invariant.
pub const WEIGHT_SUM_TOL: f64 = 1e-6;

/// Configuration of the efficient-frontier sweep.
#[derive(Clone, Copy, Debug)]
pub struct FrontierConfig {
  /// Number of target-return samples between the 25th and 75th percentile of
  /// per-asset mean returns.
  pub n_targets: usize,
  /// Lower bound per weight.
  pub min_weight: f64,
  /// Upper bound per weight.
  pub max_weight: f64,
}

impl Default for FrontierConfig {
  fn default() -> Self {
    Self {
      n_targets: 50,
      min_weight: 0.0,
      max_weight: 1.0,
    }
  }
}

impl FrontierConfig {
  /// Check that the bounds admit at least one weight vector summing to one
  /// for `n_assets` assets.
  pub fn validate(&self, n_assets: usize) -> Result<()> {
    if self.n_targets == 0 {
      bail!("n_targets must be at least 1");
    }
    if !(self.min_weight.is_finite() && self.max_weight.is_finite()) {
      bail!("weight bounds must be finite");
    }
    if self.min_weight > self.max_weight {
      bail!(
        "min_weight {} exceeds max_weight {}",
        self.min_weight,
        self.max_weight
      );
    }
    if n_assets == 0 {
      bail!("at least one asset is required");
    }

    let n = n_assets as f64;
    if n * self.max_weight < 1.0 - WEIGHT_SUM_TOL || n * self.min_weight > 1.0 + WEIGHT_SUM_TOL {
      bail!(
        "bounds [{}, {}] cannot sum to 1 over {} assets",
        self.min_weight,
        self.max_weight,
        n_assets
      );
    }

    Ok(())
  }
}

/// One point on the efficient frontier.
#[derive(Clone, Debug)]
pub struct FrontierPoint {
  /// Target mean return of the QP equality constraint (per period).
  pub target_return: f64,
  /// Portfolio risk `sqrt(wᵀΣw)` at the optimum.
  pub risk: f64,
  /// Optimal weights, summing to 1 within [`WEIGHT_SUM_TOL`].
  pub weights: Array1<f64>,
}

/// The frontier point maximizing the Sharpe ratio.
#[derive(Clone, Debug)]
pub struct OptimalPortfolio {
  /// Index of the selected point in sweep order.
  pub index: usize,
  /// Sharpe ratio `(target_return - risk_free) / risk` at selection.
  pub sharpe: f64,
  /// The selected frontier point.
  pub point: FrontierPoint,
}
