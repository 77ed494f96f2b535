//! # Frontier Engine
//!
//! $$
//! \text{panel} \mapsto (\mu, \Sigma) \mapsto \text{frontier} \mapsto
//! \mathbf{w}^\* \mapsto \text{backtest}
//! $$
//!
//! High-level orchestration of the full analysis: statistics, frontier sweep,
//! Sharpe selection and backtest of the chosen weights against a benchmark.

use anyhow::Result;
use anyhow::bail;
use ndarray::Array1;
use ndarray::Array2;
use tracing::info;

use super::backtest::BacktestResult;
use super::backtest::TRADING_DAYS;
use super::backtest::backtest;
use super::backtest::backtest_series;
use super::frontier::efficient_frontier;
use super::frontier::max_sharpe;
use super::returns::correlation;
use super::returns::covariance;
use super::returns::log_return_matrix;
use super::returns::log_returns;
use super::returns::mean_vector;
use super::types::FrontierConfig;
use super::types::FrontierPoint;
use super::types::OptimalPortfolio;
use crate::market::PricePanel;
use crate::market::PriceSeries;

/// Runtime configuration for [`FrontierEngine`].
#[derive(Clone, Copy, Debug)]
pub struct FrontierEngineConfig {
  /// Number of target-return samples in the sweep.
  pub n_targets: usize,
  /// Lower bound per weight.
  pub min_weight: f64,
  /// Upper bound per weight.
  pub max_weight: f64,
  /// Annualized risk-free rate used in Sharpe computations.
  pub risk_free: f64,
}

impl Default for FrontierEngineConfig {
  fn default() -> Self {
    Self {
      n_targets: 50,
      min_weight: 0.0,
      max_weight: 1.0,
      risk_free: 0.0,
    }
  }
}

/// Full output of one analysis run.
#[derive(Clone, Debug)]
pub struct FrontierAnalysis {
  /// Asset order shared by all vectors and matrices below.
  pub tickers: Vec<String>,
  /// Per-asset mean daily log return.
  pub mean_returns: Array1<f64>,
  /// Sample covariance of daily log returns.
  pub covariance: Array2<f64>,
  /// Pearson correlation across assets.
  pub correlation: Array2<f64>,
  /// Feasible frontier points in ascending target-return order.
  pub frontier: Vec<FrontierPoint>,
  /// Sharpe-optimal frontier point.
  pub optimal: OptimalPortfolio,
  /// Backtest of the optimal weights over the full history.
  pub portfolio: BacktestResult,
  /// Backtest of the benchmark series over its own history.
  pub benchmark: BacktestResult,
}

/// Single entry point running the whole pipeline on an aligned price panel.
#[derive(Clone, Debug)]
pub struct FrontierEngine {
  config: FrontierEngineConfig,
}

impl FrontierEngine {
  /// Construct a new engine with explicit configuration.
  pub fn new(config: FrontierEngineConfig) -> Self {
    Self { config }
  }

  /// Borrow engine configuration.
  pub fn config(&self) -> &FrontierEngineConfig {
    &self.config
  }

  /// Run statistics, frontier sweep, selection and backtests.
  pub fn analyze(&self, panel: &PricePanel, benchmark: &PriceSeries) -> Result<FrontierAnalysis> {
    let returns = log_return_matrix(&panel.closes)?;
    let mu = mean_vector(&returns)?;
    let cov = covariance(&returns)?;
    let corr = correlation(&returns)?;
    info!(
      days = returns.nrows(),
      assets = returns.ncols(),
      "return statistics ready"
    );

    let frontier_config = FrontierConfig {
      n_targets: self.config.n_targets,
      min_weight: self.config.min_weight,
      max_weight: self.config.max_weight,
    };
    let frontier = efficient_frontier(&mu, &cov, &frontier_config)?;
    if frontier.is_empty() {
      bail!(
        "no feasible frontier point among {} targets",
        self.config.n_targets
      );
    }

    let daily_risk_free = self.config.risk_free / TRADING_DAYS;
    let index = match max_sharpe(&frontier, daily_risk_free) {
      Some(index) => index,
      None => bail!("every frontier point has zero risk; Sharpe selection undefined"),
    };
    let point = frontier[index].clone();
    let sharpe = (point.target_return - daily_risk_free) / point.risk;
    info!(
      index,
      target_return = point.target_return,
      risk = point.risk,
      sharpe,
      "selected Sharpe-optimal portfolio"
    );

    let portfolio = backtest(&point.weights, &returns, self.config.risk_free)?;
    let benchmark_returns = log_returns(&benchmark.closes)?;
    let benchmark = backtest_series(&benchmark_returns, self.config.risk_free)?;
    info!(
      portfolio_return = portfolio.summary.annualized_return,
      benchmark_return = benchmark.summary.annualized_return,
      "backtest complete"
    );

    Ok(FrontierAnalysis {
      tickers: panel.tickers.clone(),
      mean_returns: mu,
      covariance: cov,
      correlation: corr,
      frontier,
      optimal: OptimalPortfolio {
        index,
        sharpe,
        point,
      },
      portfolio,
      benchmark,
    })
  }
}
