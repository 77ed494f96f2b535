//! # Portfolio
//!
//! $$
//! \min_{\mathbf{w}} \ \mathbf{w}^\top \Sigma \mathbf{w}
//! \quad \text{s.t.} \quad \mathbf{1}^\top\mathbf{w}=1,\ \mu^\top\mathbf{w}=r^\*,\
//! w_{\min} \le w_i \le w_{\max}
//! $$
//!
//! Return statistics, efficient-frontier sweep, Sharpe selection and backtest.

pub mod backtest;
pub mod engine;
pub mod frontier;
pub mod returns;
pub mod types;

pub use backtest::BacktestResult;
pub use backtest::PerformanceSummary;
pub use backtest::TRADING_DAYS;
pub use backtest::backtest;
pub use backtest::backtest_series;
pub use backtest::cumulative_growth;
pub use backtest::replay;
pub use engine::FrontierAnalysis;
pub use engine::FrontierEngine;
pub use engine::FrontierEngineConfig;
pub use frontier::efficient_frontier;
pub use frontier::max_sharpe;
pub use frontier::solve_target;
pub use frontier::target_grid;
pub use returns::correlation;
pub use returns::covariance;
pub use returns::log_return_matrix;
pub use returns::log_returns;
pub use returns::mean_vector;
pub use types::FrontierConfig;
pub use types::FrontierPoint;
pub use types::OptimalPortfolio;
