//! # frontier-rs
//!
//! `frontier-rs` downloads historical stock prices, computes return statistics,
//! sweeps a mean-variance quadratic program over a grid of target returns and
//! backtests the Sharpe-optimal portfolio against a benchmark index.
//!
//! ## Modules
//!
//! | Module            | Description                                                                      |
//! |-------------------|----------------------------------------------------------------------------------|
//! | [`market`]        | Price series containers, date alignment and Yahoo Finance ingestion (feature `yahoo`). |
//! | [`portfolio`]     | Return statistics, efficient-frontier QP sweep, Sharpe selection and backtesting. |
//! | [`visualization`] | Plotly charts: frontier curve, correlation heatmap, cumulative-return curves.     |
//!
//! ## Features
//!
//! - `yahoo`: Enables the Yahoo Finance history fetcher and the `frontier` binary.
//!
//! ## Pipeline
//!
//! Fetch adjusted closes, align them on common trading days, convert to log
//! returns, estimate the mean vector and sample covariance, solve one convex QP
//! per target return with `clarabel`, pick the frontier point with the highest
//! Sharpe ratio and replay its weights through the historical return matrix.

pub mod market;
pub mod portfolio;
pub mod visualization;
