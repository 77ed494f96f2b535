//! # Visualization
//!
//! $$
//! (\sigma, r^\*) \mapsto \text{frontier curve}, \quad
//! \rho \mapsto \text{heatmap}, \quad
//! G_t \mapsto \text{cumulative curves}
//! $$
//!
//! Plotly charts for the frontier sweep and the backtest. Callers render the
//! returned [`Plot`]s with `write_html` or `show`.

use ndarray::Array1;
use ndarray::Array2;
use plotly::HeatMap;
use plotly::Layout;
use plotly::Plot;
use plotly::Scatter;
use plotly::common::Marker;
use plotly::common::Mode;
use plotly::layout::Axis;

use crate::portfolio::FrontierPoint;
use crate::portfolio::OptimalPortfolio;

/// Efficient-frontier curve with the Sharpe-optimal point highlighted.
pub fn frontier_plot(frontier: &[FrontierPoint], optimal: &OptimalPortfolio) -> Plot {
  let risks: Array1<f64> = frontier.iter().map(|p| p.risk).collect();
  let targets: Array1<f64> = frontier.iter().map(|p| p.target_return).collect();

  let mut plot = Plot::new();
  plot.add_trace(
    Scatter::from_array(risks, targets)
      .mode(Mode::LinesMarkers)
      .name("efficient frontier"),
  );
  plot.add_trace(
    Scatter::new(
      vec![optimal.point.risk],
      vec![optimal.point.target_return],
    )
    .mode(Mode::Markers)
    .marker(Marker::new().size(12).color("#d62728"))
    .name(format!("max Sharpe ({:.2})", optimal.sharpe).as_str()),
  );
  plot.set_layout(
    Layout::new()
      .title("Efficient frontier")
      .x_axis(Axis::new().title("Risk (daily σ)"))
      .y_axis(Axis::new().title("Target return (daily)")),
  );

  plot
}

/// Correlation heatmap over the asset universe.
pub fn correlation_heatmap(tickers: &[String], correlation: &Array2<f64>) -> Plot {
  let labels: Vec<String> = tickers.to_vec();
  let z: Vec<Vec<f64>> = correlation
    .rows()
    .into_iter()
    .map(|row| row.to_vec())
    .collect();

  let mut plot = Plot::new();
  plot.add_trace(HeatMap::new(labels.clone(), labels, z));
  plot.set_layout(Layout::new().title("Return correlation"));

  plot
}

/// Cumulative growth of the optimal portfolio against the benchmark.
pub fn cumulative_returns_plot(
  dates: &[chrono::NaiveDate],
  portfolio_growth: &Array1<f64>,
  benchmark_growth: &Array1<f64>,
) -> Plot {
  let x: Vec<String> = dates.iter().map(|d| d.to_string()).collect();

  let mut plot = Plot::new();
  plot.add_trace(
    Scatter::new(x.clone(), portfolio_growth.to_vec())
      .mode(Mode::Lines)
      .name("portfolio"),
  );
  // Benchmark dates may differ from the panel after the inner join.
  let bench_x = if benchmark_growth.len() == x.len() {
    x
  } else {
    (0..benchmark_growth.len()).map(|i| i.to_string()).collect()
  };
  plot.add_trace(
    Scatter::new(bench_x, benchmark_growth.to_vec())
      .mode(Mode::Lines)
      .name("benchmark"),
  );
  plot.set_layout(
    Layout::new()
      .title("Cumulative growth of 1")
      .y_axis(Axis::new().title("Growth")),
  );

  plot
}
