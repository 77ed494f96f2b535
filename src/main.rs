use anyhow::Context;
use anyhow::Result;
use chrono::NaiveDate;
use prettytable::Table;
use prettytable::row;

use frontier_rs::market::align_panel;
use frontier_rs::market::yahoo::fetch_history;
use frontier_rs::market::yahoo::fetch_universe;
use frontier_rs::portfolio::FrontierEngine;
use frontier_rs::portfolio::FrontierEngineConfig;
use frontier_rs::portfolio::PerformanceSummary;
use frontier_rs::visualization::correlation_heatmap;
use frontier_rs::visualization::cumulative_returns_plot;
use frontier_rs::visualization::frontier_plot;

const TICKERS: [&str; 7] = ["AAPL", "MSFT", "AMZN", "GOOG", "JPM", "JNJ", "XOM"];
const BENCHMARK: &str = "^GSPC";
const RISK_FREE: f64 = 0.02;
const MIN_WEIGHT: f64 = 0.0;
const MAX_WEIGHT: f64 = 0.35;
const N_TARGETS: usize = 50;

fn summary_row(table: &mut Table, label: &str, s: &PerformanceSummary) {
  table.add_row(row![
    label,
    format!("{:.2}%", s.annualized_return * 100.0),
    format!("{:.2}%", s.annualized_vol * 100.0),
    format!("{:.2}", s.sharpe),
    format!("{:.2}%", s.max_drawdown * 100.0),
    format!("{:.2}", s.calmar),
  ]);
}

fn main() -> Result<()> {
  let start = NaiveDate::from_ymd_opt(2018, 1, 1).context("invalid start date")?;
  let end = NaiveDate::from_ymd_opt(2023, 12, 31).context("invalid end date")?;

  println!(
    "Fetching {} tickers and benchmark {} for {}..{}",
    TICKERS.len(),
    BENCHMARK,
    start,
    end
  );
  let series = fetch_universe(&TICKERS, start, end)?;
  let benchmark = fetch_history(BENCHMARK, start, end)?;
  let panel = align_panel(&series)?;
  println!(
    "Aligned panel: {} trading days x {} assets",
    panel.n_days(),
    panel.n_assets()
  );

  let engine = FrontierEngine::new(FrontierEngineConfig {
    n_targets: N_TARGETS,
    min_weight: MIN_WEIGHT,
    max_weight: MAX_WEIGHT,
    risk_free: RISK_FREE,
  });
  let analysis = engine.analyze(&panel, &benchmark)?;

  println!(
    "\nFrontier: {} feasible of {} targets; optimal point #{} (Sharpe {:.2})",
    analysis.frontier.len(),
    N_TARGETS,
    analysis.optimal.index,
    analysis.optimal.sharpe
  );

  let mut weights = Table::new();
  weights.add_row(row!["Ticker", "Weight", "Mean daily return"]);
  for (i, ticker) in analysis.tickers.iter().enumerate() {
    weights.add_row(row![
      ticker,
      format!("{:.2}%", analysis.optimal.point.weights[i] * 100.0),
      format!("{:.4}%", analysis.mean_returns[i] * 100.0),
    ]);
  }
  weights.printstd();

  let mut summary = Table::new();
  summary.add_row(row![
    "Series",
    "Ann. return",
    "Ann. vol",
    "Sharpe",
    "Max drawdown",
    "Calmar"
  ]);
  summary_row(&mut summary, "Optimal portfolio", &analysis.portfolio.summary);
  summary_row(&mut summary, BENCHMARK, &analysis.benchmark.summary);
  summary.printstd();

  frontier_plot(&analysis.frontier, &analysis.optimal).write_html("frontier.html");
  correlation_heatmap(&analysis.tickers, &analysis.correlation).write_html("correlation.html");
  cumulative_returns_plot(
    &panel.dates[1..],
    &analysis.portfolio.growth,
    &analysis.benchmark.growth,
  )
  .write_html("cumulative.html");
  println!("\nWrote frontier.html, correlation.html, cumulative.html");

  Ok(())
}
