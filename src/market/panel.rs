//! # Price Panel
//!
//! $$
//! P \in \mathbb{R}^{T \times n}, \quad P_{t,i} > 0
//! $$
//!
//! Per-ticker price series and their alignment into a dense close-price panel.
//! Alignment is an inner join on trading dates followed by a
//! last-observation-carried-forward pass for non-finite closes, so downstream
//! return computation never sees gaps.

use std::collections::BTreeSet;
use std::collections::HashMap;

use anyhow::Result;
use anyhow::bail;
use chrono::NaiveDate;
use ndarray::Array2;

/// Daily closing prices for a single ticker, ordered by date.
#[derive(Clone, Debug)]
pub struct PriceSeries {
  /// Ticker symbol.
  pub ticker: String,
  /// Trading dates in ascending order.
  pub dates: Vec<NaiveDate>,
  /// Closing prices, one per date.
  pub closes: Vec<f64>,
}

impl PriceSeries {
  /// Construct a series, validating that dates and closes line up.
  pub fn new(ticker: &str, dates: Vec<NaiveDate>, closes: Vec<f64>) -> Result<Self> {
    if dates.len() != closes.len() {
      bail!(
        "{}: {} dates but {} closes",
        ticker,
        dates.len(),
        closes.len()
      );
    }
    if dates.is_empty() {
      bail!("{}: no data in range", ticker);
    }

    Ok(Self {
      ticker: ticker.to_string(),
      dates,
      closes,
    })
  }

  /// Number of observations.
  pub fn len(&self) -> usize {
    self.dates.len()
  }

  /// True when the series holds no observations.
  pub fn is_empty(&self) -> bool {
    self.dates.is_empty()
  }
}

/// Dense close-price panel: rows are trading days, columns are tickers.
#[derive(Clone, Debug)]
pub struct PricePanel {
  /// Column labels.
  pub tickers: Vec<String>,
  /// Common trading dates in ascending order.
  pub dates: Vec<NaiveDate>,
  /// Close prices, shape `(dates.len(), tickers.len())`.
  pub closes: Array2<f64>,
}

impl PricePanel {
  /// Number of trading days.
  pub fn n_days(&self) -> usize {
    self.dates.len()
  }

  /// Number of assets.
  pub fn n_assets(&self) -> usize {
    self.tickers.len()
  }
}

/// Inner-join multiple price series on their common trading dates.
///
/// Rows where any ticker is missing are dropped. Non-finite or non-positive
/// closes surviving the join are replaced by the last valid observation of the
/// same ticker. Fails if any series is empty or the joined panel has fewer
/// than two rows.
pub fn align_panel(series: &[PriceSeries]) -> Result<PricePanel> {
  if series.is_empty() {
    bail!("cannot align an empty set of price series");
  }

  for s in series {
    if s.is_empty() {
      bail!("{}: no data in range", s.ticker);
    }
  }

  let mut common: BTreeSet<NaiveDate> = series[0].dates.iter().copied().collect();
  for s in &series[1..] {
    let dates: BTreeSet<NaiveDate> = s.dates.iter().copied().collect();
    common = common.intersection(&dates).copied().collect();
  }

  let dates: Vec<NaiveDate> = common.into_iter().collect();
  if dates.len() < 2 {
    bail!(
      "only {} common trading dates across {} tickers",
      dates.len(),
      series.len()
    );
  }

  let n_days = dates.len();
  let n_assets = series.len();
  let mut closes = Array2::<f64>::zeros((n_days, n_assets));

  for (j, s) in series.iter().enumerate() {
    let by_date: HashMap<NaiveDate, f64> = s
      .dates
      .iter()
      .copied()
      .zip(s.closes.iter().copied())
      .collect();

    let mut last_valid: Option<f64> = None;
    for (i, date) in dates.iter().enumerate() {
      let raw = by_date.get(date).copied().unwrap_or(f64::NAN);
      let value = if raw.is_finite() && raw > 0.0 {
        last_valid = Some(raw);
        raw
      } else {
        match last_valid {
          Some(v) => v,
          None => bail!("{}: no valid close at or before {}", s.ticker, date),
        }
      };
      closes[[i, j]] = value;
    }
  }

  Ok(PricePanel {
    tickers: series.iter().map(|s| s.ticker.clone()).collect(),
    dates,
    closes,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
  }

  #[test]
  fn align_drops_rows_missing_in_any_ticker() {
    let a = PriceSeries::new(
      "AAA",
      vec![d("2024-01-01"), d("2024-01-02"), d("2024-01-03")],
      vec![10.0, 11.0, 12.0],
    )
    .unwrap();
    let b = PriceSeries::new(
      "BBB",
      vec![d("2024-01-01"), d("2024-01-03")],
      vec![20.0, 21.0],
    )
    .unwrap();

    let panel = align_panel(&[a, b]).unwrap();
    assert_eq!(panel.n_days(), 2);
    assert_eq!(panel.dates, vec![d("2024-01-01"), d("2024-01-03")]);
    assert_eq!(panel.closes[[1, 0]], 12.0);
    assert_eq!(panel.closes[[1, 1]], 21.0);
  }

  #[test]
  fn align_carries_last_observation_forward() {
    let a = PriceSeries::new(
      "AAA",
      vec![d("2024-01-01"), d("2024-01-02"), d("2024-01-03")],
      vec![10.0, f64::NAN, 12.0],
    )
    .unwrap();
    let b = PriceSeries::new(
      "BBB",
      vec![d("2024-01-01"), d("2024-01-02"), d("2024-01-03")],
      vec![20.0, 20.5, 21.0],
    )
    .unwrap();

    let panel = align_panel(&[a, b]).unwrap();
    assert_eq!(panel.closes[[1, 0]], 10.0);
  }

  #[test]
  fn align_rejects_empty_series() {
    let a = PriceSeries {
      ticker: "AAA".to_string(),
      dates: Vec::new(),
      closes: Vec::new(),
    };

    assert!(align_panel(&[a]).is_err());
  }

  #[test]
  fn align_rejects_disjoint_dates() {
    let a = PriceSeries::new("AAA", vec![d("2024-01-01")], vec![10.0]).unwrap();
    let b = PriceSeries::new("BBB", vec![d("2024-01-02")], vec![20.0]).unwrap();

    assert!(align_panel(&[a, b]).is_err());
  }

  #[test]
  fn series_length_mismatch_is_rejected() {
    assert!(PriceSeries::new("AAA", vec![d("2024-01-01")], vec![1.0, 2.0]).is_err());
  }
}
