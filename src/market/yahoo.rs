//! # Yahoo Finance History
//!
//! $$
//! \text{ticker} \times [t_0, t_1] \mapsto \{(t, P_t^{\text{adj}})\}
//! $$
//!
//! Adjusted daily close download via `yahoo_finance_api` in blocking mode.
//! Ingestion is all-or-nothing: any ticker that fails to resolve or returns an
//! empty history aborts the run, no retries and no partial substitution.

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveTime;
use time::OffsetDateTime;
use tracing::info;
use yahoo_finance_api::YahooConnector;

use super::panel::PriceSeries;

fn to_offset(date: NaiveDate) -> Result<OffsetDateTime> {
  let ts = date.and_time(NaiveTime::MIN).and_utc().timestamp();
  OffsetDateTime::from_unix_timestamp(ts).with_context(|| format!("invalid date {date}"))
}

/// Fetch adjusted daily closes for one ticker over `[start, end]`.
pub fn fetch_history(ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
  if start >= end {
    bail!("start date {start} is not before end date {end}");
  }

  let provider = YahooConnector::new().context("failed to construct Yahoo connector")?;
  let response = provider
    .get_quote_history(ticker, to_offset(start)?, to_offset(end)?)
    .with_context(|| format!("{ticker}: history request failed"))?;
  let quotes = response
    .quotes()
    .with_context(|| format!("{ticker}: malformed quote response"))?;

  if quotes.is_empty() {
    bail!("{ticker}: no data in range {start}..{end}");
  }

  let mut dates = Vec::with_capacity(quotes.len());
  let mut closes = Vec::with_capacity(quotes.len());
  for quote in &quotes {
    let dt = DateTime::from_timestamp(quote.timestamp as i64, 0)
      .with_context(|| format!("{ticker}: invalid quote timestamp {}", quote.timestamp))?;
    dates.push(dt.date_naive());
    closes.push(quote.adjclose);
  }

  info!(ticker, n = dates.len(), "fetched daily history");

  PriceSeries::new(ticker, dates, closes)
}

/// Fetch histories for several tickers; fails on the first ticker that errors.
pub fn fetch_universe(
  tickers: &[&str],
  start: NaiveDate,
  end: NaiveDate,
) -> Result<Vec<PriceSeries>> {
  tickers
    .iter()
    .map(|ticker| fetch_history(ticker, start, end))
    .collect()
}
