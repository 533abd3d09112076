use std::collections::BTreeMap;
use std::time::Instant;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;
use crate::quotes::QuoteTable;
use crate::timeseries::reconstruct::PortfolioPoint;
use crate::types::*;
use crate::weights::TickerMeta;
use crate::DashboardResult;

/// Value of one ticker's buy-and-hold position on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerPerformancePoint {
    pub date: NaiveDate,
    pub ticker: String,
    /// close × shares
    pub value: Money,
    pub raw_close: Price,
    pub asset_type: AssetType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirstLastPrice {
    pub first_price: Price,
    pub last_price: Price,
    pub weight: Weight,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioReturnsOutput {
    /// Per-ticker values, ordered by date then ticker
    pub ticker_performance: Vec<TickerPerformancePoint>,
    /// Sum over tickers per date ("Total Portfolio")
    pub totals: Vec<PortfolioPoint>,
    /// Span of all quote dates, including unweighted tickers
    pub date_range: Option<DateRange>,
    pub first_last_prices: BTreeMap<String, FirstLastPrice>,
}

/// Buy-and-hold value per ticker from its own first close, plus the daily
/// total.
///
/// Unlike the chart reconstruction, each ticker is anchored on its own
/// first observation and totals are summed over whatever tickers quote
/// that day. Tickers without a non-zero metadata weight are ignored.
pub fn calculate_portfolio_returns(
    table: &QuoteTable,
    tickers: &[TickerMeta],
    investment_amount: Money,
) -> DashboardResult<ComputationOutput<PortfolioReturnsOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let rows = table.rows()?;
    if rows.is_empty() {
        return Err(DashboardError::NoData("Quote table has no rows".into()));
    }
    if investment_amount <= Decimal::ZERO {
        return Err(DashboardError::invalid("investment_amount", "Must be positive"));
    }

    // entries without a Weight are listed for their type only
    let mut weights: BTreeMap<&str, Weight> = BTreeMap::new();
    for meta in tickers.iter().filter(|m| m.weight.is_some()) {
        weights.insert(meta.ticker.as_str(), meta.raw_weight());
    }

    let date_range = match (
        rows.iter().map(|r| r.date).min(),
        rows.iter().map(|r| r.date).max(),
    ) {
        (Some(start), Some(end)) => Some(DateRange { start, end }),
        _ => None,
    };

    let mut grouped: BTreeMap<&str, Vec<(NaiveDate, Price, AssetType)>> = BTreeMap::new();
    for row in &rows {
        let Some(close) = row.close else {
            continue;
        };
        let asset_type = row
            .asset_type
            .as_deref()
            .map(AssetType::parse)
            .unwrap_or_default();
        grouped
            .entry(row.ticker.as_str())
            .or_default()
            .push((row.date, close, asset_type));
    }

    let mut ticker_performance = Vec::new();
    let mut first_last_prices = BTreeMap::new();
    for (ticker, mut observations) in grouped {
        let weight = match weights.get(ticker) {
            Some(w) if !w.is_zero() => *w,
            _ => continue,
        };
        observations.sort_by_key(|(date, _, _)| *date);
        let (Some(first), Some(last)) = (observations.first(), observations.last()) else {
            continue;
        };

        first_last_prices.insert(
            ticker.to_string(),
            FirstLastPrice {
                first_price: first.1,
                last_price: last.1,
                weight,
            },
        );

        if first.1.is_zero() {
            warnings.push(format!("{ticker} skipped: first close is zero"));
            continue;
        }
        let shares = investment_amount
            .checked_mul(weight)
            .and_then(|amount| amount.checked_div(first.1))
            .ok_or_else(|| DashboardError::overflow("Close"))?;

        for (date, close, asset_type) in &observations {
            let value = close
                .checked_mul(shares)
                .ok_or_else(|| DashboardError::overflow("Close"))?;
            ticker_performance.push(TickerPerformancePoint {
                date: *date,
                ticker: ticker.to_string(),
                value,
                raw_close: *close,
                asset_type: *asset_type,
            });
        }
    }
    ticker_performance.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.ticker.cmp(&b.ticker)));

    let mut by_date: BTreeMap<NaiveDate, Money> = BTreeMap::new();
    for p in &ticker_performance {
        let total = by_date.entry(p.date).or_default();
        *total = total
            .checked_add(p.value)
            .ok_or_else(|| DashboardError::overflow("Close"))?;
    }
    let totals: Vec<PortfolioPoint> = by_date
        .into_iter()
        .map(|(date, value)| PortfolioPoint { date, value })
        .collect();

    if totals.is_empty() {
        warnings.push("No weighted ticker has usable quotes".into());
    }

    let output = PortfolioReturnsOutput {
        ticker_performance,
        totals,
        date_range,
        first_last_prices,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Buy-and-hold portfolio returns",
        &serde_json::json!({
            "investment_amount": investment_amount.to_string(),
            "tickers": tickers.len(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
