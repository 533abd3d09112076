use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::quotes::table::{QuoteRow, QuoteTable};
use crate::types::*;
use crate::weights::metadata::{find_ticker_meta, TickerMeta};
use crate::DashboardResult;

/// First/last observation and raw weight per ticker, the input to the
/// fallback weight derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSummary {
    pub first_price: Price,
    pub last_price: Price,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    /// Raw (un-normalised) weight from ticker metadata, 1 when absent
    pub weight: Weight,
    /// Classification of the earliest observation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<AssetType>,
}

impl QuoteSummary {
    /// Both endpoints positive: the ticker can take part in a portfolio.
    pub fn has_valid_prices(&self) -> bool {
        self.first_price > Decimal::ZERO && self.last_price > Decimal::ZERO
    }
}

/// Summarise quotes per ticker.
///
/// Rows without a close and rows typed `"Other"` are ignored. The weight
/// comes from the first metadata entry with the same ticker.
pub fn summarize_quotes(
    table: &QuoteTable,
    equity_tickers: &[TickerMeta],
) -> DashboardResult<BTreeMap<String, QuoteSummary>> {
    Ok(summarize_rows(&table.rows()?, equity_tickers))
}

/// [`summarize_quotes`] over rows that were already parsed.
pub fn summarize_rows(
    rows: &[QuoteRow],
    equity_tickers: &[TickerMeta],
) -> BTreeMap<String, QuoteSummary> {
    let mut grouped: BTreeMap<&str, Vec<(NaiveDate, Price, Option<&str>)>> = BTreeMap::new();
    for row in rows {
        if row.asset_type.as_deref() == Some("Other") {
            continue;
        }
        let Some(close) = row.close else {
            continue;
        };
        grouped
            .entry(row.ticker.as_str())
            .or_default()
            .push((row.date, close, row.asset_type.as_deref()));
    }

    let mut summaries = BTreeMap::new();
    for (ticker, mut observations) in grouped {
        // stable: same-day rows keep feed order
        observations.sort_by_key(|(date, _, _)| *date);
        let (Some(first), Some(last)) = (observations.first(), observations.last()) else {
            continue;
        };

        let weight = find_ticker_meta(equity_tickers, ticker)
            .map(TickerMeta::raw_weight)
            .unwrap_or(Decimal::ONE);

        summaries.insert(
            ticker.to_string(),
            QuoteSummary {
                first_price: first.1,
                last_price: last.1,
                first_date: first.0,
                last_date: last.0,
                weight,
                asset_type: first.2.map(AssetType::parse),
            },
        );
    }
    summaries
}
