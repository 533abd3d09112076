use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::DashboardError;
use crate::types::*;
use crate::DashboardResult;

/// A date cell as exported by the data notebook: an ISO string or epoch
/// milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateCell {
    Millis(i64),
    Text(String),
}

impl From<NaiveDate> for DateCell {
    fn from(d: NaiveDate) -> Self {
        DateCell::Text(d.format("%Y-%m-%d").to_string())
    }
}

impl From<&str> for DateCell {
    fn from(s: &str) -> Self {
        DateCell::Text(s.to_string())
    }
}

/// Columnar daily quotes: parallel `Date`, `Ticker`, `Close` and optional
/// `Type` sequences, one entry per (date, ticker) observation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteTable {
    #[serde(rename = "Date", default)]
    pub date: Option<Vec<DateCell>>,
    #[serde(rename = "Ticker", default)]
    pub ticker: Option<Vec<String>>,
    #[serde(rename = "Close", default, deserialize_with = "lenient_closes")]
    pub close: Option<Vec<Option<Price>>>,
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<Vec<Option<String>>>,
}

/// One validated quote observation.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRow {
    pub date: NaiveDate,
    pub ticker: String,
    /// `None` when the feed had no usable close for this row
    pub close: Option<Price>,
    /// Raw classification label from the `Type` column
    pub asset_type: Option<String>,
}

impl QuoteTable {
    /// Build a table from row tuples. Convenient for tests and small feeds.
    pub fn from_rows<D: Into<DateCell>>(rows: Vec<(D, &str, Option<Price>)>) -> Self {
        let mut date = Vec::with_capacity(rows.len());
        let mut ticker = Vec::with_capacity(rows.len());
        let mut close = Vec::with_capacity(rows.len());
        for (d, t, c) in rows {
            date.push(d.into());
            ticker.push(t.to_string());
            close.push(c);
        }
        QuoteTable {
            date: Some(date),
            ticker: Some(ticker),
            close: Some(close),
            asset_type: None,
        }
    }

    pub fn with_types(mut self, types: Vec<Option<&str>>) -> Self {
        self.asset_type = Some(types.into_iter().map(|t| t.map(str::to_string)).collect());
        self
    }

    pub fn len(&self) -> usize {
        self.date.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check the columnar shape: Date, Ticker and Close present and of equal
    /// length, Type (when present) aligned with them.
    pub fn validate(&self) -> DashboardResult<()> {
        let (dates, tickers, closes) = match (&self.date, &self.ticker, &self.close) {
            (Some(d), Some(t), Some(c)) => (d, t, c),
            _ => {
                return Err(DashboardError::NoData(
                    "Quote table must contain Date, Ticker and Close columns".into(),
                ))
            }
        };
        if dates.len() != tickers.len() || dates.len() != closes.len() {
            return Err(DashboardError::NoData(format!(
                "Quote columns differ in length (Date {}, Ticker {}, Close {})",
                dates.len(),
                tickers.len(),
                closes.len()
            )));
        }
        if let Some(types) = &self.asset_type {
            if types.len() != dates.len() {
                return Err(DashboardError::NoData(format!(
                    "Type column has {} entries, expected {}",
                    types.len(),
                    dates.len()
                )));
            }
        }
        Ok(())
    }

    /// Validate the shape once and return typed rows. Rows whose date
    /// cannot be parsed are skipped.
    pub fn rows(&self) -> DashboardResult<Vec<QuoteRow>> {
        self.validate()?;
        let (Some(dates), Some(tickers), Some(closes)) = (&self.date, &self.ticker, &self.close)
        else {
            return Err(DashboardError::NoData("Quote table is incomplete".into()));
        };

        let mut rows = Vec::with_capacity(dates.len());
        let mut skipped = 0usize;
        for (i, cell) in dates.iter().enumerate() {
            let Some(date) = parse_quote_date(cell) else {
                skipped += 1;
                continue;
            };
            rows.push(QuoteRow {
                date,
                ticker: tickers[i].clone(),
                close: closes[i],
                asset_type: self
                    .asset_type
                    .as_ref()
                    .and_then(|types| types[i].clone()),
            });
        }
        if skipped > 0 {
            warn!(skipped, "skipped quote rows with unparsable dates");
        }
        Ok(rows)
    }
}

/// Normalise a quote date to its UTC calendar day.
///
/// Accepts `YYYY-MM-DD`, naive ISO datetimes (treated as UTC), RFC 3339
/// timestamps with an offset, and epoch milliseconds.
pub fn parse_quote_date(cell: &DateCell) -> Option<NaiveDate> {
    match cell {
        DateCell::Millis(ms) => DateTime::<Utc>::from_timestamp_millis(*ms).map(|dt| dt.date_naive()),
        DateCell::Text(raw) => {
            let s = raw.trim();
            if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return Some(d);
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc).date_naive());
            }
            for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
                if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                    return Some(dt.date());
                }
            }
            None
        }
    }
}

/// Strict variant of [`parse_quote_date`] for user-supplied arguments.
pub fn parse_date_strict(raw: &str) -> DashboardResult<NaiveDate> {
    parse_quote_date(&DateCell::Text(raw.to_string()))
        .ok_or_else(|| DashboardError::DateError(format!("Unrecognised date '{raw}'")))
}

fn lenient_closes<'de, D>(deserializer: D) -> Result<Option<Vec<Option<Price>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|cells| cells.iter().map(close_from_value).collect()))
}

/// Null, NaN, infinities and non-numeric strings all become `None`.
fn close_from_value(value: &Value) -> Option<Price> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    text.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_dates_to_utc_day() {
        let d = |s: &str| parse_quote_date(&DateCell::Text(s.into()));
        let jan2 = NaiveDate::from_ymd_opt(2024, 1, 2);
        assert_eq!(d("2024-01-02"), jan2);
        assert_eq!(d("2024-01-02T15:30:00"), jan2);
        assert_eq!(d("2024-01-02T15:30:00.000Z"), jan2);
        // 23:00 at -05:00 is already the next day in UTC
        assert_eq!(d("2024-01-01T23:00:00-05:00"), jan2);
        assert_eq!(d("not a date"), None);
    }

    #[test]
    fn test_parse_epoch_millis() {
        // 2024-01-02T00:00:00Z
        let d = parse_quote_date(&DateCell::Millis(1_704_153_600_000));
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 1, 2));
    }

    #[test]
    fn test_deserialize_lenient_closes() {
        let json = r#"{
            "Date": ["2024-01-01", 1704153600000, "2024-01-03"],
            "Ticker": ["A", "A", "A"],
            "Close": [100.5, null, "NaN"]
        }"#;
        let table: QuoteTable = serde_json::from_str(json).unwrap();
        let closes = table.close.clone().unwrap();
        assert_eq!(closes, vec![Some(dec!(100.5)), None, None]);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_missing_column_is_no_data() {
        let table: QuoteTable =
            serde_json::from_str(r#"{"Date": ["2024-01-01"], "Ticker": ["A"]}"#).unwrap();
        let err = table.validate().unwrap_err();
        assert!(err.is_no_data());
    }

    #[test]
    fn test_unequal_columns_is_no_data() {
        let mut table = QuoteTable::from_rows(vec![("2024-01-01", "A", Some(dec!(1)))]);
        table.ticker.as_mut().unwrap().push("B".into());
        assert!(table.validate().unwrap_err().is_no_data());
    }

    #[test]
    fn test_rows_skip_bad_dates() {
        let table = QuoteTable::from_rows(vec![
            ("2024-01-01", "A", Some(dec!(1))),
            ("garbage", "A", Some(dec!(2))),
        ])
        .with_types(vec![Some("Equity"), None]);
        let rows = table.rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].asset_type.as_deref(), Some("Equity"));
    }
}
