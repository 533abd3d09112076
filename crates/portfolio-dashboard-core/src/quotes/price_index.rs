use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::quotes::table::{QuoteRow, QuoteTable};
use crate::types::*;
use crate::DashboardResult;

/// Dense date → ticker → close lookup.
///
/// Every row is recorded, including those with no usable close; consumers
/// decide what counts as a valid price. A later row for the same
/// (date, ticker) replaces an earlier one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceIndex {
    by_date: BTreeMap<NaiveDate, BTreeMap<String, Option<Price>>>,
}

impl PriceIndex {
    pub fn build(table: &QuoteTable) -> DashboardResult<Self> {
        let rows = table.rows()?;
        Ok(Self::from_rows(&rows))
    }

    pub fn from_rows(rows: &[QuoteRow]) -> Self {
        let mut by_date: BTreeMap<NaiveDate, BTreeMap<String, Option<Price>>> = BTreeMap::new();
        for row in rows {
            by_date
                .entry(row.date)
                .or_default()
                .insert(row.ticker.clone(), row.close);
        }
        PriceIndex { by_date }
    }

    /// Dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = &NaiveDate> + '_ {
        self.by_date.keys()
    }

    /// Close for `ticker` on `date`, if one was recorded and usable.
    pub fn price(&self, date: &NaiveDate, ticker: &str) -> Option<Price> {
        self.by_date.get(date)?.get(ticker).copied().flatten()
    }

    pub fn has_price(&self, date: &NaiveDate, ticker: &str) -> bool {
        self.price(date, ticker).is_some()
    }

    pub fn prices_on(&self, date: &NaiveDate) -> Option<&BTreeMap<String, Option<Price>>> {
        self.by_date.get(date)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.by_date.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.by_date.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_dates_sorted_regardless_of_input_order() {
        let table = QuoteTable::from_rows(vec![
            ("2024-01-03", "A", Some(dec!(120))),
            ("2024-01-01", "A", Some(dec!(100))),
            ("2024-01-02", "A", Some(dec!(110))),
        ]);
        let index = PriceIndex::build(&table).unwrap();
        let dates: Vec<NaiveDate> = index.dates().copied().collect();
        assert_eq!(dates, vec![d("2024-01-01"), d("2024-01-02"), d("2024-01-03")]);
    }

    #[test]
    fn test_timestamps_collapse_to_one_day() {
        let table = QuoteTable::from_rows(vec![
            ("2024-01-01T09:30:00Z", "A", Some(dec!(100))),
            ("2024-01-01T16:00:00Z", "B", Some(dec!(50))),
        ]);
        let index = PriceIndex::build(&table).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.price(&d("2024-01-01"), "A"), Some(dec!(100)));
        assert_eq!(index.price(&d("2024-01-01"), "B"), Some(dec!(50)));
    }

    #[test]
    fn test_missing_close_is_recorded_but_not_a_price() {
        let table = QuoteTable::from_rows(vec![("2024-01-01", "A", None)]);
        let index = PriceIndex::build(&table).unwrap();
        let day = index.prices_on(&d("2024-01-01")).unwrap();
        assert!(day.contains_key("A"));
        assert!(!index.has_price(&d("2024-01-01"), "A"));
    }

    #[test]
    fn test_later_row_wins() {
        let table = QuoteTable::from_rows(vec![
            ("2024-01-01", "A", Some(dec!(100))),
            ("2024-01-01", "A", Some(dec!(101))),
        ]);
        let index = PriceIndex::build(&table).unwrap();
        assert_eq!(index.price(&d("2024-01-01"), "A"), Some(dec!(101)));
    }
}
