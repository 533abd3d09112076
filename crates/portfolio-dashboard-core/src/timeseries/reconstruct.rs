use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DashboardError;
use crate::quotes::PriceIndex;
use crate::types::*;
use crate::weights::TickerWeights;
use crate::DashboardResult;

/// A single point of the portfolio value curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioPoint {
    pub date: NaiveDate,
    pub value: Money,
}

/// Position opened at the anchor date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub ticker: String,
    pub asset_type: AssetType,
    pub weight: Weight,
    /// investment amount × weight
    pub initial_investment: Money,
    /// `None` for risk-free holdings, which are carried at
    /// `initial_investment` for the whole series.
    pub shares: Option<Decimal>,
}

impl Holding {
    /// Contribution to portfolio value given the day's price. `None` when
    /// a market-priced holding is unquoted, `Some(None)` on overflow.
    fn value_with(&self, price: Option<Price>) -> Option<Option<Money>> {
        match self.shares {
            None => Some(Some(self.initial_investment)),
            Some(shares) => price.map(|p| p.checked_mul(shares)),
        }
    }
}

/// Anchor date, positions and value curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconstruction {
    pub earliest_date: NaiveDate,
    pub holdings: Vec<Holding>,
    pub series: Vec<PortfolioPoint>,
}

/// First date (ascending) on which every market-priced weighted ticker
/// has a usable close. Risk-free tickers never gate the anchor.
pub fn find_earliest_complete_date(index: &PriceIndex, weights: &TickerWeights) -> Option<NaiveDate> {
    index
        .dates()
        .find(|date| {
            weights
                .iter()
                .filter(|(_, w)| !w.asset_type.is_risk_free())
                .all(|(ticker, _)| index.has_price(date, ticker))
        })
        .copied()
}

/// Open every position at the anchor date.
///
/// shares = investment_amount × weight / anchor price, for every holding
/// that is not risk-free.
pub fn calculate_holdings(
    index: &PriceIndex,
    weights: &TickerWeights,
    anchor: NaiveDate,
    investment_amount: Money,
) -> DashboardResult<Vec<Holding>> {
    let mut holdings = Vec::with_capacity(weights.len());
    for (ticker, tw) in weights {
        let initial_investment = investment_amount
            .checked_mul(tw.weight)
            .ok_or_else(|| DashboardError::overflow("investment_amount"))?;
        let shares = if tw.asset_type.is_risk_free() {
            None
        } else {
            let price = index.price(&anchor, ticker).ok_or_else(|| {
                DashboardError::InsufficientData(format!("{ticker} has no price on {anchor}"))
            })?;
            if price.is_zero() {
                return Err(DashboardError::DivisionByZero {
                    context: format!("share count for {ticker} on {anchor}"),
                });
            }
            let shares = initial_investment
                .checked_div(price)
                .ok_or_else(|| DashboardError::overflow("Close"))?;
            Some(shares)
        };
        holdings.push(Holding {
            ticker: ticker.clone(),
            asset_type: tw.asset_type,
            weight: tw.weight,
            initial_investment,
            shares,
        });
    }
    Ok(holdings)
}

/// Value the holdings on every date where all market-priced holdings are
/// quoted. Other dates are skipped, never zero-filled. A value that no
/// longer fits a `Decimal` is an error.
pub fn calculate_portfolio_time_series(
    index: &PriceIndex,
    holdings: &[Holding],
) -> DashboardResult<Vec<PortfolioPoint>> {
    let mut series = Vec::new();
    'dates: for date in index.dates() {
        let mut value = Decimal::ZERO;
        for h in holdings {
            let Some(contribution) = h.value_with(index.price(date, &h.ticker)) else {
                continue 'dates;
            };
            value = contribution
                .and_then(|c| value.checked_add(c))
                .ok_or_else(|| DashboardError::overflow("Close"))?;
        }
        series.push(PortfolioPoint {
            date: *date,
            value,
        });
    }
    Ok(series)
}

/// Anchor, open positions and build the value curve.
pub fn reconstruct_portfolio(
    index: &PriceIndex,
    weights: &TickerWeights,
    investment_amount: Money,
) -> DashboardResult<Reconstruction> {
    if weights.is_empty() {
        return Err(DashboardError::NoData("No weighted tickers".into()));
    }

    let earliest_date =
        find_earliest_complete_date(index, weights).ok_or(DashboardError::NoCompleteDate)?;
    let holdings = calculate_holdings(index, weights, earliest_date, investment_amount)?;
    let series = calculate_portfolio_time_series(index, &holdings)?;

    if series.is_empty() {
        return Err(DashboardError::InsufficientData(
            "Portfolio series has no points".into(),
        ));
    }
    debug!(%earliest_date, points = series.len(), "reconstructed portfolio series");

    Ok(Reconstruction {
        earliest_date,
        holdings,
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotes::QuoteTable;
    use crate::weights::TickerWeight;
    use rust_decimal_macros::dec;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn weights(entries: &[(&str, Decimal, AssetType)]) -> TickerWeights {
        entries
            .iter()
            .map(|(t, w, a)| {
                (
                    t.to_string(),
                    TickerWeight {
                        weight: *w,
                        asset_type: *a,
                    },
                )
            })
            .collect()
    }

    fn two_ticker_index() -> PriceIndex {
        PriceIndex::build(&QuoteTable::from_rows(vec![
            ("2024-01-01", "A", Some(dec!(100))),
            ("2024-01-02", "A", Some(dec!(110))),
            ("2024-01-03", "A", Some(dec!(120))),
            ("2024-01-01", "B", Some(dec!(50))),
            ("2024-01-02", "B", Some(dec!(55))),
            ("2024-01-03", "B", Some(dec!(60))),
        ]))
        .unwrap()
    }

    #[test]
    fn test_shares_conserve_initial_investment() {
        let index = two_ticker_index();
        let w = weights(&[
            ("A", dec!(0.3), AssetType::Equity),
            ("B", dec!(0.7), AssetType::Bond),
        ]);
        let r = reconstruct_portfolio(&index, &w, dec!(2500)).unwrap();
        for h in &r.holdings {
            let price = index.price(&r.earliest_date, &h.ticker).unwrap();
            assert_eq!(h.shares.unwrap() * price, dec!(2500) * h.weight);
        }
    }

    #[test]
    fn test_earliest_date_skips_incomplete_days() {
        let index = PriceIndex::build(&QuoteTable::from_rows(vec![
            ("2024-01-01", "A", Some(dec!(100))),
            ("2024-01-02", "A", Some(dec!(101))),
            ("2024-01-02", "B", Some(dec!(50))),
            ("2024-01-01", "B", None),
        ]))
        .unwrap();
        let w = weights(&[
            ("A", dec!(0.5), AssetType::Equity),
            ("B", dec!(0.5), AssetType::Equity),
        ]);
        assert_eq!(find_earliest_complete_date(&index, &w), Some(d("2024-01-02")));
    }

    #[test]
    fn test_gaps_are_skipped_not_zero_filled() {
        let index = PriceIndex::build(&QuoteTable::from_rows(vec![
            ("2024-01-01", "A", Some(dec!(100))),
            ("2024-01-01", "B", Some(dec!(50))),
            ("2024-01-02", "A", Some(dec!(110))),
            ("2024-01-03", "A", Some(dec!(120))),
            ("2024-01-03", "B", Some(dec!(60))),
        ]))
        .unwrap();
        let w = weights(&[
            ("A", dec!(0.5), AssetType::Equity),
            ("B", dec!(0.5), AssetType::Equity),
        ]);
        let r = reconstruct_portfolio(&index, &w, dec!(1000)).unwrap();
        let dates: Vec<NaiveDate> = r.series.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d("2024-01-01"), d("2024-01-03")]);
    }

    #[test]
    fn test_risk_free_carried_at_initial_value() {
        let index = two_ticker_index();
        let w = weights(&[
            ("A", dec!(0.5), AssetType::Equity),
            ("CASH", dec!(0.5), AssetType::RiskFree),
        ]);
        let r = reconstruct_portfolio(&index, &w, dec!(1000)).unwrap();
        let cash = r.holdings.iter().find(|h| h.ticker == "CASH").unwrap();
        assert_eq!(cash.shares, None);
        let values: Vec<Decimal> = r.series.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![dec!(1000), dec!(1050), dec!(1100)]);
    }

    #[test]
    fn test_no_overlap_is_no_complete_date() {
        let index = PriceIndex::build(&QuoteTable::from_rows(vec![
            ("2024-01-01", "A", Some(dec!(100))),
            ("2024-01-02", "B", Some(dec!(50))),
        ]))
        .unwrap();
        let w = weights(&[
            ("A", dec!(0.5), AssetType::Equity),
            ("B", dec!(0.5), AssetType::Equity),
        ]);
        let err = reconstruct_portfolio(&index, &w, dec!(1000)).unwrap_err();
        assert!(err.is_no_complete_date());
    }

    #[test]
    fn test_empty_weights_is_no_data() {
        let index = two_ticker_index();
        let err = reconstruct_portfolio(&index, &TickerWeights::new(), dec!(1000)).unwrap_err();
        assert!(err.is_no_data());
    }

    #[test]
    fn test_value_overflow_is_invalid_input() {
        let index = PriceIndex::build(&QuoteTable::from_rows(vec![
            ("2024-01-01", "A", Some(dec!(0.0000000001))),
            ("2024-01-02", "A", Some(Decimal::from(1_000_000_000_000_000i64))),
        ]))
        .unwrap();
        let w = weights(&[("A", dec!(1), AssetType::Equity)]);
        let err = reconstruct_portfolio(&index, &w, dec!(10000)).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidInput { .. }));
    }

    #[test]
    fn test_share_count_overflow_is_invalid_input() {
        let index = PriceIndex::build(&QuoteTable::from_rows(vec![(
            "2024-01-01",
            "A",
            Some(dec!(0.0000000000000000000000000001)),
        )]))
        .unwrap();
        let w = weights(&[("A", dec!(1), AssetType::Equity)]);
        let err = reconstruct_portfolio(&index, &w, dec!(10000)).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidInput { .. }));
    }

    #[test]
    fn test_zero_anchor_price_is_division_by_zero() {
        let index = PriceIndex::build(&QuoteTable::from_rows(vec![(
            "2024-01-01",
            "A",
            Some(dec!(0)),
        )]))
        .unwrap();
        let w = weights(&[("A", dec!(1), AssetType::Equity)]);
        let err = reconstruct_portfolio(&index, &w, dec!(1000)).unwrap_err();
        assert!(matches!(err, DashboardError::DivisionByZero { .. }));
    }
}
