use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use portfolio_dashboard_core::config::DashboardConfig;
use portfolio_dashboard_core::pipeline::{build_portfolio_chart, PortfolioChartInput};
use portfolio_dashboard_core::quotes::{PriceIndex, QuoteTable};
use portfolio_dashboard_core::timeseries::reconstruct_portfolio;
use portfolio_dashboard_core::weights::{EnrichedSecurity, TickerWeight, TickerWeights};
use portfolio_dashboard_core::AssetType;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn ab_quotes() -> QuoteTable {
    QuoteTable::from_rows(vec![
        ("2024-01-01", "A", Some(dec!(100))),
        ("2024-01-02", "A", Some(dec!(110))),
        ("2024-01-03", "A", Some(dec!(120))),
        ("2024-01-01", "B", Some(dec!(50))),
        ("2024-01-02", "B", Some(dec!(55))),
        ("2024-01-03", "B", Some(dec!(60))),
    ])
}

fn enriched(entries: &[(&str, Decimal, AssetType)]) -> Vec<EnrichedSecurity> {
    entries
        .iter()
        .map(|(t, w, a)| EnrichedSecurity {
            ticker: t.to_string(),
            complete_weight: *w,
            asset_type: *a,
        })
        .collect()
}

fn input(quotes: QuoteTable, securities: Vec<EnrichedSecurity>) -> PortfolioChartInput {
    PortfolioChartInput {
        quotes,
        enriched_securities: Some(securities),
        equity_tickers: vec![],
        config: DashboardConfig {
            investment_amount: dec!(1000),
            ..Default::default()
        },
    }
}

// ---------------------------------------------------------------------------
// End-to-end scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_two_equities_end_to_end() {
    let securities = enriched(&[
        ("A", dec!(0.5), AssetType::Equity),
        ("B", dec!(0.5), AssetType::Equity),
    ]);
    let out = build_portfolio_chart(&input(ab_quotes(), securities)).unwrap();
    let chart = out.result;

    assert_eq!(chart.earliest_date, d("2024-01-01"));
    let shares: Vec<Option<Decimal>> = chart.holdings.iter().map(|h| h.shares).collect();
    assert_eq!(shares, vec![Some(dec!(5)), Some(dec!(10))]);

    let values: Vec<Decimal> = chart.series.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![dec!(1000), dec!(1100), dec!(1200)]);
    assert_eq!(chart.metrics.total_return, dec!(0.2));
    assert_eq!(chart.metrics.sign_color, "#28a745");
    assert!(out.warnings.is_empty());
}

#[test]
fn test_risk_free_end_to_end() {
    let quotes = QuoteTable::from_rows(vec![
        ("2024-01-01", "A", Some(dec!(100))),
        ("2024-01-02", "A", Some(dec!(110))),
        ("2024-01-03", "A", Some(dec!(120))),
        ("2024-01-01", "RF", Some(dec!(1))),
        ("2024-01-03", "RF", None),
    ]);
    let securities = enriched(&[
        ("A", dec!(0.5), AssetType::Equity),
        ("RF", dec!(0.5), AssetType::RiskFree),
    ]);
    let chart = build_portfolio_chart(&input(quotes, securities)).unwrap().result;

    let values: Vec<Decimal> = chart.series.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![dec!(1000), dec!(1050), dec!(1100)]);
    assert_eq!(chart.metrics.total_return, dec!(0.1));

    let rf = chart.holdings.iter().find(|h| h.ticker == "RF").unwrap();
    assert_eq!(rf.shares, None);
    assert_eq!(rf.initial_investment, dec!(500));
}

#[test]
fn test_json_input_with_percentage_metadata() {
    let raw = r#"{
        "quotes": {
            "Date": ["2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z", "2024-01-01", "2024-01-02"],
            "Ticker": ["EQ", "EQ", "BD", "BD"],
            "Close": [100, 120, 50, "NaN"],
            "Type": ["Equity", "Equity", "Bond", "Bond"]
        },
        "equity_tickers": [
            {"Ticker": "EQ", "Type": "Equity", "Weight": "100%"},
            {"Ticker": "BD", "Type": "Bond", "Weight": "100%"}
        ],
        "config": {"investment_amount": "1000"}
    }"#;
    let input: PortfolioChartInput = serde_json::from_str(raw).unwrap();
    let chart = build_portfolio_chart(&input).unwrap().result;

    // BD has a single valid close so first == last and it is still weighted,
    // but it has no price on the second day: only the anchor survives.
    assert_eq!(chart.series.len(), 1);
    assert_eq!(chart.series[0].value, dec!(1000));
    assert_eq!(chart.weights["EQ"].weight, dec!(0.6));
    assert_eq!(chart.weights["BD"].weight, dec!(0.4));
}

// ---------------------------------------------------------------------------
// Failure signalling
// ---------------------------------------------------------------------------

#[test]
fn test_no_complete_date_is_distinct() {
    let quotes = QuoteTable::from_rows(vec![
        ("2024-01-01", "A", Some(dec!(100))),
        ("2024-01-01", "B", None),
        ("2024-01-02", "B", Some(dec!(50))),
    ]);
    let securities = enriched(&[
        ("A", dec!(0.5), AssetType::Equity),
        ("B", dec!(0.5), AssetType::Equity),
    ]);
    let err = build_portfolio_chart(&input(quotes, securities)).unwrap_err();
    assert!(err.is_no_complete_date());
    assert!(!err.is_no_data());
    assert_eq!(
        err.placeholder_message(),
        "Cannot find a date where all tickers have valid price data"
    );
}

#[test]
fn test_missing_close_column_is_no_data() {
    let mut quotes = ab_quotes();
    quotes.close = None;
    let err = build_portfolio_chart(&input(quotes, vec![])).unwrap_err();
    assert!(err.is_no_data());
}

// ---------------------------------------------------------------------------
// Reconstruction properties
// ---------------------------------------------------------------------------

#[test]
fn test_series_dates_ascending_subsequence() {
    let quotes = QuoteTable::from_rows(vec![
        ("2024-01-05", "A", Some(dec!(104))),
        ("2024-01-01", "A", Some(dec!(100))),
        ("2024-01-03", "A", None),
        ("2024-01-02", "A", Some(dec!(101))),
    ]);
    let index = PriceIndex::build(&quotes).unwrap();
    let mut weights = TickerWeights::new();
    weights.insert(
        "A".into(),
        TickerWeight {
            weight: Decimal::ONE,
            asset_type: AssetType::Equity,
        },
    );
    let rec = reconstruct_portfolio(&index, &weights, dec!(1000)).unwrap();

    let dates: Vec<NaiveDate> = rec.series.iter().map(|p| p.date).collect();
    assert_eq!(dates, vec![d("2024-01-01"), d("2024-01-02"), d("2024-01-05")]);
    for pair in dates.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}

#[test]
fn test_share_conservation() {
    let index = PriceIndex::build(&ab_quotes()).unwrap();
    let mut weights = TickerWeights::new();
    for (t, w) in [("A", dec!(0.3)), ("B", dec!(0.7))] {
        weights.insert(
            t.into(),
            TickerWeight {
                weight: w,
                asset_type: AssetType::Equity,
            },
        );
    }
    let rec = reconstruct_portfolio(&index, &weights, dec!(2500)).unwrap();
    for h in &rec.holdings {
        let anchor = index.price(&rec.earliest_date, &h.ticker).unwrap();
        let invested = h.shares.unwrap() * anchor;
        assert!(
            (invested - dec!(2500) * h.weight).abs() < dec!(0.000001),
            "{} invested {}",
            h.ticker,
            invested
        );
    }
}
