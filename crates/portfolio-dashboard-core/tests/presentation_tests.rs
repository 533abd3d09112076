use std::cell::RefCell;

use chrono::NaiveDate;
use futures::executor::block_on;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

use portfolio_dashboard_core::config::DashboardConfig;
use portfolio_dashboard_core::pipeline::{build_portfolio_chart, PortfolioChartInput};
use portfolio_dashboard_core::presentation::{
    build_chart_layout, select_date, SelectionAck, SelectionStatus,
};
use portfolio_dashboard_core::quotes::QuoteTable;
use portfolio_dashboard_core::weights::EnrichedSecurity;
use portfolio_dashboard_core::AssetType;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn chart_input() -> PortfolioChartInput {
    let quotes = QuoteTable::from_rows(vec![
        ("2024-03-28", "A", Some(dec!(100))),
        ("2024-04-02", "A", Some(dec!(90))),
        ("2024-07-01", "A", Some(dec!(80))),
    ]);
    PortfolioChartInput {
        quotes,
        enriched_securities: Some(vec![EnrichedSecurity {
            ticker: "A".into(),
            complete_weight: dec!(1),
            asset_type: AssetType::Equity,
        }]),
        equity_tickers: vec![],
        config: DashboardConfig {
            investment_amount: dec!(25000),
            ..Default::default()
        },
    }
}

#[test]
fn test_layout_from_pipeline() {
    let input = chart_input();
    let chart = build_portfolio_chart(&input).unwrap().result;
    let layout = build_chart_layout(&chart.series, &chart.metrics, &input.config).unwrap();

    assert_eq!(layout.annotations.initial_investment, "Initial Investment: $25,000");
    assert_eq!(layout.annotations.current_value, "Current Value: $20,000");
    assert_eq!(layout.annotations.total_return, "-20.00%");
    assert_eq!(layout.line_color, "#dc3545");
    assert_eq!(layout.x_domain, (d("2024-03-28"), d("2024-07-01")));
    let ticks: Vec<&str> = layout.x_ticks.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(ticks, vec!["Q2'24", "Q3'24"]);
    assert_eq!(layout.points[1].gain_label, "-10.00%");
    assert_eq!(layout.points[1].value_label, "$22,500");
}

#[test]
fn test_click_selects_nearest_point_and_waits_for_ack() {
    let chart = build_portfolio_chart(&chart_input()).unwrap().result;
    let acks = RefCell::new(Vec::new());
    let sink = |date: NaiveDate, ack: SelectionAck| acks.borrow_mut().push((date, ack));

    let mut handle = select_date(&chart.series, d("2024-05-01"), Some(&sink)).unwrap();
    assert_eq!(handle.date(), d("2024-04-02"));
    assert_eq!(handle.try_status(), None);

    let (date, ack) = acks.borrow_mut().pop().unwrap();
    assert_eq!(date, d("2024-04-02"));
    ack.done();
    assert_eq!(block_on(handle), SelectionStatus::Acknowledged);
}
