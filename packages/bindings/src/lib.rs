use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use portfolio_dashboard_core::config::FormatConfig;
use portfolio_dashboard_core::DashboardError;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Chart failures carry the text the page shows instead of the chart.
fn to_placeholder_error(e: DashboardError) -> napi::Error {
    napi::Error::from_reason(e.placeholder_message())
}

fn format_config(format_json: Option<String>) -> NapiResult<FormatConfig> {
    match format_json {
        Some(json) => serde_json::from_str(&json).map_err(to_napi_error),
        None => Ok(FormatConfig::default()),
    }
}

fn decimal(raw: &str) -> NapiResult<Decimal> {
    raw.trim().parse::<Decimal>().map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Portfolio value chart
// ---------------------------------------------------------------------------

#[napi]
pub fn build_portfolio_chart(input_json: String) -> NapiResult<String> {
    let input: portfolio_dashboard_core::pipeline::PortfolioChartInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = portfolio_dashboard_core::pipeline::build_portfolio_chart(&input)
        .map_err(to_placeholder_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct ChartLayoutInput {
    series: Vec<portfolio_dashboard_core::timeseries::PortfolioPoint>,
    #[serde(default)]
    config: portfolio_dashboard_core::config::DashboardConfig,
}

#[napi]
pub fn chart_layout(input_json: String) -> NapiResult<String> {
    let input: ChartLayoutInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let metrics =
        portfolio_dashboard_core::timeseries::calculate_chart_metrics(&input.series, &input.config.style)
            .map_err(to_placeholder_error)?;
    let layout =
        portfolio_dashboard_core::presentation::build_chart_layout(&input.series, &metrics, &input.config)
            .map_err(to_placeholder_error)?;
    serde_json::to_string(&layout).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct ReturnsInput {
    quotes: portfolio_dashboard_core::quotes::QuoteTable,
    #[serde(default)]
    equity_tickers: Vec<portfolio_dashboard_core::weights::TickerMeta>,
    investment_amount: Decimal,
}

#[napi]
pub fn calculate_portfolio_returns(input_json: String) -> NapiResult<String> {
    let input: ReturnsInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = portfolio_dashboard_core::timeseries::calculate_portfolio_returns(
        &input.quotes,
        &input.equity_tickers,
        input.investment_amount,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Allocation
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct StatsInput {
    weight_risky: Decimal,
    expected_return_risky: Decimal,
    std_dev_risky: Decimal,
    risk_free_rate: Decimal,
}

#[napi]
pub fn two_asset_stats(input_json: String) -> NapiResult<String> {
    let input: StatsInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = portfolio_dashboard_core::allocation::two_asset_stats(
        input.weight_risky,
        input.expected_return_risky,
        input.std_dev_risky,
        input.risk_free_rate,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn utility(expected_return: String, std_dev: String, risk_aversion: String) -> NapiResult<String> {
    let value = portfolio_dashboard_core::allocation::utility(
        decimal(&expected_return)?,
        decimal(&std_dev)?,
        decimal(&risk_aversion)?,
    )
    .map_err(to_napi_error)?;
    Ok(value.to_string())
}

#[napi]
pub fn optimal_equity_weight(input_json: String) -> NapiResult<String> {
    let input: portfolio_dashboard_core::allocation::SharpeSearchInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        portfolio_dashboard_core::allocation::optimal_equity_weight(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn risk_based_allocation(input_json: String) -> NapiResult<String> {
    let input: portfolio_dashboard_core::allocation::AllocationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        portfolio_dashboard_core::allocation::risk_based_allocation(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn risky_portfolio_metrics(input_json: String) -> NapiResult<String> {
    let input: portfolio_dashboard_core::allocation::RiskyPortfolioInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = portfolio_dashboard_core::allocation::risky_portfolio_metrics(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn generate_portfolio_data(input_json: String) -> NapiResult<String> {
    let input: portfolio_dashboard_core::allocation::AllocationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = portfolio_dashboard_core::allocation::generate_portfolio_data(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

#[napi]
pub fn format_currency(value: String, format_json: Option<String>) -> NapiResult<String> {
    let format = format_config(format_json)?;
    Ok(portfolio_dashboard_core::presentation::format_currency(decimal(&value)?, &format))
}

#[napi]
pub fn format_percent(value: String, format_json: Option<String>) -> NapiResult<String> {
    let format = format_config(format_json)?;
    Ok(portfolio_dashboard_core::presentation::format_percent(decimal(&value)?, &format))
}

#[napi]
pub fn format_number(value: String, format_json: Option<String>) -> NapiResult<String> {
    let format = format_config(format_json)?;
    Ok(portfolio_dashboard_core::presentation::format_number(decimal(&value)?, &format))
}

#[napi]
pub fn categorize_value(value: String, thresholds: Vec<String>, labels: Vec<String>) -> NapiResult<String> {
    let thresholds = thresholds
        .iter()
        .map(|t| decimal(t))
        .collect::<NapiResult<Vec<Decimal>>>()?;
    portfolio_dashboard_core::presentation::categorize_value(decimal(&value)?, &thresholds, &labels)
        .map_err(to_napi_error)
}
