use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use portfolio_dashboard_core::config::DashboardConfig;
use portfolio_dashboard_core::pipeline::{build_portfolio_chart, PortfolioChart, PortfolioChartInput};
use portfolio_dashboard_core::presentation::{build_chart_layout, nearest_point, ChartLayout};
use portfolio_dashboard_core::quotes::{parse_date_strict, QuoteTable};
use portfolio_dashboard_core::timeseries::{calculate_portfolio_returns, PortfolioPoint};
use portfolio_dashboard_core::weights::TickerMeta;
use portfolio_dashboard_core::ComputationOutput;

use crate::input;

/// Arguments for the portfolio value chart
#[derive(Args)]
pub struct ChartArgs {
    /// Path to JSON file with quotes, enriched securities, ticker metadata and config
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a JSON or YAML config file (overrides the input's config)
    #[arg(long)]
    pub config: Option<String>,

    /// Initial capital
    #[arg(long)]
    pub investment_amount: Option<Decimal>,

    /// Target equity share of the risky sleeve
    #[arg(long)]
    pub equity_weight: Option<Decimal>,

    /// Target bond share of the risky sleeve
    #[arg(long)]
    pub bond_weight: Option<Decimal>,

    /// Risky-to-complete portfolio scaling
    #[arg(long)]
    pub fixed_optimal_weight: Option<Decimal>,

    /// Report the series point nearest to this date
    #[arg(long)]
    pub select_date: Option<String>,
}

/// Arguments for per-ticker buy-and-hold returns
#[derive(Args)]
pub struct ReturnsArgs {
    /// Path to JSON file with `quotes` and `equity_tickers`
    #[arg(long)]
    pub input: Option<String>,

    /// Initial capital (defaults to the input's value, then 10000)
    #[arg(long)]
    pub investment_amount: Option<Decimal>,
}

#[derive(Debug, Serialize)]
struct ChartReport {
    #[serde(flatten)]
    chart: PortfolioChart,
    layout: ChartLayout,
    #[serde(skip_serializing_if = "Option::is_none")]
    selected: Option<PortfolioPoint>,
}

#[derive(Debug, Deserialize)]
struct ReturnsInput {
    quotes: QuoteTable,
    #[serde(default)]
    equity_tickers: Vec<TickerMeta>,
    #[serde(default)]
    investment_amount: Option<Decimal>,
}

fn read_input(path: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        input::file::read_json_value(path)
    } else if let Some(data) = input::stdin::read_stdin()? {
        Ok(data)
    } else {
        Err("Quote data is required: provide --input or pipe JSON on stdin".into())
    }
}

fn apply_overrides(config: &mut DashboardConfig, args: &ChartArgs) {
    if let Some(v) = args.investment_amount {
        config.investment_amount = v;
    }
    if let Some(v) = args.equity_weight {
        config.equity_weight = v;
    }
    if let Some(v) = args.bond_weight {
        config.bond_weight = v;
    }
    if let Some(v) = args.fixed_optimal_weight {
        config.fixed_optimal_weight = v;
    }
}

pub fn run_chart(args: ChartArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let data = read_input(args.input.as_deref())?;
    let mut chart_input: PortfolioChartInput = serde_json::from_value(data)?;
    if let Some(ref path) = args.config {
        chart_input.config = input::file::read_config(path)?;
    }
    apply_overrides(&mut chart_input.config, &args);

    let out = build_portfolio_chart(&chart_input)?;
    let layout = build_chart_layout(&out.result.series, &out.result.metrics, &chart_input.config)?;

    let selected = match args.select_date.as_deref() {
        Some(raw) => {
            let target = parse_date_strict(raw)?;
            let point = nearest_point(&out.result.series, target).copied();
            if let Some(p) = &point {
                info!(%target, date = %p.date, "selected nearest point");
            }
            point
        }
        None => None,
    };

    let report = ComputationOutput {
        result: ChartReport {
            chart: out.result,
            layout,
            selected,
        },
        methodology: out.methodology,
        assumptions: out.assumptions,
        warnings: out.warnings,
        metadata: out.metadata,
    };
    Ok(serde_json::to_value(report)?)
}

pub fn run_returns(args: ReturnsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let data = read_input(args.input.as_deref())?;
    let returns_input: ReturnsInput = serde_json::from_value(data)?;
    let investment_amount = args
        .investment_amount
        .or(returns_input.investment_amount)
        .unwrap_or(DashboardConfig::default().investment_amount);

    let result = calculate_portfolio_returns(
        &returns_input.quotes,
        &returns_input.equity_tickers,
        investment_amount,
    )?;
    Ok(serde_json::to_value(result)?)
}
