use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use portfolio_dashboard_core::allocation::{
    generate_portfolio_data, optimal_equity_weight, risk_based_allocation,
    risky_portfolio_metrics, two_asset_stats, utility, AllocationInput, RiskyPortfolioInput,
    SharpeSearchInput,
};

use crate::input;

/// Arguments for risky/risk-free portfolio statistics
#[derive(Args)]
pub struct StatsArgs {
    /// Fraction held in the risky sleeve (0 to 1)
    #[arg(long)]
    pub weight_risky: Decimal,

    /// Expected return of the risky sleeve
    #[arg(long)]
    pub expected_return_risky: Decimal,

    /// Standard deviation of the risky sleeve
    #[arg(long)]
    pub std_dev_risky: Decimal,

    /// Risk-free rate
    #[arg(long, default_value = "0.04")]
    pub risk_free_rate: Decimal,
}

/// Arguments for mean-variance utility
#[derive(Args)]
pub struct UtilityArgs {
    /// Expected portfolio return
    #[arg(long, allow_hyphen_values = true)]
    pub expected_return: Decimal,

    /// Portfolio standard deviation
    #[arg(long)]
    pub std_dev: Decimal,

    /// Risk aversion coefficient A
    #[arg(long)]
    pub risk_aversion: Decimal,
}

/// Arguments for the Sharpe-maximising equity/bond split
#[derive(Args)]
pub struct OptimalWeightArgs {
    /// Path to JSON file with the market assumptions
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub equity_return: Option<Decimal>,

    #[arg(long)]
    pub equity_std: Option<Decimal>,

    #[arg(long)]
    pub bond_return: Option<Decimal>,

    #[arg(long)]
    pub bond_std: Option<Decimal>,

    /// Equity/bond correlation (-1 to 1)
    #[arg(long, allow_hyphen_values = true)]
    pub correlation: Option<Decimal>,

    #[arg(long, default_value = "0.04")]
    pub risk_free_rate: Decimal,
}

/// Arguments for the risk-aversion based allocation and its tables
#[derive(Args)]
pub struct AllocationArgs {
    /// Path to JSON file with the allocation parameters
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, default_value = "0.04")]
    pub risk_free_rate: Decimal,

    /// Expected return of the risky sleeve
    #[arg(long)]
    pub expected_return_risky: Option<Decimal>,

    /// Standard deviation of the risky sleeve
    #[arg(long)]
    pub std_dev_risky: Option<Decimal>,

    /// Market view, 0 (bearish) to 100 (bullish)
    #[arg(long, default_value = "50")]
    pub market_view: Decimal,

    /// Risk score, 0 (cautious) to 100 (aggressive)
    #[arg(long, default_value = "50")]
    pub risk_score: Decimal,
}

/// Arguments for combining equity and bond into a risky sleeve
#[derive(Args)]
pub struct RiskyMetricsArgs {
    /// Equity share of the sleeve (0 to 1)
    #[arg(long)]
    pub equity_weight: Decimal,

    #[arg(long)]
    pub equity_return: Decimal,

    #[arg(long)]
    pub equity_std: Decimal,

    #[arg(long)]
    pub bond_return: Decimal,

    #[arg(long)]
    pub bond_std: Decimal,

    /// Equity/bond correlation (-1 to 1)
    #[arg(long, allow_hyphen_values = true)]
    pub correlation: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
struct UtilityOutput {
    utility: Decimal,
    expected_return: Decimal,
    std_dev: Decimal,
    risk_aversion: Decimal,
}

fn piped_or_file(path: Option<&str>) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    match path {
        Some(p) => Ok(Some(input::file::read_json_value(p)?)),
        None => input::stdin::read_stdin(),
    }
}

pub fn run_stats(args: StatsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let result = two_asset_stats(
        args.weight_risky,
        args.expected_return_risky,
        args.std_dev_risky,
        args.risk_free_rate,
    )?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_utility(args: UtilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let value = utility(args.expected_return, args.std_dev, args.risk_aversion)?;
    Ok(serde_json::to_value(UtilityOutput {
        utility: value,
        expected_return: args.expected_return,
        std_dev: args.std_dev,
        risk_aversion: args.risk_aversion,
    })?)
}

pub fn run_optimal_weight(args: OptimalWeightArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let search_input: SharpeSearchInput = if let Some(data) = piped_or_file(args.input.as_deref())? {
        serde_json::from_value(data)?
    } else {
        SharpeSearchInput {
            equity_return: args
                .equity_return
                .ok_or("--equity-return is required (or provide --input)")?,
            equity_std: args
                .equity_std
                .ok_or("--equity-std is required (or provide --input)")?,
            bond_return: args
                .bond_return
                .ok_or("--bond-return is required (or provide --input)")?,
            bond_std: args
                .bond_std
                .ok_or("--bond-std is required (or provide --input)")?,
            correlation: args
                .correlation
                .ok_or("--correlation is required (or provide --input)")?,
            risk_free_rate: args.risk_free_rate,
        }
    };

    let result = optimal_equity_weight(&search_input)?;
    Ok(serde_json::to_value(result)?)
}

fn allocation_input(args: &AllocationArgs) -> Result<AllocationInput, Box<dyn std::error::Error>> {
    if let Some(data) = piped_or_file(args.input.as_deref())? {
        return Ok(serde_json::from_value(data)?);
    }
    Ok(AllocationInput {
        risk_free_rate: args.risk_free_rate,
        expected_return_risky: args
            .expected_return_risky
            .ok_or("--expected-return-risky is required (or provide --input)")?,
        std_dev_risky: args
            .std_dev_risky
            .ok_or("--std-dev-risky is required (or provide --input)")?,
        market_view: args.market_view,
        risk_score: args.risk_score,
    })
}

pub fn run_risk_allocation(args: AllocationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let result = risk_based_allocation(&allocation_input(&args)?)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_portfolio_data(args: AllocationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let result = generate_portfolio_data(&allocation_input(&args)?)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_risky_metrics(args: RiskyMetricsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let result = risky_portfolio_metrics(&RiskyPortfolioInput {
        equity_weight: args.equity_weight,
        equity_return: args.equity_return,
        equity_std: args.equity_std,
        bond_return: args.bond_return,
        bond_std: args.bond_std,
        correlation: args.correlation,
    })?;
    Ok(serde_json::to_value(result)?)
}
