mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::allocation::{
    AllocationArgs, OptimalWeightArgs, RiskyMetricsArgs, StatsArgs, UtilityArgs,
};
use commands::chart::{ChartArgs, ReturnsArgs};

/// Portfolio value charts and mean-variance allocation
#[derive(Parser)]
#[command(
    name = "pfdash",
    version,
    about = "Portfolio value charts and mean-variance allocation",
    long_about = "Reconstructs buy-and-hold portfolio value curves from daily close \
                  prices and computes two-asset statistics, utility, Sharpe-optimal \
                  weights and risk-aversion based allocations with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log level for diagnostics on stderr (RUST_LOG overrides)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct the portfolio value series, metrics and chart layout
    Chart(ChartArgs),
    /// Per-ticker and aggregate buy-and-hold performance
    Returns(ReturnsArgs),
    /// Expected return and volatility of a risky/risk-free mix
    Stats(StatsArgs),
    /// Mean-variance utility
    Utility(UtilityArgs),
    /// Grid-search the Sharpe-maximising equity weight
    OptimalWeight(OptimalWeightArgs),
    /// Size the risky sleeve from market view and risk score
    RiskAllocation(AllocationArgs),
    /// Combine equity and bond into one risky sleeve
    RiskyMetrics(RiskyMetricsArgs),
    /// Allocation table and utility curve along the capital allocation line
    PortfolioData(AllocationArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Chart(args) => commands::chart::run_chart(args),
        Commands::Returns(args) => commands::chart::run_returns(args),
        Commands::Stats(args) => commands::allocation::run_stats(args),
        Commands::Utility(args) => commands::allocation::run_utility(args),
        Commands::OptimalWeight(args) => commands::allocation::run_optimal_weight(args),
        Commands::RiskAllocation(args) => commands::allocation::run_risk_allocation(args),
        Commands::RiskyMetrics(args) => commands::allocation::run_risky_metrics(args),
        Commands::PortfolioData(args) => commands::allocation::run_portfolio_data(args),
        Commands::Version => {
            println!("pfdash {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
