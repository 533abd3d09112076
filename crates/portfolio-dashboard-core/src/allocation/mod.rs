pub mod optimizer;
pub mod portfolio_data;
pub mod two_asset;

pub use optimizer::{
    optimal_equity_weight, risk_based_allocation, sharpe_at, AllocationInput,
    RiskBasedAllocation, SharpeSearchInput, SharpeSearchOutput,
};
pub use portfolio_data::{generate_portfolio_data, AllocationRow, CurvePoint, PortfolioDataOutput};
pub use two_asset::{
    risky_portfolio_metrics, two_asset_stats, utility, PortfolioStats, RiskyPortfolioInput,
    RiskyPortfolioMetrics,
};
