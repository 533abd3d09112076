pub mod metrics;
pub mod performance;
pub mod reconstruct;

pub use metrics::{calculate_chart_metrics, ChartMetrics};
pub use performance::{calculate_portfolio_returns, PortfolioReturnsOutput};
pub use reconstruct::{
    calculate_holdings, calculate_portfolio_time_series, find_earliest_complete_date,
    reconstruct_portfolio, Holding, PortfolioPoint, Reconstruction,
};
