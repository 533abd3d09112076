pub mod config;
pub mod error;
pub mod types;

#[cfg(feature = "timeseries")]
pub mod quotes;

#[cfg(feature = "timeseries")]
pub mod weights;

#[cfg(feature = "timeseries")]
pub mod timeseries;

#[cfg(feature = "timeseries")]
pub mod pipeline;

#[cfg(feature = "allocation")]
pub mod allocation;

#[cfg(feature = "presentation")]
pub mod presentation;

pub use config::DashboardConfig;
pub use error::DashboardError;
pub use types::*;

/// Standard result type for all dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;
