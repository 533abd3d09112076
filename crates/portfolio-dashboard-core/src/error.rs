use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("No data: {0}")]
    NoData(String),

    #[error("No complete date: no date has valid prices for every weighted ticker")]
    NoCompleteDate,

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DashboardError {
    pub fn invalid(field: &str, reason: &str) -> Self {
        DashboardError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Decimal overflow while combining `field` with the rest of the input.
    pub fn overflow(field: &str) -> Self {
        DashboardError::InvalidInput {
            field: field.into(),
            reason: "Value out of range: arithmetic overflow".into(),
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, DashboardError::NoData(_))
    }

    pub fn is_no_complete_date(&self) -> bool {
        matches!(self, DashboardError::NoCompleteDate)
    }

    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, DashboardError::InsufficientData(_))
    }

    /// User-facing text the dashboard shows in place of the chart.
    pub fn placeholder_message(&self) -> String {
        match self {
            DashboardError::NoData(_) => "No price time-series data available for charting".into(),
            DashboardError::NoCompleteDate => {
                "Cannot find a date where all tickers have valid price data".into()
            }
            DashboardError::InsufficientData(_) => "Not enough data points to generate chart".into(),
            other => format!("Error: {other}"),
        }
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(e: serde_json::Error) -> Self {
        DashboardError::SerializationError(e.to_string())
    }
}
