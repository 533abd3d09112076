use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::ChartStyle;
use crate::error::DashboardError;
use crate::timeseries::reconstruct::PortfolioPoint;
use crate::types::*;
use crate::DashboardResult;

/// Fixed 365-day year, no leap-day adjustment.
const DAYS_PER_YEAR: Decimal = dec!(365);

/// Headline numbers shown next to the value chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartMetrics {
    pub initial_value: Money,
    pub current_value: Money,
    /// current / initial − 1, or 0 when the initial value is 0
    pub total_return: Rate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub years_elapsed: Years,
    /// Positive colour when total_return ≥ 0, negative colour otherwise
    pub sign_color: String,
}

impl ChartMetrics {
    pub fn is_gain(&self) -> bool {
        self.total_return >= Decimal::ZERO
    }
}

/// Summarise a value series. The series must not be empty.
pub fn calculate_chart_metrics(
    series: &[PortfolioPoint],
    style: &ChartStyle,
) -> DashboardResult<ChartMetrics> {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return Err(DashboardError::InsufficientData(
            "Chart metrics need at least one point".into(),
        ));
    };

    let total_return = if first.value.is_zero() {
        Decimal::ZERO
    } else {
        last.value
            .checked_div(first.value)
            .and_then(|ratio| ratio.checked_sub(Decimal::ONE))
            .ok_or_else(|| DashboardError::overflow("series"))?
    };
    let days = (last.date - first.date).num_days();
    let years_elapsed = Decimal::from(days) / DAYS_PER_YEAR;
    let sign_color = if total_return >= Decimal::ZERO {
        style.positive_color.clone()
    } else {
        style.negative_color.clone()
    };

    Ok(ChartMetrics {
        initial_value: first.value,
        current_value: last.value,
        total_return,
        start_date: first.date,
        end_date: last.date,
        years_elapsed,
        sign_color,
    })
}
