use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;
use crate::error::DashboardError;
use crate::presentation::format::{format_currency, format_percent, format_signed_percent};
use crate::timeseries::{ChartMetrics, PortfolioPoint};
use crate::types::*;
use crate::DashboardResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    pub date: NaiveDate,
    /// e.g. "Q1'24"
    pub label: String,
}

/// One series point with its tooltip strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPointView {
    pub date: NaiveDate,
    pub value: Money,
    /// Gain relative to the initial value as a fraction
    pub gain: Rate,
    pub date_label: String,
    pub value_label: String,
    pub gain_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartAnnotations {
    pub initial_investment: String,
    pub current_value: String,
    pub total_return: String,
}

/// Everything a plotting layer needs to draw the value chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartLayout {
    pub x_domain: (NaiveDate, NaiveDate),
    pub y_domain: (Money, Money),
    pub x_ticks: Vec<AxisTick>,
    pub points: Vec<ChartPointView>,
    pub annotations: ChartAnnotations,
    pub line_color: String,
    pub initial_line_color: String,
}

/// Quarter tick label: 2024-02-10 → "Q1'24".
pub fn quarter_label(date: NaiveDate) -> String {
    format!("Q{}'{:02}", date.month0() / 3 + 1, date.year().rem_euclid(100))
}

/// Tooltip date: "Jan 05, 2024".
pub fn tooltip_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

/// First day of every calendar quarter inside `[start, end]`.
pub fn quarter_ticks(start: NaiveDate, end: NaiveDate) -> Vec<AxisTick> {
    let mut ticks = Vec::new();
    let mut year = start.year();
    let mut month = start.month0() / 3 * 3 + 1;
    while let Some(date) = NaiveDate::from_ymd_opt(year, month, 1) {
        if date > end {
            break;
        }
        if date >= start {
            ticks.push(AxisTick {
                date,
                label: quarter_label(date),
            });
        }
        month += 3;
        if month > 12 {
            month -= 12;
            year += 1;
        }
    }
    ticks
}

/// Series point closest to `target`. Earlier points win ties.
pub fn nearest_point(series: &[PortfolioPoint], target: NaiveDate) -> Option<&PortfolioPoint> {
    let mut best: Option<(&PortfolioPoint, i64)> = None;
    for point in series {
        let distance = (point.date - target).num_days().abs();
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((point, distance));
        }
    }
    best.map(|(point, _)| point)
}

/// Lay out the value chart: axis domains, quarter ticks, tooltips and the
/// initial/current/return annotations.
pub fn build_chart_layout(
    series: &[PortfolioPoint],
    metrics: &ChartMetrics,
    config: &DashboardConfig,
) -> DashboardResult<ChartLayout> {
    let Some(max_value) = series.iter().map(|p| p.value).max() else {
        return Err(DashboardError::InsufficientData(
            "Chart layout needs at least one point".into(),
        ));
    };
    let style = &config.style;
    let fmt = &config.format;
    let initial = metrics.initial_value;

    let points = series
        .iter()
        .map(|p| {
            let gain = if initial.is_zero() {
                Decimal::ZERO
            } else {
                p.value / initial - Decimal::ONE
            };
            ChartPointView {
                date: p.date,
                value: p.value,
                gain,
                date_label: tooltip_date(p.date),
                value_label: format_currency(p.value, fmt),
                gain_label: format_percent(gain, fmt),
            }
        })
        .collect();

    Ok(ChartLayout {
        x_domain: (metrics.start_date, metrics.end_date),
        y_domain: (Decimal::ZERO, max_value.max(initial) * style.headroom),
        x_ticks: quarter_ticks(metrics.start_date, metrics.end_date),
        points,
        annotations: ChartAnnotations {
            initial_investment: format!("Initial Investment: {}", format_currency(initial, fmt)),
            current_value: format!(
                "Current Value: {}",
                format_currency(metrics.current_value, fmt)
            ),
            total_return: format_signed_percent(metrics.total_return, fmt),
        },
        line_color: metrics.sign_color.clone(),
        initial_line_color: style.initial_line_color.clone(),
    })
}
