use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::allocation::optimizer::{risk_based_allocation, AllocationInput};
use crate::allocation::two_asset::{two_asset_stats, utility};
use crate::error::DashboardError;
use crate::types::*;
use crate::DashboardResult;

/// Coarse table: 0%, 10%, ..., 100% in the risky sleeve.
const COARSE_POINTS: i64 = 11;
/// Fine curve for plotting: 100 evenly spaced weights from 0 to 1.
const FINE_POINTS: i64 = 100;

/// One row of the allocation table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRow {
    pub weight: Weight,
    /// e.g. "40%"
    pub weight_pct: String,
    pub expected_return: Rate,
    pub standard_deviation: Rate,
    pub utility: Decimal,
}

/// One point of the utility curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub weight: Weight,
    pub expected_return: Rate,
    pub standard_deviation: Rate,
    pub utility: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioDataOutput {
    pub allocation_data: Vec<AllocationRow>,
    pub chart_data: Vec<CurvePoint>,
    pub optimal_weight: Weight,
    pub risk_aversion_weight: Weight,
    pub er_optimal: Rate,
    pub std_dev_optimal: Rate,
    pub utility_optimal: Decimal,
    /// Sharpe ratio of the risky sleeve
    pub sharpe_ratio: Decimal,
    /// Index into `allocation_data` of the highest utility (first on ties)
    pub max_utility_idx: usize,
    pub risk_aversion_index: Decimal,
}

/// Complete-portfolio allocation tables for the capital allocation line.
///
/// Sizes the risky sleeve from the investor's risk aversion, then tabulates
/// expected return, volatility and utility across risky weights.
pub fn generate_portfolio_data(
    input: &AllocationInput,
) -> DashboardResult<ComputationOutput<PortfolioDataOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.std_dev_risky <= Decimal::ZERO {
        return Err(DashboardError::invalid(
            "std_dev_risky",
            "Standard deviation must be positive",
        ));
    }

    let allocation = risk_based_allocation(input)?;
    let a = allocation.risk_aversion_index;
    let rf = input.risk_free_rate;
    let er = input.expected_return_risky;
    let sd = input.std_dev_risky;

    if a.is_zero() {
        warnings.push("Risk aversion index is zero: risky allocation set to 0".into());
    }
    if er <= rf {
        warnings.push(format!(
            "Risky expected return {er} does not exceed the risk-free rate {rf}"
        ));
    }

    let optimal = two_asset_stats(allocation.risk_aversion_weight, er, sd, rf)?;
    let utility_optimal = utility(optimal.expected_return, optimal.std_dev, a)?;
    let sharpe_ratio = er
        .checked_sub(rf)
        .and_then(|excess| excess.checked_div(sd))
        .ok_or_else(|| DashboardError::overflow("expected_return_risky/std_dev_risky"))?;

    let mut allocation_data = Vec::with_capacity(COARSE_POINTS as usize);
    for i in 0..COARSE_POINTS {
        let w = Decimal::new(i, 1);
        let stats = two_asset_stats(w, er, sd, rf)?;
        allocation_data.push(AllocationRow {
            weight: w,
            weight_pct: format!("{:.0}%", w * Decimal::ONE_HUNDRED),
            expected_return: stats.expected_return,
            standard_deviation: stats.std_dev,
            utility: utility(stats.expected_return, stats.std_dev, a)?,
        });
    }

    let mut max_utility_idx = 0;
    for (i, row) in allocation_data.iter().enumerate() {
        if row.utility > allocation_data[max_utility_idx].utility {
            max_utility_idx = i;
        }
    }

    let last = Decimal::from(FINE_POINTS - 1);
    let mut chart_data = Vec::with_capacity(FINE_POINTS as usize);
    for i in 0..FINE_POINTS {
        let w = if i == FINE_POINTS - 1 {
            Decimal::ONE
        } else {
            Decimal::from(i) / last
        };
        let stats = two_asset_stats(w, er, sd, rf)?;
        chart_data.push(CurvePoint {
            weight: w,
            expected_return: stats.expected_return,
            standard_deviation: stats.std_dev,
            utility: utility(stats.expected_return, stats.std_dev, a)?,
        });
    }

    let output = PortfolioDataOutput {
        allocation_data,
        chart_data,
        optimal_weight: allocation.risk_aversion_weight,
        risk_aversion_weight: allocation.risk_aversion_weight,
        er_optimal: optimal.expected_return,
        std_dev_optimal: optimal.std_dev,
        utility_optimal,
        sharpe_ratio,
        max_utility_idx,
        risk_aversion_index: a,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Capital allocation line with mean-variance utility",
        &serde_json::json!({
            "risk_free_rate": rf.to_string(),
            "expected_return_risky": er.to_string(),
            "std_dev_risky": sd.to_string(),
            "market_view": input.market_view.to_string(),
            "risk_score": input.risk_score.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
