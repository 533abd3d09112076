use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::allocation::two_asset::{two_asset_std_dev, validate_correlation, weighted_sum};
use crate::error::DashboardError;
use crate::types::*;
use crate::DashboardResult;

/// Grid resolution of the Sharpe search: weights 0.00, 0.01, ..., 1.00.
const GRID_STEPS: i64 = 100;

/// Fallback equity weight when no grid point has positive volatility.
const DEFAULT_EQUITY_WEIGHT: Weight = dec!(0.5);

/// Capital market assumptions for the equity/bond Sharpe search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharpeSearchInput {
    pub equity_return: Rate,
    pub equity_std: Rate,
    pub bond_return: Rate,
    pub bond_std: Rate,
    pub correlation: Decimal,
    pub risk_free_rate: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharpeSearchOutput {
    pub equity_weight: Weight,
    pub bond_weight: Weight,
    /// `None` when the default weight was used
    pub sharpe_ratio: Option<Decimal>,
    pub expected_return: Rate,
    pub std_dev: Rate,
}

/// Parameters of the risk-aversion based sizing of the risky sleeve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationInput {
    pub risk_free_rate: Rate,
    pub expected_return_risky: Rate,
    pub std_dev_risky: Rate,
    /// 0 (bearish) to 100 (bullish)
    pub market_view: Decimal,
    /// 0 (cautious) to 100 (aggressive)
    pub risk_score: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskBasedAllocation {
    pub risk_aversion_index: Decimal,
    /// Fraction of capital in the risky sleeve, clamped to [0, 1]
    pub risk_aversion_weight: Weight,
}

/// Sharpe ratio of the equity/bond mix at equity weight `w`, or `None`
/// when the mix has zero volatility or cannot be represented.
pub fn sharpe_at(input: &SharpeSearchInput, w: Weight) -> Option<Decimal> {
    let (er, sd) = mix(input, w)?;
    if sd.is_zero() {
        return None;
    }
    er.checked_sub(input.risk_free_rate)?.checked_div(sd)
}

fn mix(input: &SharpeSearchInput, w: Weight) -> Option<(Rate, Rate)> {
    let er = weighted_sum(w, input.equity_return, Decimal::ONE - w, input.bond_return)?;
    let sd = two_asset_std_dev(w, input.equity_std, input.bond_std, input.correlation)?;
    Some((er, sd))
}

/// Grid-search the equity weight that maximises the Sharpe ratio.
///
/// Weights run from 0 to 1 inclusive in steps of 0.01, so an all-equity
/// corner optimum is reported as exactly 1. Zero-volatility and overflowing
/// points are skipped. Ties keep the lowest weight.
pub fn optimal_equity_weight(input: &SharpeSearchInput) -> DashboardResult<SharpeSearchOutput> {
    if input.equity_std <= Decimal::ZERO || input.bond_std <= Decimal::ZERO {
        return Err(DashboardError::invalid(
            "equity_std/bond_std",
            "Standard deviations must be positive",
        ));
    }
    validate_correlation(input.correlation)?;

    let mut best: Option<(Weight, Decimal)> = None;
    for step in 0..=GRID_STEPS {
        let w = Decimal::new(step, 2);
        let Some(sharpe) = sharpe_at(input, w) else {
            continue;
        };
        if best.map_or(true, |(_, max)| sharpe > max) {
            best = Some((w, sharpe));
        }
    }

    let (equity_weight, sharpe_ratio) = match best {
        Some((w, s)) => (w, Some(s)),
        None => (DEFAULT_EQUITY_WEIGHT, None),
    };
    let (expected_return, std_dev) = mix(input, equity_weight)
        .ok_or_else(|| DashboardError::overflow("equity_std/bond_std"))?;

    Ok(SharpeSearchOutput {
        equity_weight,
        bond_weight: Decimal::ONE - equity_weight,
        sharpe_ratio,
        expected_return,
        std_dev,
    })
}

/// Size the risky sleeve from the investor's risk aversion.
///
/// A = market_view × (1 − risk_score/100),
/// w* = (E[r] − r_f) / (A·σ²) clamped to [0, 1]; an undefined w* (A = 0)
/// becomes 0.
pub fn risk_based_allocation(input: &AllocationInput) -> DashboardResult<RiskBasedAllocation> {
    if input.std_dev_risky <= Decimal::ZERO {
        return Err(DashboardError::invalid(
            "std_dev_risky",
            "Standard deviation must be positive",
        ));
    }
    let hundred = Decimal::ONE_HUNDRED;
    if input.market_view < Decimal::ZERO
        || input.market_view > hundred
        || input.risk_score < Decimal::ZERO
        || input.risk_score > hundred
    {
        return Err(DashboardError::invalid(
            "market_view/risk_score",
            "Market view and risk score must be between 0 and 100",
        ));
    }

    let risk_aversion_index = input.market_view * (Decimal::ONE - input.risk_score / hundred);
    let excess_return = input
        .expected_return_risky
        .checked_sub(input.risk_free_rate)
        .ok_or_else(|| DashboardError::overflow("expected_return_risky/risk_free_rate"))?;
    let denominator = risk_aversion_index
        .checked_mul(input.std_dev_risky)
        .and_then(|v| v.checked_mul(input.std_dev_risky))
        .ok_or_else(|| DashboardError::overflow("std_dev_risky"))?;
    let raw_weight = excess_return.checked_div(denominator).unwrap_or(Decimal::ZERO);

    Ok(RiskBasedAllocation {
        risk_aversion_index,
        risk_aversion_weight: raw_weight.max(Decimal::ZERO).min(Decimal::ONE),
    })
}
