use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;
use crate::types::*;
use crate::DashboardResult;

/// Expected return and volatility of a blended position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioStats {
    pub expected_return: Rate,
    pub std_dev: Rate,
}

/// Equity/bond pair to be combined into one risky sleeve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskyPortfolioInput {
    pub equity_weight: Weight,
    pub equity_return: Rate,
    pub equity_std: Rate,
    pub bond_return: Rate,
    pub bond_std: Rate,
    pub correlation: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskyPortfolioMetrics {
    pub expected_return: Rate,
    pub std_dev: Rate,
    pub bond_weight: Weight,
}

/// Two-fund separation: mix the risky sleeve with a zero-variance
/// risk-free asset.
///
/// E[r] = w·E[r_risky] + (1 − w)·r_f, σ = w·σ_risky
pub fn two_asset_stats(
    weight_risky: Weight,
    expected_return_risky: Rate,
    std_dev_risky: Rate,
    risk_free_rate: Rate,
) -> DashboardResult<PortfolioStats> {
    if weight_risky < Decimal::ZERO || weight_risky > Decimal::ONE {
        return Err(DashboardError::invalid(
            "weight_risky",
            "Weight must be between 0 and 1",
        ));
    }
    if std_dev_risky < Decimal::ZERO {
        return Err(DashboardError::invalid(
            "std_dev_risky",
            "Standard deviation cannot be negative",
        ));
    }

    let weight_rf = Decimal::ONE - weight_risky;
    let expected_return =
        weighted_sum(weight_risky, expected_return_risky, weight_rf, risk_free_rate)
            .ok_or_else(|| DashboardError::overflow("expected_return_risky/risk_free_rate"))?;
    let std_dev = weight_risky
        .checked_mul(std_dev_risky)
        .ok_or_else(|| DashboardError::overflow("std_dev_risky"))?;
    Ok(PortfolioStats {
        expected_return,
        std_dev,
    })
}

/// Mean-variance utility: U = E[r] − ½·A·σ²
pub fn utility(expected_return: Rate, std_dev: Rate, risk_aversion: Decimal) -> DashboardResult<Decimal> {
    if std_dev < Decimal::ZERO {
        return Err(DashboardError::invalid(
            "std_dev",
            "Standard deviation cannot be negative",
        ));
    }
    if risk_aversion < Decimal::ZERO {
        return Err(DashboardError::invalid(
            "risk_aversion",
            "Risk aversion cannot be negative",
        ));
    }
    dec!(0.5)
        .checked_mul(risk_aversion)
        .and_then(|v| v.checked_mul(std_dev))
        .and_then(|v| v.checked_mul(std_dev))
        .and_then(|penalty| expected_return.checked_sub(penalty))
        .ok_or_else(|| DashboardError::overflow("std_dev/risk_aversion"))
}

/// Combine equity and bond into the risky sleeve.
pub fn risky_portfolio_metrics(input: &RiskyPortfolioInput) -> DashboardResult<RiskyPortfolioMetrics> {
    if input.equity_weight < Decimal::ZERO || input.equity_weight > Decimal::ONE {
        return Err(DashboardError::invalid(
            "equity_weight",
            "Equity weight must be between 0 and 1",
        ));
    }
    if input.equity_std < Decimal::ZERO || input.bond_std < Decimal::ZERO {
        return Err(DashboardError::invalid(
            "equity_std/bond_std",
            "Standard deviations cannot be negative",
        ));
    }
    validate_correlation(input.correlation)?;

    let bond_weight = Decimal::ONE - input.equity_weight;
    let expected_return = weighted_sum(
        input.equity_weight,
        input.equity_return,
        bond_weight,
        input.bond_return,
    )
    .ok_or_else(|| DashboardError::overflow("equity_return/bond_return"))?;
    let std_dev = two_asset_std_dev(
        input.equity_weight,
        input.equity_std,
        input.bond_std,
        input.correlation,
    )
    .ok_or_else(|| DashboardError::overflow("equity_std/bond_std"))?;
    Ok(RiskyPortfolioMetrics {
        expected_return,
        std_dev,
        bond_weight,
    })
}

pub(crate) fn validate_correlation(correlation: Decimal) -> DashboardResult<()> {
    if correlation < -Decimal::ONE || correlation > Decimal::ONE {
        return Err(DashboardError::invalid(
            "correlation",
            "Correlation must be between -1 and 1",
        ));
    }
    Ok(())
}

/// wa·a + wb·b, `None` on overflow.
pub(crate) fn weighted_sum(wa: Weight, a: Decimal, wb: Weight, b: Decimal) -> Option<Decimal> {
    wa.checked_mul(a)?.checked_add(wb.checked_mul(b)?)
}

/// σ = sqrt(w²σe² + (1−w)²σb² + 2w(1−w)σeσbρ), `None` when the variance
/// overflows.
pub(crate) fn two_asset_std_dev(
    w: Weight,
    std_a: Rate,
    std_b: Rate,
    correlation: Decimal,
) -> Option<Rate> {
    let wb = Decimal::ONE - w;
    let term_a = w.checked_mul(std_a)?.checked_mul(w.checked_mul(std_a)?)?;
    let term_b = wb.checked_mul(std_b)?.checked_mul(wb.checked_mul(std_b)?)?;
    let cross = dec!(2)
        .checked_mul(w.checked_mul(std_a)?)?
        .checked_mul(wb.checked_mul(std_b)?)?
        .checked_mul(correlation)?;
    let variance = term_a.checked_add(term_b)?.checked_add(cross)?;
    // rounding can leave a perfectly hedged pair a hair below zero
    if variance <= Decimal::ZERO {
        return Some(Decimal::ZERO);
    }
    variance.sqrt()
}
