use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;
use crate::types::*;
use crate::DashboardResult;

/// Scalar parameters shared by the chart pipeline and the allocation tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Initial capital invested at the earliest complete date
    pub investment_amount: Money,
    /// Target equity share of the risky sleeve
    pub equity_weight: Weight,
    /// Target bond share of the risky sleeve
    pub bond_weight: Weight,
    /// Scaling from risky sleeve to complete portfolio
    pub fixed_optimal_weight: Weight,
    pub risk_free_rate: Rate,
    /// Market view, 0 to 100
    pub market_view: Decimal,
    /// Investor risk score, 0 to 100
    pub risk_score: Decimal,
    pub style: ChartStyle,
    pub format: FormatConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            investment_amount: dec!(10000),
            equity_weight: dec!(0.6),
            bond_weight: dec!(0.4),
            fixed_optimal_weight: Decimal::ONE,
            risk_free_rate: dec!(0.04),
            market_view: dec!(50),
            risk_score: dec!(50),
            style: ChartStyle::default(),
            format: FormatConfig::default(),
        }
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> DashboardResult<()> {
        if self.investment_amount <= Decimal::ZERO {
            return Err(DashboardError::invalid(
                "investment_amount",
                "Must be positive",
            ));
        }
        for (field, value) in [
            ("equity_weight", self.equity_weight),
            ("bond_weight", self.bond_weight),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(DashboardError::invalid(field, "Must be between 0 and 1"));
            }
        }
        if self.fixed_optimal_weight < Decimal::ZERO {
            return Err(DashboardError::invalid(
                "fixed_optimal_weight",
                "Cannot be negative",
            ));
        }
        for (field, value) in [
            ("market_view", self.market_view),
            ("risk_score", self.risk_score),
        ] {
            if value < Decimal::ZERO || value > dec!(100) {
                return Err(DashboardError::invalid(field, "Must be between 0 and 100"));
            }
        }
        Ok(())
    }
}

/// Visual options handed through to the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    pub base_font_size: u32,
    pub label_font_size: u32,
    pub value_font_size: u32,
    pub title_font_size: u32,
    pub tooltip_font_size: u32,
    /// Line/area colour when total return is non-negative
    pub positive_color: String,
    /// Line/area colour when total return is negative
    pub negative_color: String,
    pub initial_line_color: String,
    /// Multiplier applied to the y-axis upper bound
    pub headroom: Decimal,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            base_font_size: 12,
            label_font_size: 12,
            value_font_size: 12,
            title_font_size: 14,
            tooltip_font_size: 14,
            positive_color: "#28a745".into(),
            negative_color: "#dc3545".into(),
            initial_line_color: "#0b3040".into(),
            headroom: dec!(1.05),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    pub currency_symbol: String,
    pub currency_decimals: u32,
    pub percent_decimals: u32,
    pub number_decimals: u32,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "$".into(),
            currency_decimals: 0,
            percent_decimals: 2,
            number_decimals: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(DashboardConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: DashboardConfig =
            serde_json::from_str(r#"{"investment_amount": "1000", "style": {"headroom": "1.10"}}"#)
                .unwrap();
        assert_eq!(cfg.investment_amount, dec!(1000));
        assert_eq!(cfg.equity_weight, dec!(0.6));
        assert_eq!(cfg.style.headroom, dec!(1.10));
        assert_eq!(cfg.style.positive_color, "#28a745");
        assert_eq!(cfg.format.currency_symbol, "$");
    }

    #[test]
    fn test_rejects_non_positive_investment() {
        let cfg = DashboardConfig {
            investment_amount: Decimal::ZERO,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_risk_score() {
        let cfg = DashboardConfig {
            risk_score: dec!(101),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
