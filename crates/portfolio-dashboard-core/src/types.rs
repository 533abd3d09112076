use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Closing prices as quoted by the data feed.
pub type Price = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Fraction of capital (0.25 = 25% of the portfolio).
pub type Weight = Decimal;

/// Year fractions
pub type Years = Decimal;

/// Asset-class classification of a holding.
///
/// The feed spells the risk-free class with either an ASCII hyphen or a
/// non-breaking hyphen (U+2011); both deserialize to `RiskFree`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetType {
    #[default]
    Equity,
    Bond,
    #[serde(
        rename = "Risk-Free",
        alias = "Risk\u{2011}Free",
        alias = "RiskFree",
        alias = "Risk Free"
    )]
    RiskFree,
    #[serde(other)]
    Other,
}

impl AssetType {
    /// Lenient parse used for free-form classification columns.
    pub fn parse(label: &str) -> Self {
        match label.trim() {
            "Equity" => AssetType::Equity,
            "Bond" => AssetType::Bond,
            "Risk-Free" | "Risk\u{2011}Free" | "RiskFree" | "Risk Free" => AssetType::RiskFree,
            _ => AssetType::Other,
        }
    }

    pub fn is_risk_free(&self) -> bool {
        matches!(self, AssetType::RiskFree)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AssetType::Equity => "Equity",
            AssetType::Bond => "Bond",
            AssetType::RiskFree => "Risk-Free",
            AssetType::Other => "Other",
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_type_accepts_both_hyphens() {
        let ascii: AssetType = serde_json::from_str("\"Risk-Free\"").unwrap();
        let nb: AssetType = serde_json::from_str("\"Risk\u{2011}Free\"").unwrap();
        assert_eq!(ascii, AssetType::RiskFree);
        assert_eq!(nb, AssetType::RiskFree);
        assert_eq!(AssetType::parse("Risk\u{2011}Free"), AssetType::RiskFree);
    }

    #[test]
    fn test_unknown_asset_type_is_other() {
        let t: AssetType = serde_json::from_str("\"Commodity\"").unwrap();
        assert_eq!(t, AssetType::Other);
        assert_eq!(AssetType::parse("Portfolio"), AssetType::Other);
    }

    #[test]
    fn test_risk_free_serializes_with_ascii_hyphen() {
        let s = serde_json::to_string(&AssetType::RiskFree).unwrap();
        assert_eq!(s, "\"Risk-Free\"");
    }
}
