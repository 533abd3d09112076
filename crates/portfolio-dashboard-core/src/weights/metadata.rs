use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Weight as listed in the holdings sheet: either a fraction or a
/// percentage string such as `"12.5%"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TickerWeightValue {
    /// Strings are always read as percentages.
    Percent(String),
    Fraction(Decimal),
}

impl TickerWeightValue {
    /// Resolve to a fraction. Unparsable percentages fall back to 1.
    pub fn as_fraction(&self) -> Weight {
        match self {
            TickerWeightValue::Fraction(w) => *w,
            TickerWeightValue::Percent(raw) => raw
                .trim()
                .trim_end_matches('%')
                .trim()
                .parse::<Decimal>()
                .map(|pct| pct / Decimal::ONE_HUNDRED)
                .unwrap_or(Decimal::ONE),
        }
    }
}

/// Holdings-sheet entry for a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerMeta {
    #[serde(rename = "Ticker")]
    pub ticker: String,
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<AssetType>,
    #[serde(rename = "Weight", default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<TickerWeightValue>,
}

impl TickerMeta {
    pub fn raw_weight(&self) -> Weight {
        self.weight
            .as_ref()
            .map(TickerWeightValue::as_fraction)
            .unwrap_or(Decimal::ONE)
    }
}

/// First entry for `ticker`, matching the sheet's lookup order.
pub fn find_ticker_meta<'a>(metas: &'a [TickerMeta], ticker: &str) -> Option<&'a TickerMeta> {
    metas.iter().find(|m| m.ticker == ticker)
}
