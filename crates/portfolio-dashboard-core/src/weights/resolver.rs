use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::DashboardConfig;
use crate::quotes::QuoteSummary;
use crate::types::*;
use crate::weights::metadata::{find_ticker_meta, TickerMeta};

/// Security record with a precomputed complete-portfolio weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedSecurity {
    #[serde(rename = "Ticker")]
    pub ticker: String,
    #[serde(rename = "completeWeight", alias = "complete_weight")]
    pub complete_weight: Weight,
    #[serde(rename = "Type")]
    pub asset_type: AssetType,
}

/// Final weight and classification of a ticker in the complete portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerWeight {
    pub weight: Weight,
    pub asset_type: AssetType,
}

pub type TickerWeights = BTreeMap<String, TickerWeight>;

/// Target class allocations used by the fallback derivation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationTargets {
    pub equity_weight: Weight,
    pub bond_weight: Weight,
    pub fixed_optimal_weight: Weight,
}

impl From<&DashboardConfig> for AllocationTargets {
    fn from(cfg: &DashboardConfig) -> Self {
        AllocationTargets {
            equity_weight: cfg.equity_weight,
            bond_weight: cfg.bond_weight,
            fixed_optimal_weight: cfg.fixed_optimal_weight,
        }
    }
}

/// Raw weight sums per asset class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetClassTotals {
    pub equity_total: Weight,
    pub bond_total: Weight,
    pub equity_tickers: Vec<String>,
    pub bond_tickers: Vec<String>,
}

/// Intermediate weights for one ticker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickerWeightBreakdown {
    /// Share of its own asset class
    pub asset_class_weight: Weight,
    /// Share of the risky sleeve
    pub risky_weight: Weight,
    /// Share of total investable capital
    pub complete_weight: Weight,
}

/// Sum raw weights by the summary's own classification (unclassified
/// counts as equity). Classes other than Equity and Bond are not totalled.
pub fn calculate_asset_class_totals(summaries: &BTreeMap<String, QuoteSummary>) -> AssetClassTotals {
    let mut totals = AssetClassTotals::default();
    for (ticker, summary) in summaries {
        match summary.asset_type.unwrap_or_default() {
            AssetType::Equity => {
                totals.equity_total += summary.weight;
                totals.equity_tickers.push(ticker.clone());
            }
            AssetType::Bond => {
                totals.bond_total += summary.weight;
                totals.bond_tickers.push(ticker.clone());
            }
            _ => {}
        }
    }
    totals
}

/// Normalise within the asset class, then scale by the class target and the
/// risky/complete factor. Every non-equity class uses the bond bucket.
pub fn calculate_ticker_weights(
    raw_weight: Weight,
    asset_type: AssetType,
    totals: &AssetClassTotals,
    targets: &AllocationTargets,
) -> TickerWeightBreakdown {
    let (class_total, class_target) = if asset_type == AssetType::Equity {
        (totals.equity_total, targets.equity_weight)
    } else {
        (totals.bond_total, targets.bond_weight)
    };

    let asset_class_weight = if class_total > Decimal::ZERO {
        raw_weight / class_total
    } else {
        Decimal::ZERO
    };
    let risky_weight = asset_class_weight * class_target;
    let complete_weight = risky_weight * targets.fixed_optimal_weight;

    TickerWeightBreakdown {
        asset_class_weight,
        risky_weight,
        complete_weight,
    }
}

/// Determine each priced ticker's complete-portfolio weight and type.
///
/// Enriched securities are authoritative when present; otherwise weights
/// are derived from the quote summaries and holdings metadata. Tickers
/// without a summary (enriched path) or with a non-positive first/last
/// price (fallback path) are left out.
pub fn resolve_ticker_weights(
    enriched: Option<&[EnrichedSecurity]>,
    summaries: &BTreeMap<String, QuoteSummary>,
    equity_tickers: &[TickerMeta],
    targets: &AllocationTargets,
) -> TickerWeights {
    let mut weights = TickerWeights::new();

    if let Some(securities) = enriched.filter(|s| !s.is_empty()) {
        for security in securities {
            if !summaries.contains_key(&security.ticker) {
                debug!(ticker = %security.ticker, "enriched security has no quotes");
                continue;
            }
            weights.insert(
                security.ticker.clone(),
                TickerWeight {
                    weight: security.complete_weight,
                    asset_type: security.asset_type,
                },
            );
        }
        return weights;
    }

    let totals = calculate_asset_class_totals(summaries);
    for (ticker, summary) in summaries {
        if !summary.has_valid_prices() {
            warn!(%ticker, "dropping ticker with non-positive first/last price");
            continue;
        }
        let asset_type = find_ticker_meta(equity_tickers, ticker)
            .and_then(|m| m.asset_type)
            .or(summary.asset_type)
            .unwrap_or_default();
        let breakdown = calculate_ticker_weights(summary.weight, asset_type, &totals, targets);
        weights.insert(
            ticker.clone(),
            TickerWeight {
                weight: breakdown.complete_weight,
                asset_type,
            },
        );
    }
    weights
}
