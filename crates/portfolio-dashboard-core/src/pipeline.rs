use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::config::DashboardConfig;
use crate::error::DashboardError;
use crate::quotes::{summarize_rows, PriceIndex, QuoteTable};
use crate::timeseries::{calculate_chart_metrics, reconstruct_portfolio, ChartMetrics, Holding, PortfolioPoint};
use crate::types::*;
use crate::weights::{resolve_ticker_weights, AllocationTargets, EnrichedSecurity, TickerMeta, TickerWeights};
use crate::DashboardResult;

/// Everything the value chart needs from its host page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioChartInput {
    pub quotes: QuoteTable,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enriched_securities: Option<Vec<EnrichedSecurity>>,
    #[serde(default)]
    pub equity_tickers: Vec<TickerMeta>,
    #[serde(default)]
    pub config: DashboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioChart {
    pub earliest_date: NaiveDate,
    pub weights: TickerWeights,
    pub holdings: Vec<Holding>,
    pub series: Vec<PortfolioPoint>,
    pub metrics: ChartMetrics,
}

/// Quotes → price index → weights → value series → metrics.
///
/// Fails with `NoData` when the quote columns are missing or no ticker
/// ends up weighted, `NoCompleteDate` when the holdings never trade on a
/// common day, and `InsufficientData` when the series comes out empty.
pub fn build_portfolio_chart(
    input: &PortfolioChartInput,
) -> DashboardResult<ComputationOutput<PortfolioChart>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.config.validate()?;
    let rows = input.quotes.rows()?;

    let summaries = summarize_rows(&rows, &input.equity_tickers);
    let targets = AllocationTargets::from(&input.config);
    let weights = resolve_ticker_weights(
        input.enriched_securities.as_deref(),
        &summaries,
        &input.equity_tickers,
        &targets,
    );
    if weights.is_empty() {
        return Err(DashboardError::NoData(
            "No ticker could be weighted from the supplied quotes".into(),
        ));
    }
    if let Some(securities) = input.enriched_securities.as_deref() {
        for s in securities.iter().filter(|s| !weights.contains_key(&s.ticker)) {
            warnings.push(format!("{} has no quotes and was left out", s.ticker));
        }
    }

    let total_weight: Weight = weights.values().map(|w| w.weight).sum();
    if total_weight != Decimal::ONE {
        warnings.push(format!("Complete weights sum to {total_weight}, not 1"));
    }

    let index = PriceIndex::from_rows(&rows);
    let reconstruction = reconstruct_portfolio(&index, &weights, input.config.investment_amount)?;
    let metrics = calculate_chart_metrics(&reconstruction.series, &input.config.style)?;
    debug!(
        total_return = %metrics.total_return,
        tickers = weights.len(),
        "portfolio chart ready"
    );

    let output = PortfolioChart {
        earliest_date: reconstruction.earliest_date,
        weights,
        holdings: reconstruction.holdings,
        series: reconstruction.series,
        metrics,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Buy-and-hold portfolio value from earliest complete date",
        &serde_json::json!({
            "investment_amount": input.config.investment_amount.to_string(),
            "equity_weight": input.config.equity_weight.to_string(),
            "bond_weight": input.config.bond_weight.to_string(),
            "fixed_optimal_weight": input.config.fixed_optimal_weight.to_string(),
            "weight_source": if input.enriched_securities.as_ref().is_some_and(|s| !s.is_empty()) {
                "enriched_securities"
            } else {
                "asset_class_normalisation"
            },
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_missing_columns_short_circuit() {
        let input = PortfolioChartInput::default();
        let err = build_portfolio_chart(&input).unwrap_err();
        assert!(err.is_no_data());
    }

    #[test]
    fn test_fallback_weights_end_to_end() {
        let quotes = QuoteTable::from_rows(vec![
            ("2024-01-01", "EQ", Some(dec!(100))),
            ("2024-01-02", "EQ", Some(dec!(120))),
            ("2024-01-01", "BD", Some(dec!(50))),
            ("2024-01-02", "BD", Some(dec!(50))),
        ])
        .with_types(vec![Some("Equity"), Some("Equity"), Some("Bond"), Some("Bond")]);
        let input = PortfolioChartInput {
            quotes,
            enriched_securities: None,
            equity_tickers: vec![],
            config: DashboardConfig {
                investment_amount: dec!(1000),
                ..Default::default()
            },
        };
        let out = build_portfolio_chart(&input).unwrap();
        let chart = out.result;
        // 600 in EQ (+20%), 400 in BD (flat)
        assert_eq!(chart.series[1].value, dec!(1120));
        assert_eq!(chart.metrics.total_return, dec!(0.12));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_unparsable_dates_dropped_before_weighting() {
        let quotes = QuoteTable::from_rows(vec![
            ("2024-01-01", "A", Some(dec!(100))),
            ("not a date", "A", Some(dec!(1))),
            ("2024-01-02", "A", Some(dec!(110))),
        ]);
        let rows = quotes.rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            summarize_rows(&rows, &[]),
            crate::quotes::summarize_quotes(&quotes, &[]).unwrap()
        );

        let input = PortfolioChartInput {
            quotes,
            config: DashboardConfig {
                investment_amount: dec!(1000),
                ..Default::default()
            },
            ..Default::default()
        };
        let chart = build_portfolio_chart(&input).unwrap().result;
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.metrics.total_return, dec!(0.1));
    }

    #[test]
    fn test_nothing_weighted_is_no_data() {
        let quotes = QuoteTable::from_rows(vec![("2024-01-01", "A", Some(dec!(100)))]);
        let input = PortfolioChartInput {
            quotes,
            enriched_securities: Some(vec![EnrichedSecurity {
                ticker: "ZZZ".into(),
                complete_weight: dec!(1),
                asset_type: AssetType::Equity,
            }]),
            ..Default::default()
        };
        assert!(build_portfolio_chart(&input).unwrap_err().is_no_data());
    }
}
