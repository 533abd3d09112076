use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::FormatConfig;
use crate::error::DashboardError;
use crate::DashboardResult;

fn round(value: Decimal, decimals: u32) -> Decimal {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    // never print "-0"
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

/// Fixed decimals with comma thousands separators: 1234567.891 → "1,234,567.89".
fn group_thousands(value: Decimal, decimals: u32) -> String {
    let rounded = round(value, decimals);
    let text = format!("{:.*}", decimals as usize, rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + int_part.len() / 3 + 1);
    if rounded.is_sign_negative() {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// "$1,234" with the configured symbol and currency decimals.
pub fn format_currency(value: Decimal, format: &FormatConfig) -> String {
    format!(
        "{}{}",
        format.currency_symbol,
        group_thousands(value, format.currency_decimals)
    )
}

/// "1,234.57"
pub fn format_number(value: Decimal, format: &FormatConfig) -> String {
    group_thousands(value, format.number_decimals)
}

/// Fraction to percentage: 0.2 → "20.00%". No thousands separators.
pub fn format_percent(value: Decimal, format: &FormatConfig) -> String {
    let pct = round(value * Decimal::ONE_HUNDRED, format.percent_decimals);
    format!("{:.*}%", format.percent_decimals as usize, pct)
}

/// Like [`format_percent`] but with an explicit "+" on non-negative values.
pub fn format_signed_percent(value: Decimal, format: &FormatConfig) -> String {
    let body = format_percent(value, format);
    if value >= Decimal::ZERO {
        format!("+{body}")
    } else {
        body
    }
}

/// Label a value by the first threshold it does not exceed, e.g.
/// "Moderate (50)". Values above every threshold take the last label.
pub fn categorize_value<S: AsRef<str>>(
    value: Decimal,
    thresholds: &[Decimal],
    labels: &[S],
) -> DashboardResult<String> {
    if thresholds.len() != labels.len() {
        return Err(DashboardError::invalid(
            "thresholds/labels",
            "Thresholds and labels must have the same length",
        ));
    }
    let Some(last) = labels.last() else {
        return Err(DashboardError::invalid("labels", "At least one label is required"));
    };

    let label = thresholds
        .iter()
        .zip(labels)
        .find(|(threshold, _)| value <= **threshold)
        .map(|(_, label)| label)
        .unwrap_or(last);
    Ok(format!("{} ({})", label.as_ref(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_default() {
        let f = FormatConfig::default();
        assert_eq!(format_currency(dec!(1000), &f), "$1,000");
        assert_eq!(format_currency(dec!(1234567.5), &f), "$1,234,568");
        assert_eq!(format_currency(dec!(999), &f), "$999");
        assert_eq!(format_currency(dec!(-2500), &f), "$-2,500");
    }

    #[test]
    fn test_currency_custom_symbol_and_decimals() {
        let f = FormatConfig {
            currency_symbol: "€".into(),
            currency_decimals: 2,
            ..Default::default()
        };
        assert_eq!(format_currency(dec!(1234.5), &f), "€1,234.50");
    }

    #[test]
    fn test_number() {
        let f = FormatConfig::default();
        assert_eq!(format_number(dec!(1234567.891), &f), "1,234,567.89");
        assert_eq!(format_number(dec!(0.005), &f), "0.01");
        assert_eq!(format_number(dec!(-0.001), &f), "0.00");
    }

    #[test]
    fn test_percent() {
        let f = FormatConfig::default();
        assert_eq!(format_percent(dec!(0.2), &f), "20.00%");
        assert_eq!(format_percent(dec!(-0.0525), &f), "-5.25%");
        assert_eq!(format_signed_percent(dec!(0.2), &f), "+20.00%");
        assert_eq!(format_signed_percent(Decimal::ZERO, &f), "+0.00%");
        assert_eq!(format_signed_percent(dec!(-0.1), &f), "-10.00%");
    }

    #[test]
    fn test_categorize_value() {
        let thresholds = [dec!(25), dec!(50), dec!(75), dec!(100)];
        let labels = ["Cautious", "Moderate", "Growth", "Aggressive"];
        assert_eq!(
            categorize_value(dec!(50), &thresholds, &labels).unwrap(),
            "Moderate (50)"
        );
        assert_eq!(
            categorize_value(dec!(10), &thresholds, &labels).unwrap(),
            "Cautious (10)"
        );
        assert_eq!(
            categorize_value(dec!(150), &thresholds, &labels).unwrap(),
            "Aggressive (150)"
        );
    }

    #[test]
    fn test_categorize_value_mismatched_lengths() {
        let err = categorize_value(dec!(1), &[dec!(1), dec!(2)], &["a"]).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidInput { .. }));
        let empty: [&str; 0] = [];
        assert!(categorize_value(dec!(1), &[], &empty).is_err());
    }
}
