use serde_json::Value;

use super::{result_of, scalar_text};

/// Headline value of each command, as JSON pointers into the result.
const PRIORITY_PATHS: &[&str] = &[
    "/metrics/total_return",
    "/optimal_weight",
    "/equity_weight",
    "/risk_aversion_weight",
    "/utility",
    "/std_dev",
    "/totals",
];

/// Print just the key answer of a command.
pub fn print_minimal(value: &Value) {
    let result = result_of(value);

    for path in PRIORITY_PATHS {
        if let Some(val) = result.pointer(path) {
            if !val.is_null() {
                println!("{}", format_minimal(val));
                return;
            }
        }
    }

    if let Value::Object(map) = result {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }
    println!("{}", format_minimal(result));
}

fn format_minimal(value: &Value) -> String {
    // last point of a series is the interesting one
    if let Value::Array(items) = value {
        if let Some(last) = items.last() {
            if let Some(v) = last.get("value") {
                return scalar_text(v, "null");
            }
        }
    }
    scalar_text(value, "null")
}
