//! # Extraction Contracts
//!
//! The intermediate representation every format plugin produces, the traits
//! they implement, and small parsing helpers shared between them.

pub mod traits;
pub mod types;

pub use traits::{SensorExtractor, TransactionScanner, DEFAULT_SMALL_TRANSACTION_THRESHOLD};
pub use types::{
    AddressValue, Coordinates, Extraction, FileKind, Location, TransactionTally,
};

use serde_json::Value;

/// Parses a trimmed decimal string. Non-finite results count as unparseable.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parses a monetary amount, ignoring `,` digit grouping.
pub fn parse_amount(raw: &str) -> Option<f64> {
    parse_number(&raw.replace(',', ""))
}

/// Reads a coordinate from a JSON number or numeric string.
pub fn coordinate_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_numbers_and_amounts() {
        assert_eq!(parse_number(" 6.8 "), Some(6.8));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_amount("1,250.50"), Some(1250.5));
        assert_eq!(parse_amount("-300"), Some(-300.0));
    }

    #[test]
    fn coordinates_from_json() {
        assert_eq!(coordinate_from_value(&json!(18.52)), Some(18.52));
        assert_eq!(coordinate_from_value(&json!("73.85")), Some(73.85));
        assert_eq!(coordinate_from_value(&json!("north")), None);
        assert_eq!(coordinate_from_value(&json!(null)), None);
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(0.8333, 2), 0.83);
        assert_eq!(round_to(12.25, 1), 12.3);
    }
}
