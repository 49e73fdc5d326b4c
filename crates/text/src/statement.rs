use crate::leaf_number;
use agritrust::extract::{parse_amount, TransactionScanner, TransactionTally};
use serde_json::Value;
use std::path::Path;
use tracing::{instrument, warn};

const AMOUNT_KEYS: [&str; 4] = ["amount", "amt", "debit", "credit"];

/// Counts every amount-like field, at any depth, of a JSON statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTransactionScanner;

impl JsonTransactionScanner {
    /// Tallies an already-decoded statement.
    pub fn tally_value(document: &Value, threshold: f64) -> TransactionTally {
        let mut tally = TransactionTally::default();
        walk(document, threshold, &mut tally);
        tally
    }
}

fn amount_of(value: &Value) -> Option<Option<f64>> {
    match value {
        Value::Number(_) => Some(leaf_number(value)),
        Value::String(s) => Some(parse_amount(s)),
        _ => None,
    }
}

fn walk(node: &Value, threshold: f64, tally: &mut TransactionTally) {
    match node {
        Value::Object(map) => {
            for (key, value) in map {
                let is_amount_key = AMOUNT_KEYS.contains(&key.to_lowercase().as_str());
                match amount_of(value) {
                    Some(amount) if is_amount_key => {
                        if let Some(amount) = amount {
                            tally.record(amount, threshold);
                        }
                    }
                    _ => walk(value, threshold, tally),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                walk(item, threshold, tally);
            }
        }
        _ => {}
    }
}

impl TransactionScanner for JsonTransactionScanner {
    #[instrument(skip(self))]
    fn scan(&self, path: &Path, threshold: f64) -> TransactionTally {
        let document = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|content| serde_json::from_str::<Value>(&content).map_err(|e| e.to_string()));
        match document {
            Ok(document) => Self::tally_value(&document, threshold),
            Err(e) => {
                warn!("Could not read statement, reporting no activity: {e}");
                TransactionTally::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finds_amounts_at_any_depth() {
        let doc = json!({
            "account": "XX01",
            "transactions": [
                {"Amount": 120.5, "memo": "seeds"},
                {"debit": "2,000"},
                {"credit": "n/a"},
                {"amt": {"value": 10}},
                {"AMT": true}
            ],
            "summary": {"credit": -450}
        });

        let tally = JsonTransactionScanner::tally_value(&doc, 500.0);

        assert_eq!(tally.line_count(), 3);
        assert_eq!(tally.small_count(), 2);
        assert_eq!(tally.total(), 2570.5);
    }
}
