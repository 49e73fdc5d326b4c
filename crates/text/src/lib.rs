//! # `agritrust-text`: JSON/Text Extraction Plugin
//!
//! Sensor extraction and transaction scanning for JSON documents (`.json`, and
//! `.txt` files holding JSON). Unlike the tabular formats, a JSON document may
//! nest readings arbitrarily deep, so every operation here is a recursive walk.

mod json;
mod location;
mod statement;

pub use json::JsonExtractor;
pub use location::extract_location;
pub use statement::JsonTransactionScanner;

use serde_json::Value;

/// A leaf's numeric reading. Booleans are not numbers here.
pub(crate) fn leaf_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}
