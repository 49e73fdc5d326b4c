//! # Shared Extraction Types

use crate::metrics::MetricsTriple;
use serde::Serialize;
use serde_json::Value;

/// The source formats the pipeline accepts, selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Spreadsheet,
    Json,
    Pdf,
}

impl FileKind {
    pub const ACCEPTED_EXTENSIONS: [&'static str; 8] = [
        ".csv", ".xlsx", ".xlsm", ".xltx", ".xltm", ".json", ".txt", ".pdf",
    ];

    /// Maps an extension (with or without the leading dot, any case) to a kind.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(FileKind::Csv),
            "xlsx" | "xlsm" | "xltx" | "xltm" => Some(FileKind::Spreadsheet),
            "json" | "txt" => Some(FileKind::Json),
            "pdf" => Some(FileKind::Pdf),
            _ => None,
        }
    }
}

/// A location as found in a document: free text or an opaque structured value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AddressValue {
    Text(String),
    Structured(Value),
}

impl AddressValue {
    /// The address as geocodable text, if it is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AddressValue::Text(s) => Some(s.as_str()),
            AddressValue::Structured(_) => None,
        }
    }

    /// The form persisted in the report row; structured values are JSON-serialized.
    pub fn to_storage_text(&self) -> String {
        match self {
            AddressValue::Text(s) => s.clone(),
            AddressValue::Structured(v) => v.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// An address with optional coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Location {
    pub address: Option<AddressValue>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl Location {
    pub fn from_address(address: impl Into<String>) -> Self {
        Self {
            address: Some(AddressValue::Text(address.into())),
            ..Default::default()
        }
    }

    pub fn has_coordinates(&self) -> bool {
        self.lat.is_some() && self.lon.is_some()
    }
}

/// The common output of every sensor extractor.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub metrics: MetricsTriple,
    pub location: Location,
    /// The decoded document text, kept for diagnostics.
    pub raw_content: String,
    /// Every reading that survived normalization, each in `[0, 10]`.
    pub normalized: Vec<f64>,
    pub rainfall_total: Option<f64>,
}

/// Small-transaction statistics for one bank statement.
///
/// `small_count <= line_count` holds because both only change through [`TransactionTally::record`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransactionTally {
    small_count: usize,
    total: f64,
    line_count: usize,
}

impl TransactionTally {
    pub fn record(&mut self, amount: f64, threshold: f64) {
        if !amount.is_finite() {
            return;
        }
        let magnitude = amount.abs();
        self.total += magnitude;
        self.line_count += 1;
        if magnitude <= threshold {
            self.small_count += 1;
        }
    }

    pub fn small_count(&self) -> usize {
        self.small_count
    }

    /// Sum of absolute amounts.
    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn file_kind_by_extension() {
        assert_eq!(FileKind::from_extension(".CSV"), Some(FileKind::Csv));
        assert_eq!(FileKind::from_extension("xltm"), Some(FileKind::Spreadsheet));
        assert_eq!(FileKind::from_extension(".txt"), Some(FileKind::Json));
        assert_eq!(FileKind::from_extension(".docx"), None);
        for ext in FileKind::ACCEPTED_EXTENSIONS {
            assert!(FileKind::from_extension(ext).is_some(), "{ext}");
        }
    }

    #[test]
    fn tally_counts_small_transactions() {
        let mut tally = TransactionTally::default();
        tally.record(-120.0, 500.0);
        tally.record(500.0, 500.0);
        tally.record(1500.0, 500.0);
        tally.record(f64::NAN, 500.0);
        assert_eq!(tally.small_count(), 2);
        assert_eq!(tally.line_count(), 3);
        assert_eq!(tally.total(), 2120.0);
    }

    #[test]
    fn structured_address_is_stored_as_json() {
        let addr = AddressValue::Structured(json!({"village": "Kothrud"}));
        assert_eq!(addr.as_text(), None);
        assert_eq!(addr.to_storage_text(), r#"{"village":"Kothrud"}"#);
        assert_eq!(
            serde_json::to_value(AddressValue::Text("Pune".into())).unwrap(),
            json!("Pune")
        );
    }
}
