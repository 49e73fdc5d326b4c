use crate::text::decode_lossy;
use agritrust::extract::{parse_amount, TransactionScanner, TransactionTally};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, instrument, warn};

/// An amount with an optional rupee marker (`₹`, `Rs`, `Rs.`, `INR`).
static CURRENCY_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:₹\s*|Rs\.?\s*|INR\s*)?(-?\d{1,3}(?:,\d{3})*(?:\.\d+)?|-?\d+(?:\.\d+)?)")
        .expect("static regex")
});

/// Counts every currency-like number in a statement's decoded bytes.
///
/// No PDF parsing happens here; statements are scanned as raw text, so
/// numbers from the document structure itself are counted too.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTransactionScanner;

impl PdfTransactionScanner {
    pub fn tally_text(text: &str, threshold: f64) -> TransactionTally {
        let mut tally = TransactionTally::default();
        for captures in CURRENCY_AMOUNT.captures_iter(text) {
            if let Some(amount) = captures.get(1).and_then(|m| parse_amount(m.as_str())) {
                tally.record(amount, threshold);
            }
        }
        tally
    }
}

impl TransactionScanner for PdfTransactionScanner {
    #[instrument(skip(self))]
    fn scan(&self, path: &Path, threshold: f64) -> TransactionTally {
        match std::fs::read(path) {
            Ok(data) => {
                let tally = Self::tally_text(&decode_lossy(&data), threshold);
                debug!(lines = tally.line_count(), "Scanned PDF statement.");
                tally
            }
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

    #[test]
    fn currency_amounts() {
        let tally = PdfTransactionScanner::tally_text(
            "Paid ₹ 1,250.50 to supplier; Rs.300 cash; INR 75 fee; refund -20",
            500.0,
        );
        assert_eq!(tally.line_count(), 4);
        assert_eq!(tally.small_count(), 3);
        assert_eq!(tally.total(), 1645.5);
    }

    #[test]
    fn text_without_numbers() {
        let tally = PdfTransactionScanner::tally_text("no transactions this month", 500.0);
        assert_eq!(tally, TransactionTally::default());
    }
}
