use super::types::{Extraction, TransactionTally};
use crate::errors::ExtractError;
use std::path::Path;

/// Absolute amounts at or below this value count as small transactions.
pub const DEFAULT_SMALL_TRANSACTION_THRESHOLD: f64 = 500.0;

/// The contract for a sensor/soil report extractor.
///
/// Each format plugin (tabular, JSON, PDF) implements this trait. Extraction is
/// synchronous and side-effect free: running it twice on the same file yields
/// the same [`Extraction`]. Network lookups for the location happen later, in
/// [`crate::resolve_location`].
pub trait SensorExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<Extraction, ExtractError>;
}

/// The contract for a bank-statement scanner.
///
/// Scanners never fail: unreadable or corrupt statements produce an empty
/// tally, and rows whose amount does not parse are skipped.
pub trait TransactionScanner: Send + Sync {
    fn scan(&self, path: &Path, threshold: f64) -> TransactionTally;
}
