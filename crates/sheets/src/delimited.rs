use crate::{tabular::TableWalk, SheetError};
use agritrust::extract::{
    parse_amount, parse_number, Extraction, SensorExtractor, TransactionScanner, TransactionTally,
};
use agritrust::{ExtractError, MetricsPolicy};
use std::path::Path;
use tracing::{debug, instrument, warn};

/// Header spellings of the amount column, in lookup order.
const AMOUNT_HEADERS: [&str; 3] = ["amount", "Amount", "AMOUNT"];

fn reader(content: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes())
}

/// Reads a sensor report laid out as a header row followed by readings.
#[derive(Debug, Clone, Default)]
pub struct CsvExtractor {
    policy: MetricsPolicy,
}

impl CsvExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: MetricsPolicy) -> Self {
        Self { policy }
    }

    fn walk(&self, content: &str) -> Result<TableWalk, SheetError> {
        let mut walk = TableWalk::new(self.policy);
        let mut reader = reader(content);
        let headers = reader.headers()?.clone();

        for (index, record) in reader.records().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    debug!(row = index + 1, "Skipping unreadable CSV row: {e}");
                    continue;
                }
            };
            for (header, field) in headers.iter().zip(record.iter()) {
                if let Some(value) = parse_number(field) {
                    walk.cell(header, value);
                }
            }
        }
        Ok(walk)
    }
}

impl SensorExtractor for CsvExtractor {
    #[instrument(skip(self), fields(policy = ?self.policy))]
    fn extract(&self, path: &Path) -> Result<Extraction, ExtractError> {
        let bytes = std::fs::read(path)?;
        let content = String::from_utf8_lossy(&bytes).into_owned();
        let walk = self.walk(&content)?;
        Ok(walk.finish(content))
    }
}

/// Counts transactions in a statement CSV with an `amount` column.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvTransactionScanner;

impl CsvTransactionScanner {
    fn tally(content: &str, threshold: f64) -> Result<TransactionTally, SheetError> {
        let mut tally = TransactionTally::default();
        let mut reader = reader(content);
        let headers = reader.headers()?.clone();
        let columns: Vec<usize> = AMOUNT_HEADERS
            .iter()
            .filter_map(|name| headers.iter().position(|h| h == *name))
            .collect();

        for record in reader.records().flatten() {
            let amount = columns
                .iter()
                .filter_map(|&column| record.get(column))
                .find(|field| !field.is_empty());
            if let Some(amount) = amount.and_then(parse_amount) {
                tally.record(amount, threshold);
            }
        }
        Ok(tally)
    }
}

impl TransactionScanner for CsvTransactionScanner {
    #[instrument(skip(self))]
    fn scan(&self, path: &Path, threshold: f64) -> TransactionTally {
        let content = match std::fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!("Could not read statement, reporting no activity: {e}");
                return TransactionTally::default();
            }
        };
        Self::tally(&content, threshold).unwrap_or_else(|e| {
            warn!("Could not parse statement, reporting no activity: {e}");
            TransactionTally::default()
        })
    }
}
