use crate::{tabular::TableWalk, SheetError};
use agritrust::extract::{
    parse_amount, parse_number, Extraction, SensorExtractor, TransactionScanner, TransactionTally,
};
use agritrust::{ExtractError, MetricsPolicy};
use calamine::{open_workbook_auto, Data, DataType, Range, Reader};
use std::path::Path;
use tracing::{instrument, warn};

/// Opens the first worksheet of the workbook at `path`.
fn first_sheet(path: &Path) -> Result<Range<Data>, SheetError> {
    let mut workbook = open_workbook_auto(path)?;
    workbook
        .worksheet_range_at(0)
        .ok_or(SheetError::NoWorksheet)?
        .map_err(SheetError::from)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Bool(b) => b.to_string(),
        other => other.as_string().unwrap_or_else(|| other.to_string()),
    }
}

/// The header cells of a sheet and the number of leading range rows they
/// occupy.
///
/// calamine trims leading empty rows from a range, so a range starting below
/// the first worksheet row means that row was empty. It is still the header
/// row: every column gets a blank header and all range rows are data.
fn sheet_header(range: &Range<Data>) -> (Vec<String>, usize) {
    match range.start() {
        Some((0, _)) => {
            let headers = range
                .rows()
                .next()
                .map(|row| row.iter().map(cell_text).collect())
                .unwrap_or_default();
            (headers, 1)
        }
        Some(_) => (vec![String::new(); range.width()], 0),
        None => (Vec::new(), 0),
    }
}

/// A cell's numeric reading. Booleans count as 0 or 1.
fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f).filter(|v| v.is_finite()),
        Data::Int(i) => Some(*i as f64),
        Data::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Data::String(s) => parse_number(s),
        _ => None,
    }
}

fn cell_amount(cell: &Data) -> Option<f64> {
    match cell {
        Data::String(s) => parse_amount(s),
        Data::Float(_) | Data::Int(_) => cell_number(cell),
        _ => None,
    }
}

/// Whether a lower-cased header names a transaction amount column.
fn is_amount_header(header: &str) -> bool {
    header.contains("amount") || header.contains("amt") || header == "debit" || header == "credit"
}

/// Reads the first worksheet of an Excel workbook.
///
/// Row 0 is always taken as the header row, even when it holds data or is
/// empty.
#[derive(Debug, Clone, Default)]
pub struct XlsxExtractor {
    policy: MetricsPolicy,
}

impl XlsxExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: MetricsPolicy) -> Self {
        Self { policy }
    }
}

impl SensorExtractor for XlsxExtractor {
    #[instrument(skip(self), fields(policy = ?self.policy))]
    fn extract(&self, path: &Path) -> Result<Extraction, ExtractError> {
        let range = first_sheet(path)?;
        let (headers, header_rows) = sheet_header(&range);

        let mut walk = TableWalk::new(self.policy);
        for row in range.rows().skip(header_rows) {
            for (header, cell) in headers.iter().zip(row) {
                if let Some(value) = cell_number(cell) {
                    walk.cell(header, value);
                }
            }
        }

        let raw_content = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect::<Vec<_>>().join(","))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(walk.finish(raw_content))
    }
}

/// Counts transactions in the first amount-like column of a statement workbook.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxTransactionScanner;

impl XlsxTransactionScanner {
    fn tally(range: &Range<Data>, threshold: f64) -> TransactionTally {
        let mut tally = TransactionTally::default();
        let (headers, header_rows) = sheet_header(range);
        let Some(column) = headers
            .iter()
            .position(|header| is_amount_header(&header.to_lowercase()))
        else {
            return tally;
        };

        for row in range.rows().skip(header_rows) {
            if let Some(amount) = row.get(column).and_then(cell_amount) {
                tally.record(amount, threshold);
            }
        }
        tally
    }
}

impl TransactionScanner for XlsxTransactionScanner {
    #[instrument(skip(self))]
    fn scan(&self, path: &Path, threshold: f64) -> TransactionTally {
        match first_sheet(path) {
            Ok(range) => Self::tally(&range, threshold),
            Err(e) => {
                warn!("Could not read statement workbook, reporting no activity: {e}");
                TransactionTally::default()
            }
        }
    }
}
