//! # `agritrust-sheets`: Tabular Extraction Plugin
//!
//! Sensor extraction and transaction scanning for delimited text (`.csv`) and
//! Excel workbooks (`.xlsx`, `.xlsm`, `.xltx`, `.xltm`). Both formats treat the
//! first row as headers and feed every `(header, cell)` pair of the remaining
//! rows through the same walk.

mod delimited;
mod tabular;
mod workbook;

pub use delimited::{CsvExtractor, CsvTransactionScanner};
pub use workbook::{XlsxExtractor, XlsxTransactionScanner};

use agritrust::ExtractError;
use thiserror::Error;

// --- Error Definitions ---

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Could not open workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("Workbook has no worksheets")]
    NoWorksheet,
}

/// Converts the plugin-specific `SheetError` into the shared `ExtractError`.
impl From<SheetError> for ExtractError {
    fn from(err: SheetError) -> Self {
        ExtractError::Parse(err.to_string())
    }
}
