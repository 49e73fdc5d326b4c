//! # agritrust-pdf: PDF Extraction Plugin
//!
//! Best-effort sensor extraction and transaction scanning for PDF files. No
//! PDF library is trusted to succeed: text extraction is a chain of strategies
//! ending in a raw byte decode, and metrics are read line by line from
//! whatever text survives.

mod sensor;
mod statement;
pub mod text;

pub use sensor::{parse_report_text, PdfExtractor};
pub use statement::PdfTransactionScanner;

use thiserror::Error;

// --- Error Definitions ---

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Failed to parse PDF content: {0}")]
    Parse(String),
    #[error("PDF text extractor '{0}' panicked")]
    Panicked(&'static str),
}
