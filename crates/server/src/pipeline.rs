//! # Extraction Pipeline
//!
//! The one place where a [`FileKind`] is mapped to a concrete extractor or
//! scanner from the format plugins. Extraction is blocking work, so it runs on
//! tokio's blocking pool with the stored file path as its only input.

use crate::{config::MetricsPolicySetting, errors::AppError};
use agritrust::{Extraction, FileKind, SensorExtractor, TransactionScanner, TransactionTally};
use agritrust_pdf::{PdfExtractor, PdfTransactionScanner};
use agritrust_sheets::{CsvExtractor, CsvTransactionScanner, XlsxExtractor, XlsxTransactionScanner};
use agritrust_text::{JsonExtractor, JsonTransactionScanner};
use std::path::PathBuf;
use tracing::{debug, instrument};

pub fn sensor_extractor(kind: FileKind, setting: MetricsPolicySetting) -> Box<dyn SensorExtractor> {
    let policy = setting.policy_for(kind);
    match kind {
        FileKind::Csv => Box::new(CsvExtractor::with_policy(policy)),
        FileKind::Spreadsheet => Box::new(XlsxExtractor::with_policy(policy)),
        FileKind::Json => Box::new(JsonExtractor::with_policy(policy)),
        FileKind::Pdf => Box::new(PdfExtractor::with_policy(policy)),
    }
}

pub fn transaction_scanner(kind: FileKind) -> Box<dyn TransactionScanner> {
    match kind {
        FileKind::Csv => Box::new(CsvTransactionScanner),
        FileKind::Spreadsheet => Box::new(XlsxTransactionScanner),
        FileKind::Json => Box::new(JsonTransactionScanner),
        FileKind::Pdf => Box::new(PdfTransactionScanner),
    }
}

/// Runs the sensor extractor for `kind` over the stored upload.
#[instrument(skip(setting))]
pub async fn extract_sensor_report(
    path: PathBuf,
    kind: FileKind,
    setting: MetricsPolicySetting,
) -> Result<Extraction, AppError> {
    let extraction = tokio::task::spawn_blocking(move || {
        sensor_extractor(kind, setting).extract(&path)
    })
    .await
    .map_err(anyhow::Error::from)??;

    debug!(
        metrics = ?extraction.metrics,
        normalized = extraction.normalized.len(),
        "Extraction finished."
    );
    Ok(extraction)
}

/// Runs the transaction scanner for `kind` over the stored upload. Never fails
/// on document content; only a crashed worker surfaces as an error.
#[instrument]
pub async fn scan_statement(
    path: PathBuf,
    kind: FileKind,
    threshold: f64,
) -> Result<TransactionTally, AppError> {
    let tally = tokio::task::spawn_blocking(move || transaction_scanner(kind).scan(&path, threshold))
        .await
        .map_err(anyhow::Error::from)?;

    debug!(
        small = tally.small_count(),
        lines = tally.line_count(),
        "Statement scan finished."
    );
    Ok(tally)
}
