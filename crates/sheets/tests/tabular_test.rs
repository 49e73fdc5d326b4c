//! # Tabular Extraction Integration Tests
//!
//! Runs the CSV and workbook plugins against fixture files on disk and feeds
//! their output through the score aggregator.

use agritrust::extract::{SensorExtractor, TransactionScanner, DEFAULT_SMALL_TRANSACTION_THRESHOLD};
use agritrust::{assess_bank_activity, sensor_trust_score, ExtractError, MetricsPolicy};
use agritrust_sheets::{CsvExtractor, CsvTransactionScanner, XlsxExtractor, XlsxTransactionScanner};
use agritrust_test_utils::xlsx::{generate_test_xlsx, Cell};
use agritrust_test_utils::{amounts_csv, setup_tracing, write_fixture};
use anyhow::Result;
use tempfile::tempdir;

#[test]
fn test_csv_sensor_report_scores_full_marks() -> Result<()> {
    // --- 1. Arrange ---
    setup_tracing();
    let dir = tempdir()?;
    let path = write_fixture(
        dir.path(),
        "field.csv",
        "Sensor,pH,Soil Moisture,Nitrogen,Rainfall\n\
         A,6.8,35,60,12.5\n\
         B,9.1,70,5,4.25\n",
    )?;

    // --- 2. Act ---
    let extraction = CsvExtractor::new().extract(&path)?;
    let score = sensor_trust_score(&extraction.metrics, &extraction.normalized);

    // --- 3. Assert ---
    assert_eq!(extraction.metrics.ph, Some(6.8));
    assert_eq!(extraction.metrics.moisture, Some(35.0));
    assert_eq!(extraction.metrics.nitrogen, Some(60.0));
    assert_eq!(extraction.rainfall_total, Some(16.8));
    assert_eq!(extraction.normalized.len(), 8);
    assert!(extraction.normalized.iter().all(|v| (0.0..=10.0).contains(v)));
    assert!(extraction.raw_content.starts_with("Sensor,pH"));
    assert!(extraction.location.address.is_none());
    assert_eq!(score, 30.0);
    Ok(())
}

#[test]
fn test_csv_average_all_policy() -> Result<()> {
    setup_tracing();
    let dir = tempdir()?;
    let path = write_fixture(dir.path(), "avg.csv", "ph,humidity\n6.0,30\n7.0,50\n")?;

    let extraction = CsvExtractor::with_policy(MetricsPolicy::AverageAll).extract(&path)?;

    assert_eq!(extraction.metrics.ph, Some(6.5));
    assert_eq!(extraction.metrics.moisture, Some(40.0));
    assert_eq!(extraction.metrics.nitrogen, None);
    assert_eq!(extraction.rainfall_total, None);
    Ok(())
}

#[test]
fn test_csv_extraction_is_repeatable() -> Result<()> {
    setup_tracing();
    let dir = tempdir()?;
    let path = write_fixture(dir.path(), "r.csv", "temp,wind,ph\n31,4,5.9\n18,22,7.2\n")?;
    let extractor = CsvExtractor::new();

    let first = extractor.extract(&path)?;
    let second = extractor.extract(&path)?;

    assert_eq!(first.normalized, second.normalized);
    assert_eq!(first.metrics, second.metrics);
    Ok(())
}

#[test]
fn test_csv_missing_file_is_an_io_error() {
    setup_tracing();
    let result = CsvExtractor::new().extract(std::path::Path::new("/nonexistent/field.csv"));
    assert!(matches!(result, Err(ExtractError::Io(_))));
}

#[test]
fn test_csv_statement_with_mostly_small_transactions_is_active() -> Result<()> {
    // --- 1. Arrange ---
    setup_tracing();
    let dir = tempdir()?;
    let mut amounts = vec![120.0; 16];
    amounts.extend([1500.0, 2200.0, 980.0, 7400.0]);
    let path = write_fixture(dir.path(), "statement.csv", amounts_csv(&amounts))?;

    // --- 2. Act ---
    let tally = CsvTransactionScanner.scan(&path, DEFAULT_SMALL_TRANSACTION_THRESHOLD);
    let activity = assess_bank_activity(&tally);

    // --- 3. Assert ---
    assert_eq!(tally.line_count(), 20);
    assert_eq!(tally.small_count(), 16);
    assert!(activity.active);
    assert_eq!(activity.trust_delta, 20);
    assert_eq!(activity.activity_ratio, 0.8);
    Ok(())
}

#[test]
fn test_unreadable_statements_report_no_activity() -> Result<()> {
    setup_tracing();
    let dir = tempdir()?;
    let missing = dir.path().join("missing.csv");
    let not_a_workbook = write_fixture(dir.path(), "fake.xlsx", "amount\n10\n")?;

    let csv_tally = CsvTransactionScanner.scan(&missing, DEFAULT_SMALL_TRANSACTION_THRESHOLD);
    let xlsx_tally =
        XlsxTransactionScanner.scan(&not_a_workbook, DEFAULT_SMALL_TRANSACTION_THRESHOLD);

    assert_eq!(csv_tally.line_count(), 0);
    assert_eq!(xlsx_tally.line_count(), 0);
    assert!(!assess_bank_activity(&xlsx_tally).active);
    Ok(())
}

#[test]
fn test_xlsx_sensor_report() -> Result<()> {
    // --- 1. Arrange ---
    setup_tracing();
    let dir = tempdir()?;
    let path = dir.path().join("field.xlsx");
    generate_test_xlsx(
        &path,
        &[
            vec!["Plot".into(), "pH".into(), "Moisture".into(), "N".into(), "Precip".into()],
            vec!["A".into(), 6.2.into(), 25.0.into(), 45.0.into(), 3.0.into()],
            vec!["B".into(), Cell::Empty, 80.0.into(), "12".into(), 4.5.into()],
        ],
    )?;

    // --- 2. Act ---
    let extraction = XlsxExtractor::new().extract(&path)?;

    // --- 3. Assert ---
    assert_eq!(extraction.metrics.ph, Some(6.2));
    assert_eq!(extraction.metrics.moisture, Some(25.0));
    assert_eq!(extraction.metrics.nitrogen, Some(45.0));
    assert_eq!(extraction.rainfall_total, Some(7.5));
    assert_eq!(extraction.normalized.len(), 7);
    assert_eq!(
        extraction.raw_content.lines().next(),
        Some("Plot,pH,Moisture,N,Precip")
    );
    assert_eq!(
        sensor_trust_score(&extraction.metrics, &extraction.normalized),
        30.0
    );
    Ok(())
}

#[test]
fn test_xlsx_empty_first_row_is_consumed_as_header() -> Result<()> {
    // --- 1. Arrange ---
    setup_tracing();
    let dir = tempdir()?;
    let path = dir.path().join("offset.xlsx");
    let rows = vec![
        vec![Cell::Empty, Cell::Empty],
        vec!["pH".into(), "Amount".into()],
        vec![6.8.into(), 35.0.into()],
    ];
    generate_test_xlsx(&path, &rows)?;

    // --- 2. Act ---
    let extraction = XlsxExtractor::new().extract(&path)?;
    let tally = XlsxTransactionScanner.scan(&path, DEFAULT_SMALL_TRANSACTION_THRESHOLD);

    // --- 3. Assert ---
    // Readings fall under blank headers, so no metric is tagged.
    assert_eq!(extraction.metrics.ph, None);
    assert_eq!(extraction.metrics.moisture, None);
    assert_eq!(extraction.rainfall_total, None);
    assert_eq!(extraction.normalized, vec![6.8 / 10.0, 35.0 / 10.0]);
    assert_eq!(tally.line_count(), 0);
    Ok(())
}

#[test]
fn test_xlsx_statement_uses_first_amount_like_column() -> Result<()> {
    setup_tracing();
    let dir = tempdir()?;
    let path = dir.path().join("statement.xlsx");
    let mut rows = vec![vec!["Date".into(), "Txn Amt".into(), "Balance".into()]];
    for amount in [250.0, 499.0, 500.0, 501.0] {
        rows.push(vec!["2024-01-02".into(), amount.into(), 10_000.0.into()]);
    }
    rows.push(vec!["2024-01-03".into(), "-1,200".into(), 8_800.0.into()]);
    generate_test_xlsx(&path, &rows)?;

    let tally = XlsxTransactionScanner.scan(&path, DEFAULT_SMALL_TRANSACTION_THRESHOLD);
    let activity = assess_bank_activity(&tally);

    assert_eq!(tally.line_count(), 5);
    assert_eq!(tally.small_count(), 3);
    assert_eq!(tally.total(), 2950.0);
    assert!(activity.active);
    assert_eq!(activity.activity_ratio, 0.6);
    Ok(())
}
