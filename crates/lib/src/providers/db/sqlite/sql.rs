//! # SQLite Specific SQL Queries
//!
//! This module centralizes SQL query strings for the SQLite provider.

pub const CREATE_SENSOR_REPORTS_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS sensor_reports (
        id TEXT PRIMARY KEY,
        filename TEXT NOT NULL,
        original_filename TEXT NOT NULL,
        file_path TEXT NOT NULL,
        owner_id TEXT,
        created_at TEXT NOT NULL,
        trust_score REAL NOT NULL DEFAULT 0.0,
        address_text TEXT,
        lat REAL,
        lon REAL,
        summary TEXT
    );
";

pub const CREATE_SENSOR_REPORTS_CREATED_AT_INDEX_SQL: &str =
    "CREATE INDEX IF NOT EXISTS idx_sensor_reports_created_at ON sensor_reports (created_at);";

/// Every statement needed to bring an empty database up to date.
pub const ALL_TABLE_CREATION_SQL: &[&str] = &[
    CREATE_SENSOR_REPORTS_TABLE_SQL,
    CREATE_SENSOR_REPORTS_CREATED_AT_INDEX_SQL,
];

pub const INSERT_SENSOR_REPORT_SQL: &str = "
    INSERT INTO sensor_reports (
        id, filename, original_filename, file_path, owner_id, created_at,
        trust_score, address_text, lat, lon, summary
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

pub const SELECT_SENSOR_REPORT_SQL: &str = "
    SELECT id, filename, original_filename, file_path, owner_id, created_at,
           trust_score, address_text, lat, lon, summary
    FROM sensor_reports
    WHERE id = ?
";
