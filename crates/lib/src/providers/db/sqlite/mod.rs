use crate::errors::StorageError;
use chrono::Utc;
use std::fmt::{self, Debug};
use tracing::{debug, info};
use turso::{Database, Value as TursoValue};
use uuid::Uuid;

pub mod sql;

/// A sensor report ready to be persisted.
#[derive(Debug, Clone, Default)]
pub struct NewSensorReport {
    pub filename: String,
    pub original_filename: String,
    pub file_path: String,
    pub owner_id: Option<String>,
    pub trust_score: f64,
    pub address_text: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub summary: Option<String>,
}

/// A persisted sensor report row.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReportRecord {
    pub id: String,
    pub filename: String,
    pub original_filename: String,
    pub file_path: String,
    pub owner_id: Option<String>,
    pub created_at: String,
    pub trust_score: f64,
    pub address_text: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub summary: Option<String>,
}

/// A provider for the local SQLite report store, using Turso.
///
/// When cloned, it shares the same underlying database, so an in-memory
/// instance can be handed to several owners (e.g. in tests).
#[derive(Clone)]
pub struct SqliteProvider {
    /// The Turso database instance. It's cloneable and thread-safe.
    pub db: Database,
}

impl SqliteProvider {
    /// Opens (or creates) the database at `db_path`. Use `":memory:"` for an
    /// isolated in-memory database.
    pub async fn new(db_path: &str) -> Result<Self, StorageError> {
        let db = turso::Builder::new_local(db_path)
            .build()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        // PRAGMA returns a row, so it goes through `query`.
        conn.query("PRAGMA journal_mode=WAL;", ())
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(Self { db })
    }

    /// Ensures that all required tables and indexes exist. Idempotent.
    pub async fn initialize_schema(&self) -> Result<(), StorageError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        for statement in sql::ALL_TABLE_CREATION_SQL {
            conn.execute(statement, ()).await?;
        }
        Ok(())
    }

    /// Inserts one report row and returns its generated identifier.
    pub async fn insert_report(&self, report: &NewSensorReport) -> Result<String, StorageError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now().to_rfc3339();

        conn.execute(
            sql::INSERT_SENSOR_REPORT_SQL,
            turso::params![
                id.clone(),
                report.filename.clone(),
                report.original_filename.clone(),
                report.file_path.clone(),
                optional_text(report.owner_id.as_deref()),
                created_at,
                TursoValue::Real(report.trust_score),
                optional_text(report.address_text.as_deref()),
                optional_real(report.lat),
                optional_real(report.lon),
                optional_text(report.summary.as_deref())
            ],
        )
        .await?;

        info!(report_id = %id, trust_score = report.trust_score, "Stored sensor report.");
        Ok(id)
    }

    /// Looks a report up by its identifier.
    pub async fn get_report(&self, id: &str) -> Result<Option<SensorReportRecord>, StorageError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut rows = conn
            .query(sql::SELECT_SENSOR_REPORT_SQL, turso::params![id])
            .await?;

        let Some(row) = rows.next().await? else {
            debug!(report_id = id, "Sensor report not found.");
            return Ok(None);
        };

        Ok(Some(SensorReportRecord {
            id: value_to_text(row.get_value(0)?).unwrap_or_default(),
            filename: value_to_text(row.get_value(1)?).unwrap_or_default(),
            original_filename: value_to_text(row.get_value(2)?).unwrap_or_default(),
            file_path: value_to_text(row.get_value(3)?).unwrap_or_default(),
            owner_id: value_to_text(row.get_value(4)?),
            created_at: value_to_text(row.get_value(5)?).unwrap_or_default(),
            trust_score: value_to_real(row.get_value(6)?).unwrap_or_default(),
            address_text: value_to_text(row.get_value(7)?),
            lat: value_to_real(row.get_value(8)?),
            lon: value_to_real(row.get_value(9)?),
            summary: value_to_text(row.get_value(10)?),
        }))
    }
}

impl Debug for SqliteProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteProvider").finish_non_exhaustive()
    }
}

impl AsRef<Database> for SqliteProvider {
    fn as_ref(&self) -> &Database {
        &self.db
    }
}

fn optional_text(value: Option<&str>) -> TursoValue {
    value
        .map(|s| TursoValue::Text(s.to_string()))
        .unwrap_or(TursoValue::Null)
}

fn optional_real(value: Option<f64>) -> TursoValue {
    value.map(TursoValue::Real).unwrap_or(TursoValue::Null)
}

fn value_to_text(value: TursoValue) -> Option<String> {
    match value {
        TursoValue::Text(s) => Some(s),
        TursoValue::Integer(i) => Some(i.to_string()),
        TursoValue::Real(f) => Some(f.to_string()),
        TursoValue::Null | TursoValue::Blob(_) => None,
    }
}

fn value_to_real(value: TursoValue) -> Option<f64> {
    match value {
        TursoValue::Real(f) => Some(f),
        TursoValue::Integer(i) => Some(i as f64),
        TursoValue::Text(s) => s.parse().ok(),
        TursoValue::Null | TursoValue::Blob(_) => None,
    }
}
