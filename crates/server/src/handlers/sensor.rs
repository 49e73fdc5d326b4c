//! # Sensor Report Handler
//!
//! Upload, extract, resolve the location, score, persist. One report row is
//! written per successful request.

use super::{upload::receive_upload, AppError, AppState};
use crate::pipeline::extract_sensor_report;
use agritrust::{
    providers::db::sqlite::NewSensorReport, resolve_location, sensor_trust_score, AddressValue,
    MetricsTriple,
};
use axum::{extract::State, Json};
use axum_extra::extract::Multipart;
use serde::Serialize;
use tracing::{info, instrument};

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SensorReadingResponse {
    pub trust_score: f64,
    pub address: Option<AddressValue>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub report_id: String,
    pub metrics: MetricsTriple,
    /// Always `null`; summaries are not generated.
    pub ai_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rainfall_total: Option<f64>,
}

/// Handler for `POST /api/sensor-readings`.
#[instrument(skip_all)]
pub async fn sensor_readings_handler(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SensorReadingResponse>, AppError> {
    let upload = receive_upload(&mut multipart, &app_state.config.upload_dir).await?;

    let extraction = extract_sensor_report(
        upload.path.clone(),
        upload.kind,
        app_state.config.metrics_policy,
    )
    .await?;
    let location = resolve_location(app_state.geocoder.as_ref(), extraction.location).await;
    let trust_score = sensor_trust_score(&extraction.metrics, &extraction.normalized);

    let report = NewSensorReport {
        filename: upload.filename,
        original_filename: upload.original_filename,
        file_path: upload.path.to_string_lossy().into_owned(),
        owner_id: None,
        trust_score,
        address_text: location.address.as_ref().map(AddressValue::to_storage_text),
        lat: location.lat,
        lon: location.lon,
        summary: None,
    };
    let report_id = app_state.sqlite_provider.insert_report(&report).await?;
    info!(%report_id, trust_score, "Scored sensor report.");

    Ok(Json(SensorReadingResponse {
        trust_score,
        address: location.address,
        lat: location.lat,
        lon: location.lon,
        report_id,
        metrics: extraction.metrics,
        ai_summary: None,
        rainfall_total: extraction.rainfall_total,
    }))
}
