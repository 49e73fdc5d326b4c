use super::{AppError, AppState};
use agritrust::{resolve_location, AddressValue, Coordinates, Location};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};

#[derive(Deserialize, Debug, Default)]
pub struct WeatherParams {
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Serialize, Debug)]
pub struct WeatherResponse {
    pub current: Value,
    pub hourly: Value,
    pub lat: f64,
    pub lon: f64,
}

/// Handler for `GET /api/weather`.
///
/// Coordinates from the query win; otherwise `address` is geocoded.
#[instrument(skip_all)]
pub async fn weather_handler(
    State(app_state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<WeatherResponse>, AppError> {
    debug!(?params, "Weather lookup requested.");
    let location = Location {
        address: params.address.map(AddressValue::Text),
        lat: params.lat,
        lon: params.lon,
    };
    let location = resolve_location(app_state.geocoder.as_ref(), location).await;

    let (Some(lat), Some(lon)) = (location.lat, location.lon) else {
        return Err(AppError::BadRequest(
            "Could not determine coordinates. Provide lat and lon or a resolvable address."
                .to_string(),
        ));
    };

    let report = app_state
        .weather
        .forecast(Coordinates { lat, lon })
        .await
        .map_err(|e| AppError::BadGateway(format!("Weather lookup failed: {e}")))?;
    info!(lat, lon, "Fetched weather forecast.");

    Ok(Json(WeatherResponse {
        current: report.current,
        hourly: report.hourly,
        lat,
        lon,
    }))
}
