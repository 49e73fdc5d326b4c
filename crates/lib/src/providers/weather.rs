//! # Weather Forecasts
//!
//! A thin client for an Open-Meteo compatible `/v1/forecast` endpoint, used to
//! show current conditions for a field location.

use crate::{errors::WeatherError, extract::Coordinates};
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const HOURLY_VARIABLES: &str = "temperature_2m,precipitation,wind_speed_10m";

#[derive(Deserialize, Debug)]
struct ForecastResponse {
    #[serde(default)]
    current_weather: Option<Value>,
    #[serde(default)]
    hourly: Option<Value>,
}

/// Current conditions plus the hourly series, passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub current: Value,
    pub hourly: Value,
}

#[derive(Clone, Debug)]
pub struct OpenMeteoClient {
    client: ReqwestClient,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, WeatherError> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(WeatherError::ClientBuild)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetches the forecast for `coordinates` in a single attempt.
    pub async fn forecast(&self, coordinates: Coordinates) -> Result<WeatherReport, WeatherError> {
        let url = format!("{}/v1/forecast", self.base_url);
        let latitude = coordinates.lat.to_string();
        let longitude = coordinates.lon.to_string();
        debug!(%url, %latitude, %longitude, "--> Sending forecast request");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current_weather", "true"),
                ("hourly", HOURLY_VARIABLES),
            ])
            .send()
            .await
            .map_err(WeatherError::Request)?;

        if !response.status().is_success() {
            return Err(WeatherError::Status(response.status().as_u16()));
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(WeatherError::Deserialization)?;

        Ok(WeatherReport {
            current: body
                .current_weather
                .unwrap_or_else(|| Value::Object(Default::default())),
            hourly: body
                .hourly
                .unwrap_or_else(|| Value::Object(Default::default())),
        })
    }
}
