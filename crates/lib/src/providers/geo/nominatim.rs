use super::Geocoder;
use crate::{errors::GeocodeError, extract::coordinate_from_value, extract::Coordinates};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

#[derive(Deserialize, Debug)]
struct NominatimPlace {
    #[serde(default)]
    lat: Value,
    #[serde(default)]
    lon: Value,
}

/// A geocoder backed by a Nominatim-compatible `/search` endpoint.
#[derive(Clone, Debug)]
pub struct NominatimGeocoder {
    client: ReqwestClient,
    base_url: String,
}

impl NominatimGeocoder {
    /// Creates a new `NominatimGeocoder`.
    ///
    /// Nominatim rejects anonymous clients, so `user_agent` is required. Every
    /// request is bounded by `timeout`.
    pub fn new(
        base_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, GeocodeError> {
        let client = ReqwestClient::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(GeocodeError::ClientBuild)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let url = format!("{}/search", self.base_url);
        debug!(%url, query, "--> Sending geocoding request");

        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(GeocodeError::Request)?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(GeocodeError::Deserialization)?;

        let coordinates = places.first().and_then(|place| {
            Some(Coordinates {
                lat: coordinate_from_value(&place.lat)?,
                lon: coordinate_from_value(&place.lon)?,
            })
        });
        debug!(?coordinates, "<-- Geocoding result");
        Ok(coordinates)
    }
}
