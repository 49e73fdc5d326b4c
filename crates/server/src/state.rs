//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup: the configuration, the report store and the
//! clients for the geocoding and weather collaborators.

use crate::config::AppConfig;
use agritrust::providers::{
    db::sqlite::SqliteProvider,
    geo::{Geocoder, NominatimGeocoder},
    weather::OpenMeteoClient,
};
use std::sync::Arc;
use tracing::info;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Arc<AppConfig>,
    /// The store that receives one row per sensor upload.
    pub sqlite_provider: Arc<SqliteProvider>,
    pub geocoder: Arc<dyn Geocoder>,
    pub weather: Arc<OpenMeteoClient>,
}

/// Builds the shared application state, opening the database at `config.db_url`.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    if let Some(parent) = std::path::Path::new(&config.db_url).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    let sqlite_provider = SqliteProvider::new(&config.db_url).await?;
    info!(db_path = %config.db_url, "Initialized local storage provider (SQLite).");
    build_app_state_with_provider(config, sqlite_provider).await
}

/// Builds the shared application state around an already opened store.
///
/// The schema is brought up to date and the upload directory is created.
pub async fn build_app_state_with_provider(
    config: AppConfig,
    sqlite_provider: SqliteProvider,
) -> anyhow::Result<AppState> {
    sqlite_provider.initialize_schema().await?;
    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let geocoder = NominatimGeocoder::new(
        config.geocoder.base_url.clone(),
        &config.geocoder.user_agent,
        config.geocoder.timeout(),
    )?;
    let weather = OpenMeteoClient::new(config.weather.base_url.clone(), config.weather.timeout())?;
    info!(
        geocoder = %config.geocoder.base_url,
        weather = %config.weather.base_url,
        "Configured external collaborators."
    );

    Ok(AppState {
        config: Arc::new(config),
        sqlite_provider: Arc::new(sqlite_provider),
        geocoder: Arc::new(geocoder),
        weather: Arc::new(weather),
    })
}
