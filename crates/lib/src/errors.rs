use thiserror::Error;

/// Errors raised while turning an uploaded file into an [`crate::Extraction`].
///
/// Individual unparseable cells, leaves and lines are never reported here; they
/// are skipped by the extractors. Only document-level failures surface.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Failed to parse file: {0}")]
    Parse(String),
}

/// Errors from the geocoding collaborator.
#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("Geocoding request failed: {0}")]
    Request(reqwest::Error),
    #[error("Geocoding service returned status {0}")]
    Status(u16),
    #[error("Failed to deserialize geocoding response: {0}")]
    Deserialization(reqwest::Error),
}

/// Errors from the weather forecast collaborator.
#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("Forecast request failed: {0}")]
    Request(reqwest::Error),
    #[error("Forecast service returned status {0}")]
    Status(u16),
    #[error("Failed to deserialize forecast response: {0}")]
    Deserialization(reqwest::Error),
}

/// Errors from the report store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage connection error: {0}")]
    Connection(String),
    #[error("Storage operation failed: {0}")]
    Operation(String),
}

impl From<turso::Error> for StorageError {
    fn from(err: turso::Error) -> Self {
        StorageError::Operation(err.to_string())
    }
}
