use agritrust::{ExtractError, StorageError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

/// A custom error type for the server application.
///
/// This enum encapsulates the different kinds of errors that can occur within
/// the server, allowing them to be converted into appropriate HTTP responses.
/// Every response body has the shape `{"error": "<message>"}`.
#[derive(Debug)]
pub enum AppError {
    /// The request itself is unusable (missing file, bad extension, malformed document).
    BadRequest(String),
    /// An upstream collaborator (e.g. the weather service) failed.
    BadGateway(String),
    /// The upload could not be written to disk.
    FileSave(std::io::Error),
    /// The report store failed after extraction succeeded.
    Storage(StorageError),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err)
    }
}

/// Document-level extraction failures are the caller's problem; I/O is ours.
impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::InvalidJson(_) | ExtractError::Parse(_) => {
                AppError::BadRequest(err.to_string())
            }
            ExtractError::Io(e) => AppError::Internal(anyhow::Error::from(e)),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::BadRequest(msg) => {
                warn!("Rejected request: {msg}");
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::BadGateway(msg) => {
                error!("Upstream failure: {msg}");
                (StatusCode::BAD_GATEWAY, msg)
            }
            AppError::FileSave(err) => {
                error!("Failed to save upload: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to save file: {err}"),
                )
            }
            AppError::Storage(err) => {
                error!("StorageError: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to store report: {err}"),
                )
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
