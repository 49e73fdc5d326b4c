//! # Upload Persistence
//!
//! Shared by both upload routes: pulls the `file` part out of a multipart
//! body, validates its extension and writes it under the upload directory
//! with a generated name.

use super::AppError;
use agritrust::FileKind;
use axum_extra::extract::Multipart;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

pub const UNSUPPORTED_FILE_TYPE: &str = "Unsupported file type. Use JSON, PDF, CSV, or Excel.";

/// An upload that passed validation and now lives on disk.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    /// The name the client sent.
    pub original_filename: String,
    /// The generated name on disk: `<uuid hex><ext>`.
    pub filename: String,
    pub path: PathBuf,
    pub kind: FileKind,
}

/// The lower-cased extension of `filename`, including the leading dot.
fn lowercase_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
}

/// Validates the multipart `file` part and writes it to `upload_dir`.
pub async fn receive_upload(
    multipart: &mut Multipart,
    upload_dir: &Path,
) -> Result<StoredUpload, AppError> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(anyhow::Error::from)? {
        let name = field.name().unwrap_or("").to_string();
        if name != "file" || file.is_some() {
            warn!("Ignoring multipart field: {}", name);
            continue;
        }
        let original_filename = field.file_name().unwrap_or("").to_string();
        let data = field.bytes().await.map_err(anyhow::Error::from)?.to_vec();
        file = Some((original_filename, data));
    }

    let (original_filename, data) =
        file.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
    if original_filename.is_empty() {
        return Err(AppError::BadRequest("No file selected".to_string()));
    }

    let extension = lowercase_extension(&original_filename)
        .ok_or_else(|| AppError::BadRequest(UNSUPPORTED_FILE_TYPE.to_string()))?;
    let kind = FileKind::from_extension(&extension)
        .ok_or_else(|| AppError::BadRequest(UNSUPPORTED_FILE_TYPE.to_string()))?;

    let filename = format!("{}{}", Uuid::new_v4().simple(), extension);
    let path = upload_dir.join(&filename);
    tokio::fs::write(&path, &data)
        .await
        .map_err(AppError::FileSave)?;

    info!(
        original_filename = %original_filename,
        stored_as = %path.display(),
        bytes = data.len(),
        "Stored upload."
    );
    Ok(StoredUpload {
        original_filename,
        filename,
        path,
        kind,
    })
}
