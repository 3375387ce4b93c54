// Image uploads.
// Validates type and size, then stores the file under a random name in the upload directory.

use std::path::Path;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tokio::fs;
use tracing::{error, info, warn};

/// Largest accepted file, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Extensions accepted, compared lowercase.
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "webp", "heif"];

/// URL prefix the upload directory is served under.
pub const FILES_ROUTE: &str = "/files";

/// Upload failure, reported to the client as JSON.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No file uploaded.")]
    MissingFile,

    #[error("Invalid file type. Only JPEG, JPG, PNG, WEBP, and HEIF are allowed.")]
    InvalidType,

    #[error("File too large. Maximum size is 5 MB.")]
    TooLarge,

    #[error("Malformed upload: {0}")]
    Malformed(String),

    #[error("Failed to store file.")]
    Storage(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Storage(err) => {
                error!(error = %err, "failed to store upload");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            other => {
                warn!(reason = %other, "upload rejected");
                StatusCode::BAD_REQUEST
            }
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Success body for `POST /upload`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub file_url: String,
}

/// Lowercase extension of `filename` if it is on the allow-list.
pub fn allowed_extension(filename: &str) -> Result<String, UploadError> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or(UploadError::InvalidType)?;

    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(UploadError::InvalidType)
    }
}

/// 16 random bytes as hex, followed by the extension.
pub fn random_name(ext: &str) -> String {
    let bytes: [u8; 16] = rand::random();
    format!("{}.{}", hex::encode(bytes), ext)
}

/// Validate and write one file, returning its public URL.
pub async fn store(
    dir: &Path,
    original_name: &str,
    data: &[u8],
) -> Result<UploadResponse, UploadError> {
    let ext = allowed_extension(original_name)?;
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge);
    }

    fs::create_dir_all(dir).await?;
    let name = random_name(&ext);
    fs::write(dir.join(&name), data).await?;

    info!(file = %name, bytes = data.len(), "stored upload");
    Ok(UploadResponse {
        message: "File uploaded successfully".to_string(),
        file_url: format!("{FILES_ROUTE}/{name}"),
    })
}
