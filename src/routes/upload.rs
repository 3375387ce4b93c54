//! Multipart image upload.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;

use crate::state::AppState;
use crate::upload::{self, UploadError, UploadResponse};

/// Form field carrying the file.
const FILE_FIELD: &str = "file";

pub async fn receive(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, UploadError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(UploadError::MissingFile),
        };
        // Reject by type before reading the body.
        upload::allowed_extension(&filename)?;

        let data = field.bytes().await.map_err(multipart_error)?;
        let stored = upload::store(&state.config.paths.upload_dir, &filename, &data).await?;
        return Ok(Json(stored));
    }

    Err(UploadError::MissingFile)
}

fn multipart_error(err: MultipartError) -> UploadError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::TooLarge
    } else {
        UploadError::Malformed(err.body_text())
    }
}
