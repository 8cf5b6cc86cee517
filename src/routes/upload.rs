//! Image upload route
//!
//! POST /upload-image - multipart upload to object storage, answering with
//! the public URL callers can then use as an image reference.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::state::AppState;

const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Create the upload router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload-image", post(upload_image))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

#[derive(Serialize)]
struct UploadResponse {
    success: bool,
    url: String,
}

/// POST /upload-image
async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(ToString::to_string)
            .unwrap_or_else(|| "image".to_string());
        let declared_type = field.content_type().map(ToString::to_string);

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?;

        let content_type = declared_type
            .unwrap_or_else(|| mime_guess::from_path(&filename).first_or_octet_stream().to_string());
        let key = format!("{}_{}", sanitize_name(&filename), Uuid::new_v4());

        state
            .storage()
            .put_object(&key, data.to_vec(), &content_type)
            .await?;

        let url = state.storage().object_url(&key);
        tracing::info!("Uploaded {} bytes as {}", data.len(), key);
        return Ok(Json(UploadResponse { success: true, url }));
    }

    Err(AppError::BadRequest(
        "No file provided. Use field name 'file'".to_string(),
    ))
}

/// Whitespace never survives into object keys.
fn sanitize_name(filename: &str) -> String {
    filename.split_whitespace().collect::<Vec<_>>().join("_")
}
