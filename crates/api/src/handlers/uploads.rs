//! Handler for pre-signed upload URL issuance.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::storage::s3::{image_content_type, presign_put};

/// Request body for `POST /uploads/presign`.
#[derive(Debug, Deserialize)]
pub struct PresignRequest {
    pub file_name: Option<String>,
}

/// Everything the client needs to upload directly to the bucket and then
/// reference the object from a post.
#[derive(Debug, Serialize)]
pub struct PresignResponse {
    /// Pre-signed PutObject URL, valid for a few minutes.
    pub upload_url: String,
    /// Server-chosen object key (`<uuid>.<ext>`); the client never picks it.
    pub file_key: String,
    /// Content type the upload must use.
    pub content_type: String,
    /// Public URL of the object after upload.
    pub public_url: String,
}

/// POST /api/v1/uploads/presign
///
/// Issue a pre-signed S3 upload URL for an image file. The original file
/// name is only used for its extension; the stored key is a fresh UUID.
pub async fn presign_upload(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<PresignRequest>,
) -> AppResult<Json<PresignResponse>> {
    let file_name = input
        .file_name
        .as_deref()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::BadRequest("file_name is required".into()))?;

    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    let content_type = image_content_type(&ext)
        .ok_or_else(|| AppError::BadRequest("Invalid file type. Only images allowed".into()))?;

    let file_key = format!("{}.{ext}", Uuid::new_v4());

    let upload_url = presign_put(&state.s3, &state.config.s3, &file_key, content_type).await?;
    let public_url = state.config.s3.public_url(&file_key);

    tracing::debug!(%file_key, content_type, "Issued pre-signed upload URL");

    Ok(Json(PresignResponse {
        upload_url,
        file_key,
        content_type: content_type.to_string(),
        public_url,
    }))
}
