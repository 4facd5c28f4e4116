//! Image upload handler.

use axum::{
    Json,
    extract::{Multipart, State},
};
use serde::Serialize;
use tracing::instrument;

use crate::error::AppError;
use crate::services::store_product_image;
use crate::state::AppState;

/// Multipart field carrying the image.
const FILE_FIELD: &str = "file";

/// Response to a successful upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Store one product image from a multipart `file` field.
#[instrument(skip(state, multipart))]
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let url = store_product_image(state.objects(), &content_type, bytes.to_vec()).await?;
        return Ok(Json(UploadResponse { url }));
    }

    Err(AppError::BadRequest(format!("missing `{FILE_FIELD}` field")))
}
