//! Unified error handling for admin.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use deskshop_catalog::ProductError;
use thiserror::Error;

use crate::services::UploadError;

/// Application-level error type for the admin service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Product repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] ProductError),

    /// Image upload failed.
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn is_server_error(&self) -> bool {
        match self {
            Self::Repository(ProductError::NotFound) => false,
            Self::Repository(_) | Self::Internal(_) | Self::Upload(UploadError::Store(_)) => true,
            Self::Upload(_) | Self::NotFound(_) | Self::BadRequest(_) => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let status = match &self {
            Self::Repository(ProductError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Repository(_) | Self::Internal(_) | Self::Upload(UploadError::Store(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Upload(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = if self.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, message).into_response()
    }
}
