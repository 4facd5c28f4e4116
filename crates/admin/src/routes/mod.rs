//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness
//! GET  /health/ready           - Readiness (document store round-trip)
//!
//! # Products
//! GET    /products               - Product listing
//! GET    /products/{id}          - Product detail with edit form values
//! POST   /products               - Create or edit (urlencoded form) → FormOutcome
//! POST   /products/{id}/delete   - Delete → FormOutcome
//! DELETE /products/{id}          - Delete → FormOutcome
//!
//! # Uploads
//! POST /uploads                - Image upload (multipart `file`) → {"url": ...}
//! ```

pub mod products;
pub mod uploads;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::state::AppState;

/// Largest accepted upload body.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Build the admin routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index).post(products::submit))
        .route(
            "/products/{id}",
            get(products::show).delete(products::delete),
        )
        .route("/products/{id}/delete", post(products::delete))
        .route(
            "/uploads",
            post(uploads::upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
}
