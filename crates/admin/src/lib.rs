//! Deskshop Admin library.
//!
//! This crate provides the product administration service as a library,
//! allowing it to be tested and reused.
//!
//! Product writes go through [`deskshop_catalog::ProductPipeline`]; this crate
//! only adds the HTTP surface, image uploads, and configuration.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};

use state::AppState;

/// Build the admin router with health checks and all product routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Asks the document store for its clock. Returns 503 Service Unavailable
/// if the store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().server_time().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Document store not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
