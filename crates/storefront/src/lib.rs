//! Deskshop Storefront library.
//!
//! This crate provides the public storefront as a library, allowing it to be
//! tested and reused. Products are read through
//! [`deskshop_catalog::ProductRepository`]; the cart lives in the session.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use tower_sessions::{MemoryStore, SessionManagerLayer};

use state::AppState;

/// Build the storefront router with health checks, catalog and cart routes.
pub fn app(state: AppState, sessions: SessionManagerLayer<MemoryStore>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(sessions)
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
/// Returns 503 Service Unavailable if the document store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.products().store().server_time().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Document store not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
