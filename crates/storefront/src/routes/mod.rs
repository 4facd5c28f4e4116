//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness
//! GET  /health/ready           - Readiness (document store round-trip)
//!
//! # Catalog
//! GET  /categories             - Category list with slugs
//! GET  /categories/{slug}      - Products in a category
//! GET  /products/{id}          - Product detail
//!
//! # Cart (JSON, session-owned)
//! GET  /cart                   - Cart lines and totals
//! POST /cart/add               - {productId, quantity}
//! POST /cart/increase          - {productId}
//! POST /cart/decrease          - {productId}
//! POST /cart/remove            - {productId}
//! POST /cart/clear             - Empty the cart
//! ```

pub mod cart;
pub mod categories;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the storefront routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(categories::index))
        .route("/categories/{slug}", get(categories::show))
        .route("/products/{id}", get(products::show))
        .route("/cart", get(cart::show))
        .route("/cart/add", post(cart::add))
        .route("/cart/increase", post(cart::increase))
        .route("/cart/decrease", post(cart::decrease))
        .route("/cart/remove", post(cart::remove))
        .route("/cart/clear", post(cart::clear))
}
