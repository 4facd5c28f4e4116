//! Application state shared across handlers.

use std::sync::Arc;

use deskshop_catalog::ProductRepository;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The storefront only reads
/// products; carts live in the visitor's session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    products: ProductRepository,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(products: ProductRepository) -> Self {
        Self {
            inner: Arc::new(AppStateInner { products }),
        }
    }

    /// Get a reference to the product repository.
    #[must_use]
    pub fn products(&self) -> &ProductRepository {
        &self.inner.products
    }
}
