//! Application state shared across handlers.

use std::sync::Arc;

use deskshop_catalog::{DocumentStore, ObjectStore, ProductPipeline, ProductRepository};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// product pipeline and the image object store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pipeline: ProductPipeline,
    objects: Arc<dyn ObjectStore>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(pipeline: ProductPipeline, objects: Arc<dyn ObjectStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { pipeline, objects }),
        }
    }

    /// Get a reference to the submission pipeline.
    #[must_use]
    pub fn pipeline(&self) -> &ProductPipeline {
        &self.inner.pipeline
    }

    /// Get a reference to the product repository.
    #[must_use]
    pub fn products(&self) -> &ProductRepository {
        self.inner.pipeline.products()
    }

    /// Get a reference to the document store behind the repository.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        self.products().store()
    }

    /// Get a reference to the image object store.
    #[must_use]
    pub fn objects(&self) -> &dyn ObjectStore {
        self.inner.objects.as_ref()
    }
}
