//! Best-effort removal of a product's uploaded images.
//!
//! Every URL is attempted, concurrently, whatever happens to the others.
//! Failures are logged and reported back but never abort the caller.

use std::sync::Arc;

use futures::future::join_all;

use crate::objects::{ObjectStore, ObjectStoreError};

/// A URL whose object could not be removed.
#[derive(Debug)]
pub struct CleanupFailure {
    pub url: String,
    pub error: ObjectStoreError,
}

/// Result of one cleanup pass.
#[derive(Debug, Default)]
pub struct CleanupReport {
    /// Keys removed.
    pub removed: Vec<String>,
    pub failed: Vec<CleanupFailure>,
}

impl CleanupReport {
    /// Whether every URL was removed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Deletes image objects referenced by product records.
#[derive(Clone)]
pub struct AssetCleanup {
    objects: Arc<dyn ObjectStore>,
}

impl std::fmt::Debug for AssetCleanup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCleanup").finish_non_exhaustive()
    }
}

impl AssetCleanup {
    #[must_use]
    pub fn new(objects: Arc<dyn ObjectStore>) -> Self {
        Self { objects }
    }

    /// Delete the object behind each URL.
    pub async fn remove_all(&self, urls: &[String]) -> CleanupReport {
        let attempts = urls.iter().map(|url| async move {
            let result = match self.objects.key_for_url(url) {
                Ok(key) => self.objects.delete(&key).await.map(|()| key),
                Err(e) => Err(e),
            };
            (url, result)
        });

        let mut report = CleanupReport::default();
        for (url, result) in join_all(attempts).await {
            match result {
                Ok(key) => report.removed.push(key),
                Err(error) => {
                    tracing::warn!(url = %url, error = %error, "Failed to remove product image");
                    report.failed.push(CleanupFailure {
                        url: url.clone(),
                        error,
                    });
                }
            }
        }
        report
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::objects::MemoryObjectStore;

    #[tokio::test]
    async fn test_every_url_is_attempted() {
        let objects = Arc::new(MemoryObjectStore::new("https://storage.example.com"));
        let kept = objects.put("products/a.jpg", Vec::new(), "image/jpeg").await.unwrap();
        objects.put("products/b.jpg", Vec::new(), "image/jpeg").await.unwrap();

        let cleanup = AssetCleanup::new(objects.clone());
        let report = cleanup
            .remove_all(&[
                "https://storage.example.com/products/gone.jpg".to_string(),
                kept,
                "not a url".to_string(),
            ])
            .await;

        assert_eq!(report.removed, vec!["products/a.jpg"]);
        assert_eq!(report.failed.len(), 2);
        assert!(!report.is_clean());
        assert!(matches!(report.failed[0].error, ObjectStoreError::NotFound(_)));
        assert!(matches!(report.failed[1].error, ObjectStoreError::InvalidUrl(_)));
        assert_eq!(objects.keys().await, vec!["products/b.jpg"]);
    }

    #[tokio::test]
    async fn test_empty_list_is_clean() {
        let objects = Arc::new(MemoryObjectStore::new("https://storage.example.com"));
        let report = AssetCleanup::new(objects).remove_all(&[]).await;
        assert!(report.is_clean());
        assert!(report.removed.is_empty());
    }
}
