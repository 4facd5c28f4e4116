//! Product repository.
//!
//! Products live in the `products` collection of a [`DocumentStore`]. The
//! document is the flattened [`ProductRecord`] plus `meta`; the id is the
//! document key. Absent optional fields are omitted from the document rather
//! than stored as nulls.
//!
//! Title uniqueness is checked before every create, and before every update
//! that changes the title. Checked writes are serialized behind a write gate
//! shared by every clone of the repository, and the `PostgreSQL` store backs
//! this with a unique index, so concurrent creates cannot both persist the
//! same title.
//!
//! Every read goes to the store; nothing is cached.

use std::sync::Arc;

use deskshop_core::{Category, Meta, Product, ProductId, ProductRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::assets::{AssetCleanup, CleanupReport};
use crate::codes::CodeGenerator;
use crate::store::{Document, DocumentStore, Filter, StoreError};

/// Collection holding product documents.
pub const PRODUCTS: &str = "products";

/// Errors that can occur during product repository operations.
#[derive(Debug, Error)]
pub enum ProductError {
    /// Another product already has this title.
    #[error("a product with this title already exists")]
    DuplicateTitle,

    /// No product with the requested id.
    #[error("product not found")]
    NotFound,

    /// The record has no images.
    #[error("at least one image is required")]
    EmptyImageSet,

    /// Reading from the document store failed.
    #[error("failed to read products: {0}")]
    StoreRead(#[source] StoreError),

    /// Writing to the document store failed.
    #[error("failed to write product: {0}")]
    StoreWrite(#[source] StoreError),

    /// A stored document is not a valid product.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// A deleted product and what happened to its images.
#[derive(Debug)]
pub struct DeletedProduct {
    pub product: Product,
    pub cleanup: CleanupReport,
}

/// Stored shape of a product: the record's fields at the top level, plus `meta`.
#[derive(Debug, Serialize, Deserialize)]
struct ProductDocument {
    #[serde(flatten)]
    record: ProductRecord,
    meta: Meta,
}

/// QR enrichment settings.
#[derive(Clone)]
struct QrCodes {
    generator: Arc<dyn CodeGenerator>,
    public_base_url: String,
}

/// Repository for product documents.
#[derive(Clone)]
pub struct ProductRepository {
    store: Arc<dyn DocumentStore>,
    assets: Option<AssetCleanup>,
    codes: Option<QrCodes>,
    write_gate: Arc<Mutex<()>>,
}

impl std::fmt::Debug for ProductRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductRepository")
            .field("assets", &self.assets.is_some())
            .field("codes", &self.codes.is_some())
            .finish_non_exhaustive()
    }
}

impl ProductRepository {
    /// Create a repository over `store`, with no asset cleanup or QR codes.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            assets: None,
            codes: None,
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Remove a product's images when it is deleted.
    #[must_use]
    pub fn with_assets(mut self, assets: AssetCleanup) -> Self {
        self.assets = Some(assets);
        self
    }

    /// Attach a QR code for `{public_base_url}/products/{id}` to created products.
    #[must_use]
    pub fn with_code_generator(
        mut self,
        generator: Arc<dyn CodeGenerator>,
        public_base_url: &str,
    ) -> Self {
        self.codes = Some(QrCodes {
            generator,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        });
        self
    }

    /// The underlying document store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Persist a new product.
    ///
    /// # Errors
    ///
    /// Returns `EmptyImageSet` or `DuplicateTitle` without writing, or a store
    /// error if the write fails.
    #[tracing::instrument(skip(self, record), fields(title = %record.title))]
    pub async fn create(&self, record: ProductRecord) -> Result<Product, ProductError> {
        if record.images.is_empty() {
            return Err(ProductError::EmptyImageSet);
        }

        let product = {
            let _gate = self.write_gate.lock().await;

            if self.title_taken(&record.title, None).await? {
                return Err(ProductError::DuplicateTitle);
            }

            let now = self
                .store
                .server_time()
                .await
                .map_err(ProductError::StoreWrite)?;
            let product = Product {
                id: ProductId::new(self.store.generate_id()),
                record,
                meta: Meta::created(now),
            };
            self.write(&product).await?;
            product
        };

        tracing::info!(product_id = %product.id, "Product created");

        match self.qr_code_for(&product.id).await {
            Some(code) => Ok(self.attach_qr_code(product, code).await),
            None => Ok(product),
        }
    }

    /// Replace an existing product's record.
    ///
    /// `createdAt`, `barcode` and `qrCode` are kept from the stored product;
    /// `updatedAt` is refreshed.
    ///
    /// # Errors
    ///
    /// Returns `EmptyImageSet`, `NotFound` or `DuplicateTitle` without
    /// writing, or a store error if a read or the write fails.
    #[tracing::instrument(skip(self, record), fields(title = %record.title))]
    pub async fn update(&self, id: &ProductId, record: ProductRecord) -> Result<Product, ProductError> {
        if record.images.is_empty() {
            return Err(ProductError::EmptyImageSet);
        }

        let _gate = self.write_gate.lock().await;

        let existing = self.get_by_id(id).await?.ok_or(ProductError::NotFound)?;

        if existing.record.title != record.title && self.title_taken(&record.title, Some(id)).await? {
            return Err(ProductError::DuplicateTitle);
        }

        let now = self
            .store
            .server_time()
            .await
            .map_err(ProductError::StoreWrite)?;
        let product = Product {
            id: existing.id,
            record,
            meta: Meta {
                updated_at: now,
                ..existing.meta
            },
        };
        self.write(&product).await?;

        tracing::info!(product_id = %product.id, "Product updated");
        Ok(product)
    }

    /// Delete a product and, best-effort, its images.
    ///
    /// The document is removed first; image cleanup runs afterwards and its
    /// failures are logged and reported without undoing the delete.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such product, or a store error.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &ProductId) -> Result<DeletedProduct, ProductError> {
        let product = {
            let _gate = self.write_gate.lock().await;

            let existing = self.get_by_id(id).await?.ok_or(ProductError::NotFound)?;
            self.store
                .delete(PRODUCTS, id.as_str())
                .await
                .map_err(ProductError::StoreWrite)?;
            existing
        };

        tracing::info!(product_id = %id, "Product deleted");

        let cleanup = match &self.assets {
            Some(assets) => assets.remove_all(&product.record.images).await,
            None => CleanupReport::default(),
        };
        if !cleanup.is_clean() {
            tracing::warn!(
                product_id = %id,
                failed = cleanup.failed.len(),
                "Some product images could not be removed"
            );
        }

        Ok(DeletedProduct { product, cleanup })
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns a store error, or `DataCorruption` if the document is not a
    /// valid product.
    pub async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductError> {
        self.store
            .get(PRODUCTS, id.as_str())
            .await
            .map_err(ProductError::StoreRead)?
            .map(decode)
            .transpose()
    }

    /// Products in `category`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns a store error, or `DataCorruption` for an invalid document.
    pub async fn get_by_category(&self, category: Category) -> Result<Vec<Product>, ProductError> {
        self.query(&Filter::field_eq("category", category.label()))
            .await
    }

    /// Every product, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns a store error, or `DataCorruption` for an invalid document.
    pub async fn get_all(&self) -> Result<Vec<Product>, ProductError> {
        self.query(&Filter::All).await
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn query(&self, filter: &Filter) -> Result<Vec<Product>, ProductError> {
        self.store
            .query(PRODUCTS, filter)
            .await
            .map_err(ProductError::StoreRead)?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Whether a product other than `exclude` already has `title`.
    async fn title_taken(&self, title: &str, exclude: Option<&ProductId>) -> Result<bool, ProductError> {
        let matches = self
            .store
            .query(PRODUCTS, &Filter::field_eq("title", title))
            .await
            .map_err(ProductError::StoreRead)?;

        Ok(matches
            .iter()
            .any(|doc| exclude.is_none_or(|id| id.as_str() != doc.id)))
    }

    async fn write(&self, product: &Product) -> Result<(), ProductError> {
        let document = ProductDocument {
            record: product.record.clone(),
            meta: product.meta.clone(),
        };
        let data = serde_json::to_value(&document)
            .map_err(|e| ProductError::DataCorruption(format!("product {}: {e}", product.id)))?;

        self.store
            .set(PRODUCTS, product.id.as_str(), &data)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => ProductError::DuplicateTitle,
                other => ProductError::StoreWrite(other),
            })
    }

    async fn qr_code_for(&self, id: &ProductId) -> Option<String> {
        let codes = self.codes.as_ref()?;
        let url = format!("{}/products/{id}", codes.public_base_url);
        match codes.generator.generate(&url).await {
            Ok(code) => Some(code),
            Err(e) => {
                tracing::warn!(product_id = %id, error = %e, "Failed to generate QR code");
                None
            }
        }
    }

    /// Store `code` on the current copy of a freshly created product.
    ///
    /// Runs under the write gate on a re-read document, so an edit or delete
    /// made while the code was generated is kept.
    async fn attach_qr_code(&self, created: Product, code: String) -> Product {
        let _gate = self.write_gate.lock().await;

        let mut current = match self.get_by_id(&created.id).await {
            Ok(Some(current)) => current,
            Ok(None) => {
                tracing::info!(product_id = %created.id, "Product deleted before its QR code was stored");
                return created;
            }
            Err(e) => {
                tracing::warn!(product_id = %created.id, error = %e, "Failed to store QR code");
                return created;
            }
        };

        current.meta.qr_code = Some(code);
        if let Err(e) = self.write(&current).await {
            tracing::warn!(product_id = %current.id, error = %e, "Failed to store QR code");
            current.meta.qr_code = None;
        }
        current
    }
}

fn decode(document: Document) -> Result<Product, ProductError> {
    let ProductDocument { record, meta } = serde_json::from_value(document.data)
        .map_err(|e| ProductError::DataCorruption(format!("product {}: {e}", document.id)))?;

    Ok(Product {
        id: ProductId::new(document.id),
        record,
        meta,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::codes::CodeError;
    use crate::fixtures;
    use crate::objects::{MemoryObjectStore, ObjectStore};
    use crate::store::MemoryDocumentStore;
    use async_trait::async_trait;
    use tokio::sync::Notify;

    fn repository() -> (Arc<MemoryDocumentStore>, ProductRepository) {
        let store = Arc::new(MemoryDocumentStore::new());
        let repository = ProductRepository::new(store.clone());
        (store, repository)
    }

    struct FixedCode(Result<&'static str, u16>);

    #[async_trait]
    impl CodeGenerator for FixedCode {
        async fn generate(&self, url: &str) -> Result<String, CodeError> {
            match self.0 {
                Ok(prefix) => Ok(format!("{prefix}{url}")),
                Err(status) => Err(CodeError::Status(status)),
            }
        }
    }

    /// Signals when generation starts, then waits to be released.
    #[derive(Default)]
    struct HeldCode {
        started: Notify,
        release: Notify,
    }

    #[async_trait]
    impl CodeGenerator for HeldCode {
        async fn generate(&self, url: &str) -> Result<String, CodeError> {
            self.started.notify_one();
            self.release.notified().await;
            Ok(format!("qr:{url}"))
        }
    }

    /// Start a create whose QR code generation is held open, and return the
    /// id it was stored under.
    async fn create_with_held_code(
        repository: &ProductRepository,
        codes: &Arc<HeldCode>,
    ) -> (ProductId, tokio::task::JoinHandle<Result<Product, ProductError>>) {
        let task = tokio::spawn({
            let repository = repository.clone();
            async move { repository.create(fixtures::record("Blue Pen")).await }
        });
        codes.started.notified().await;
        let id = repository.get_all().await.unwrap()[0].id.clone();
        (id, task)
    }

    #[tokio::test]
    async fn test_create_stamps_id_and_timestamps() {
        let (_, repository) = repository();
        let product = repository.create(fixtures::record("Blue Pen")).await.unwrap();

        assert_eq!(product.id.as_str().len(), 32);
        assert_eq!(product.meta.created_at, product.meta.updated_at);
        assert_eq!(product.meta.qr_code, None);

        let stored = repository.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored, product);
    }

    #[tokio::test]
    async fn test_stored_document_omits_absent_fields() {
        let (store, repository) = repository();
        let product = repository.create(fixtures::record("Blue Pen")).await.unwrap();

        let doc = store.get(PRODUCTS, product.id.as_str()).await.unwrap().unwrap();
        assert_eq!(doc.data["title"], "Blue Pen");
        assert_eq!(doc.data["dimensions"]["height"], "14");
        assert!(doc.data.get("id").is_none());
        assert!(doc.data.get("material").is_none());
        assert!(doc.data["meta"].get("qrCode").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_title_is_rejected_without_writing() {
        let (store, repository) = repository();
        repository.create(fixtures::record("Blue Pen")).await.unwrap();
        let writes = store.write_count();

        let result = repository.create(fixtures::record("Blue Pen")).await;
        assert!(matches!(result, Err(ProductError::DuplicateTitle)));
        assert_eq!(store.write_count(), writes);
        assert_eq!(store.len(PRODUCTS).await, 1);
    }

    #[tokio::test]
    async fn test_title_match_is_case_sensitive() {
        let (_, repository) = repository();
        repository.create(fixtures::record("Blue Pen")).await.unwrap();
        assert!(repository.create(fixtures::record("blue pen")).await.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_creates_with_same_title() {
        let (store, repository) = repository();
        let (a, b) = tokio::join!(
            repository.create(fixtures::record("Blue Pen")),
            repository.create(fixtures::record("Blue Pen")),
        );

        assert!(a.is_ok() ^ b.is_ok());
        assert_eq!(store.len(PRODUCTS).await, 1);
    }

    #[tokio::test]
    async fn test_empty_images_are_rejected() {
        let (store, repository) = repository();
        let mut record = fixtures::record("Blue Pen");
        record.images.clear();

        assert!(matches!(
            repository.create(record.clone()).await,
            Err(ProductError::EmptyImageSet)
        ));

        let created = repository.create(fixtures::record("Red Pen")).await.unwrap();
        assert!(matches!(
            repository.update(&created.id, record).await,
            Err(ProductError::EmptyImageSet)
        ));
        assert_eq!(store.len(PRODUCTS).await, 1);
    }

    #[tokio::test]
    async fn test_update_keeps_created_at_and_refreshes_updated_at() {
        let (_, repository) = repository();
        let created = repository.create(fixtures::record("Blue Pen")).await.unwrap();

        let mut record = fixtures::record("Blue Pen");
        record.stock = 7;
        let updated = repository.update(&created.id, record).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.record.stock, 7);
        assert_eq!(updated.meta.created_at, created.meta.created_at);
        assert!(updated.meta.updated_at > created.meta.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found_without_writing() {
        let (store, repository) = repository();
        let result = repository
            .update(&ProductId::new("missing"), fixtures::record("Blue Pen"))
            .await;

        assert!(matches!(result, Err(ProductError::NotFound)));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_update_to_taken_title_is_rejected() {
        let (_, repository) = repository();
        repository.create(fixtures::record("Blue Pen")).await.unwrap();
        let red = repository.create(fixtures::record("Red Pen")).await.unwrap();

        let result = repository.update(&red.id, fixtures::record("Blue Pen")).await;
        assert!(matches!(result, Err(ProductError::DuplicateTitle)));
    }

    #[tokio::test]
    async fn test_update_keeping_own_title_is_allowed() {
        let (_, repository) = repository();
        let created = repository.create(fixtures::record("Blue Pen")).await.unwrap();
        assert!(repository.update(&created.id, fixtures::record("Blue Pen")).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_removes_document_despite_cleanup_failures() {
        let store = Arc::new(MemoryDocumentStore::new());
        let objects = Arc::new(MemoryObjectStore::new("https://storage.example.com"));
        let url = objects.put("products/a.jpg", Vec::new(), "image/jpeg").await.unwrap();
        let repository = ProductRepository::new(store.clone())
            .with_assets(AssetCleanup::new(objects.clone()));

        let mut record = fixtures::record("Blue Pen");
        record.images = vec![
            "https://storage.example.com/products/already-gone.jpg".to_string(),
            url,
        ];
        let created = repository.create(record).await.unwrap();

        let deleted = repository.delete(&created.id).await.unwrap();
        assert_eq!(deleted.product.id, created.id);
        assert!(repository.get_by_id(&created.id).await.unwrap().is_none());
        assert!(!objects.contains("products/a.jpg").await);

        assert_eq!(deleted.cleanup.removed, vec!["products/a.jpg"]);
        assert_eq!(deleted.cleanup.failed.len(), 1);
        assert_eq!(
            deleted.cleanup.failed[0].url,
            "https://storage.example.com/products/already-gone.jpg"
        );
    }

    #[tokio::test]
    async fn test_concurrent_update_and_delete_leave_product_deleted() {
        let (store, repository) = repository();
        let created = repository.create(fixtures::record("Blue Pen")).await.unwrap();

        let (updated, deleted) = tokio::join!(
            repository.update(&created.id, fixtures::record("Red Pen")),
            repository.delete(&created.id),
        );

        assert!(deleted.is_ok());
        assert!(matches!(updated, Ok(_) | Err(ProductError::NotFound)));
        assert!(repository.get_by_id(&created.id).await.unwrap().is_none());
        assert_eq!(store.len(PRODUCTS).await, 0);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let (_, repository) = repository();
        assert!(matches!(
            repository.delete(&ProductId::new("missing")).await,
            Err(ProductError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_get_by_category_and_all() {
        let (_, repository) = repository();
        repository.create(fixtures::record("Blue Pen")).await.unwrap();
        let mut notebook = fixtures::record("Spiral Notebook");
        notebook.category = Category::Notebooks;
        repository.create(notebook).await.unwrap();

        let pens = repository.get_by_category(Category::Pens).await.unwrap();
        assert_eq!(pens.len(), 1);
        assert_eq!(pens[0].record.title, "Blue Pen");

        let all = repository.get_all().await.unwrap();
        let titles: Vec<_> = all.iter().map(|p| p.record.title.as_str()).collect();
        assert_eq!(titles, vec!["Blue Pen", "Spiral Notebook"]);

        assert!(repository.get_by_category(Category::StickyNotes).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id_is_repeatable() {
        let (_, repository) = repository();
        let created = repository.create(fixtures::record("Blue Pen")).await.unwrap();

        let first = repository.get_by_id(&created.id).await.unwrap();
        let second = repository.get_by_id(&created.id).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_corrupt_document_is_reported() {
        let (store, repository) = repository();
        store
            .set(PRODUCTS, "broken", &serde_json::json!({"title": 42}))
            .await
            .unwrap();

        let result = repository.get_by_id(&ProductId::new("broken")).await;
        assert!(matches!(result, Err(ProductError::DataCorruption(_))));
        assert!(matches!(repository.get_all().await, Err(ProductError::DataCorruption(_))));
    }

    #[tokio::test]
    async fn test_store_failures_map_to_read_and_write_errors() {
        let (store, repository) = repository();

        store.fail_writes(true);
        assert!(matches!(
            repository.create(fixtures::record("Blue Pen")).await,
            Err(ProductError::StoreWrite(_))
        ));

        store.fail_writes(false);
        store.fail_reads(true);
        assert!(matches!(repository.get_all().await, Err(ProductError::StoreRead(_))));
    }

    #[tokio::test]
    async fn test_qr_code_is_attached_after_create() {
        let store = Arc::new(MemoryDocumentStore::new());
        let repository = ProductRepository::new(store)
            .with_code_generator(Arc::new(FixedCode(Ok("qr:"))), "https://shop.example.com/");

        let product = repository.create(fixtures::record("Blue Pen")).await.unwrap();
        let expected = format!("qr:https://shop.example.com/products/{}", product.id);
        assert_eq!(product.meta.qr_code.as_deref(), Some(expected.as_str()));

        let stored = repository.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.meta.qr_code, product.meta.qr_code);

        let updated = repository.update(&product.id, fixtures::record("Blue Pen")).await.unwrap();
        assert_eq!(updated.meta.qr_code, product.meta.qr_code);
    }

    #[tokio::test]
    async fn test_edit_during_qr_generation_is_kept() {
        let codes = Arc::new(HeldCode::default());
        let repository = ProductRepository::new(Arc::new(MemoryDocumentStore::new()))
            .with_code_generator(codes.clone(), "https://shop.example.com");

        let (id, task) = create_with_held_code(&repository, &codes).await;
        repository.update(&id, fixtures::record("Red Pen")).await.unwrap();
        codes.release.notify_one();

        let created = task.await.unwrap().unwrap();
        assert_eq!(created.record.title, "Red Pen");

        let stored = repository.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.record.title, "Red Pen");
        let expected = format!("qr:https://shop.example.com/products/{id}");
        assert_eq!(stored.meta.qr_code.as_deref(), Some(expected.as_str()));
    }

    #[tokio::test]
    async fn test_delete_during_qr_generation_stays_deleted() {
        let codes = Arc::new(HeldCode::default());
        let store = Arc::new(MemoryDocumentStore::new());
        let repository = ProductRepository::new(store.clone())
            .with_code_generator(codes.clone(), "https://shop.example.com");

        let (id, task) = create_with_held_code(&repository, &codes).await;
        repository.delete(&id).await.unwrap();
        codes.release.notify_one();

        let created = task.await.unwrap().unwrap();
        assert_eq!(created.meta.qr_code, None);
        assert!(repository.get_by_id(&id).await.unwrap().is_none());
        assert_eq!(store.len(PRODUCTS).await, 0);
    }

    #[tokio::test]
    async fn test_qr_code_failure_is_not_fatal() {
        let store = Arc::new(MemoryDocumentStore::new());
        let repository = ProductRepository::new(store)
            .with_code_generator(Arc::new(FixedCode(Err(500))), "https://shop.example.com");

        let product = repository.create(fixtures::record("Blue Pen")).await.unwrap();
        assert_eq!(product.meta.qr_code, None);
    }
}
