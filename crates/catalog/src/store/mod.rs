//! Document store interface.
//!
//! Documents are schemaless JSON values addressed by collection and id. The
//! catalog only needs field-equality queries, single-document reads, full
//! replace writes and deletes, plus a write-time timestamp taken from the
//! store rather than the local clock.
//!
//! # Implementations
//!
//! - [`PgDocumentStore`] - `PostgreSQL` `documents` table (JSONB)
//! - [`MemoryDocumentStore`] - In-process store for tests and local runs

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

pub use memory::MemoryDocumentStore;
pub use postgres::{MIGRATOR, PgDocumentStore, create_pool};

/// Errors that can occur during document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Write rejected by a uniqueness constraint.
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A stored document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

/// Which documents a query returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Every document in the collection.
    All,
    /// Documents whose top-level `field` equals `value` exactly.
    FieldEq { field: String, value: Value },
}

impl Filter {
    /// Match documents where `field` equals `value`.
    #[must_use]
    pub fn field_eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::FieldEq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Whether `data` satisfies this filter.
    #[must_use]
    pub fn matches(&self, data: &Value) -> bool {
        match self {
            Self::All => true,
            Self::FieldEq { field, value } => data.get(field) == Some(value),
        }
    }
}

/// A schemaless, per-record store addressed by collection and id.
///
/// Queries return documents in insertion order.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents in `collection` matching `filter`.
    async fn query(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError>;

    /// The document `id`, if present.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Create or fully replace the document `id`.
    async fn set(&self, collection: &str, id: &str, data: &Value) -> Result<(), StoreError>;

    /// Remove the document `id`. Removing an absent document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// The store's current time, used to stamp writes.
    async fn server_time(&self) -> Result<DateTime<Utc>, StoreError>;

    /// A fresh document id.
    fn generate_id(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}
