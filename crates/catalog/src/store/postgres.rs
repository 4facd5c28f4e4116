//! `PostgreSQL` document store.
//!
//! # Table
//!
//! - `documents` - `(collection, id)` primary key, `data` JSONB payload
//!
//! Product titles carry a partial unique index, so two concurrent writers
//! from different processes still cannot persist the same title.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/catalog/migrations/` and run via:
//! ```bash
//! cargo run -p deskshop-cli -- migrate
//! ```

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde_json::{Map, Value};
use sqlx::error::{DatabaseError, ErrorKind};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

use super::{Document, DocumentStore, Filter, StoreError};

/// Embedded catalog migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

const SELECT_ALL_SQL: &str = r"
    SELECT id, data FROM documents
    WHERE collection = $1
    ORDER BY created_at, id
";

const SELECT_CONTAINING_SQL: &str = r"
    SELECT id, data FROM documents
    WHERE collection = $1 AND data @> $2
    ORDER BY created_at, id
";

const SELECT_ONE_SQL: &str = r"
    SELECT id, data FROM documents
    WHERE collection = $1 AND id = $2
";

const UPSERT_SQL: &str = r"
    INSERT INTO documents (collection, id, data)
    VALUES ($1, $2, $3)
    ON CONFLICT (collection, id) DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
";

const DELETE_SQL: &str = r"
    DELETE FROM documents
    WHERE collection = $1 AND id = $2
";

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::Conflict(error.to_string()),
            _ => match error {
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                    Self::Unavailable(error.to_string())
                }
                other => Self::Database(other),
            },
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Document store backed by the `documents` table.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn document_from_row(row: &PgRow) -> Result<Document, sqlx::Error> {
    Ok(Document {
        id: row.try_get("id")?,
        data: row.try_get("data")?,
    })
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn query(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let rows = match filter {
            Filter::All => {
                sqlx::query(SELECT_ALL_SQL)
                    .bind(collection)
                    .fetch_all(&self.pool)
                    .await?
            }
            Filter::FieldEq { field, value } => {
                let mut containing = Map::new();
                containing.insert(field.clone(), value.clone());
                sqlx::query(SELECT_CONTAINING_SQL)
                    .bind(collection)
                    .bind(Value::Object(containing))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        // `@>` is containment, so narrow to exact equality for arrays and objects.
        rows.iter()
            .map(document_from_row)
            .filter(|doc| doc.as_ref().ok().is_none_or(|doc| filter.matches(&doc.data)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::from)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query(SELECT_ONE_SQL)
            .bind(collection)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref()
            .map(document_from_row)
            .transpose()
            .map_err(StoreError::from)
    }

    async fn set(&self, collection: &str, id: &str, data: &Value) -> Result<(), StoreError> {
        sqlx::query(UPSERT_SQL)
            .bind(collection)
            .bind(id)
            .bind(data)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        sqlx::query(DELETE_SQL)
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn server_time(&self) -> Result<DateTime<Utc>, StoreError> {
        let now: DateTime<Utc> = sqlx::query_scalar("SELECT NOW()")
            .fetch_one(&self.pool)
            .await?;
        Ok(now)
    }
}
