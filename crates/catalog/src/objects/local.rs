//! Filesystem-backed object store.
//!
//! Objects are written under a root directory and published under a base
//! URL, e.g. root `uploads/` served at `http://localhost:3001/uploads`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{ObjectStore, ObjectStoreError, check_key, object_key_from_url};

/// Object store writing files below a root directory.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    base_url: String,
}

impl LocalObjectStore {
    /// Store objects under `root`, published at `base_url`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Directory objects are written under.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, ObjectStoreError> {
        check_key(key)?;
        Ok(self.root.join(key))
    }

    /// Path component of `url` below the base URL, without surrounding
    /// slashes. `None` when `url` is served from a different origin.
    fn published_path(&self, url: &str) -> Result<Option<String>, ObjectStoreError> {
        let base = url::Url::parse(&self.base_url)
            .map_err(|_| ObjectStoreError::InvalidUrl(self.base_url.clone()))?;
        let parsed =
            url::Url::parse(url).map_err(|_| ObjectStoreError::InvalidUrl(url.to_string()))?;
        if parsed.origin() != base.origin() {
            return Ok(None);
        }
        Ok(Some(base.path().trim_matches('/').to_string()))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, ObjectStoreError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!(key, path = %path.display(), "Stored object");
        Ok(format!("{}/{key}", self.base_url))
    }

    async fn delete(&self, key: &str) -> Result<(), ObjectStoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(ObjectStoreError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn key_for_url(&self, url: &str) -> Result<String, ObjectStoreError> {
        let key = object_key_from_url(url)?;
        let base = self
            .published_path(url)?
            .ok_or_else(|| ObjectStoreError::InvalidUrl(url.to_string()))?;
        if base.is_empty() {
            return Ok(key);
        }
        key.strip_prefix(&base)
            .and_then(|rest| rest.strip_prefix('/'))
            .map(str::to_owned)
            .ok_or_else(|| ObjectStoreError::InvalidUrl(url.to_string()))
    }
}
