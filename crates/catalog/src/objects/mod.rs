//! Object storage for uploaded media.
//!
//! Objects are addressed by key. A stored object's public URL carries its key
//! as the URL path, so the key can be recovered from any URL kept on a
//! product record.

pub mod local;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use local::LocalObjectStore;
pub use memory::MemoryObjectStore;

/// Errors that can occur during object store operations.
#[derive(Debug, Error)]
pub enum ObjectStoreError {
    /// No object stored under the key.
    #[error("object not found: {0}")]
    NotFound(String),

    /// The key is empty or escapes the store.
    #[error("invalid object key: {0}")]
    InvalidKey(String),

    /// The URL does not address an object in this store.
    #[error("invalid object URL: {0}")]
    InvalidUrl(String),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A key-addressed blob store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key` and return the object's public URL.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str)
    -> Result<String, ObjectStoreError>;

    /// Remove the object under `key`.
    async fn delete(&self, key: &str) -> Result<(), ObjectStoreError>;

    /// The key of the object served at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectStoreError::InvalidUrl`] if no key can be derived.
    fn key_for_url(&self, url: &str) -> Result<String, ObjectStoreError> {
        object_key_from_url(url)
    }
}

/// Derive an object key from a public URL: its path without the leading
/// slash, percent-decoded.
///
/// # Errors
///
/// Returns [`ObjectStoreError::InvalidUrl`] if `url` is not an absolute URL
/// or has an empty path.
pub fn object_key_from_url(url: &str) -> Result<String, ObjectStoreError> {
    let parsed = url::Url::parse(url).map_err(|_| ObjectStoreError::InvalidUrl(url.to_string()))?;
    let path = parsed.path().trim_start_matches('/');
    if path.is_empty() {
        return Err(ObjectStoreError::InvalidUrl(url.to_string()));
    }
    let decoded =
        urlencoding::decode(path).map_err(|_| ObjectStoreError::InvalidUrl(url.to_string()))?;
    Ok(decoded.into_owned())
}

/// Reject keys that are empty, absolute or climb out of the store root.
pub(crate) fn check_key(key: &str) -> Result<(), ObjectStoreError> {
    let escapes = key
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if key.is_empty() || key.contains('\\') || escapes {
        return Err(ObjectStoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_url_strips_leading_slash() {
        let key = object_key_from_url("https://cdn.example.com/products/abc.jpg").unwrap();
        assert_eq!(key, "products/abc.jpg");
    }

    #[test]
    fn test_key_from_url_decodes_percent_escapes() {
        let key =
            object_key_from_url("https://storage.example.com/products%2Fblue%20pen.webp?alt=media")
                .unwrap();
        assert_eq!(key, "products/blue pen.webp");
    }

    #[test]
    fn test_key_from_url_rejects_bad_input() {
        assert!(matches!(
            object_key_from_url("/relative/path.jpg"),
            Err(ObjectStoreError::InvalidUrl(_))
        ));
        assert!(matches!(
            object_key_from_url("https://cdn.example.com/"),
            Err(ObjectStoreError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_check_key() {
        assert!(check_key("products/a.jpg").is_ok());
        assert!(check_key("").is_err());
        assert!(check_key("/etc/passwd").is_err());
        assert!(check_key("products/../../secret").is_err());
        assert!(check_key("products//a.jpg").is_err());
    }
}
