//! Product image uploads.
//!
//! Uploaded images are stored under `products/{uuid}.{ext}` in the object
//! store, and the public URL is handed back for the product form's `images`
//! field.

use deskshop_catalog::{ObjectStore, ObjectStoreError};
use thiserror::Error;

/// Key prefix for product images.
const PRODUCT_IMAGE_PREFIX: &str = "products";

/// Errors that can occur while storing an upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Content type is not an accepted image format.
    #[error("unsupported image type: {0}")]
    UnsupportedType(String),

    /// The upload had no bytes.
    #[error("uploaded file is empty")]
    Empty,

    /// The object store rejected the write.
    #[error("failed to store upload: {0}")]
    Store(#[from] ObjectStoreError),
}

/// Accepted image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Webp,
}

impl ImageFormat {
    /// Match a `Content-Type` value, ignoring parameters and case.
    #[must_use]
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
        }
    }

    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }
}

/// Store an uploaded product image and return its public URL.
///
/// # Errors
///
/// Returns `UploadError` if the type is not accepted, the body is empty, or
/// the object store write fails.
pub async fn store_product_image(
    objects: &dyn ObjectStore,
    content_type: &str,
    bytes: Vec<u8>,
) -> Result<String, UploadError> {
    let format = ImageFormat::from_content_type(content_type)
        .ok_or_else(|| UploadError::UnsupportedType(content_type.to_string()))?;
    if bytes.is_empty() {
        return Err(UploadError::Empty);
    }

    let key = format!(
        "{PRODUCT_IMAGE_PREFIX}/{}.{}",
        uuid::Uuid::new_v4().simple(),
        format.extension()
    );
    let url = objects.put(&key, bytes, format.content_type()).await?;

    tracing::info!(key = %key, "Product image uploaded");
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use deskshop_catalog::MemoryObjectStore;

    use super::*;

    #[test]
    fn test_accepted_content_types() {
        assert_eq!(ImageFormat::from_content_type("image/jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_content_type("image/jpg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_content_type("IMAGE/WEBP"), Some(ImageFormat::Webp));
        assert_eq!(
            ImageFormat::from_content_type("image/jpeg; charset=binary"),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::from_content_type("image/png"), None);
        assert_eq!(ImageFormat::from_content_type("text/plain"), None);
    }

    #[tokio::test]
    async fn test_store_product_image() {
        let objects = MemoryObjectStore::new("https://storage.example.com");
        let url = store_product_image(&objects, "image/webp", vec![1, 2, 3])
            .await
            .unwrap();

        assert!(url.starts_with("https://storage.example.com/products/"));
        assert!(url.ends_with(".webp"));
        let keys = objects.keys().await;
        assert_eq!(keys.len(), 1);
        assert_eq!(objects.object(&keys[0]).await.unwrap().content_type, "image/webp");
    }

    #[tokio::test]
    async fn test_rejects_unsupported_and_empty() {
        let objects = MemoryObjectStore::new("https://storage.example.com");
        assert!(matches!(
            store_product_image(&objects, "image/gif", vec![1]).await,
            Err(UploadError::UnsupportedType(_))
        ));
        assert!(matches!(
            store_product_image(&objects, "image/jpeg", Vec::new()).await,
            Err(UploadError::Empty)
        ));
        assert!(objects.keys().await.is_empty());
    }
}
