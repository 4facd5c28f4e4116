//! Product identifier.
//!
//! Product ids are assigned by the document store when a record is first
//! written, so they are opaque strings rather than integers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a stored product.
///
/// Wraps the store-assigned string so it cannot be confused with titles,
/// slugs or other free-form strings flowing through the same handlers.
///
/// # Example
///
/// ```rust
/// # use deskshop_core::ProductId;
/// let id = ProductId::new("3f2a9c");
/// assert_eq!(id.as_str(), "3f2a9c");
/// assert_eq!(id.to_string(), "3f2a9c");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new ID from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the ID and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
