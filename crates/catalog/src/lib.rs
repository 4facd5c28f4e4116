//! Deskshop Catalog - product persistence and submission pipeline.
//!
//! # Architecture
//!
//! ```text
//! FormFields ──► ProductPipeline ──► ProductRepository ──► DocumentStore
//!                (normalize,          (title check,         (Postgres / memory)
//!                 validate)            stamps, QR code)
//!                                          │
//!                                          └─ delete ──► AssetCleanup ──► ObjectStore
//! ```
//!
//! # Modules
//!
//! - [`store`] - Document store interface, `PostgreSQL` and in-memory backends
//! - [`objects`] - Object store interface, filesystem and in-memory backends
//! - [`assets`] - Best-effort image cleanup on delete
//! - [`codes`] - QR code generator client
//! - [`products`] - Product repository
//! - [`submissions`] - Create/edit/delete pipeline producing form outcomes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod assets;
pub mod codes;
pub mod objects;
pub mod products;
pub mod store;
pub mod submissions;

pub use assets::{AssetCleanup, CleanupReport};
pub use codes::{CodeError, CodeGenerator, HttpCodeGenerator};
pub use objects::{LocalObjectStore, MemoryObjectStore, ObjectStore, ObjectStoreError};
pub use products::{DeletedProduct, ProductError, ProductRepository};
pub use store::{DocumentStore, MemoryDocumentStore, PgDocumentStore, StoreError};
pub use submissions::ProductPipeline;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod fixtures {
    use deskshop_core::{FormFields, ProductDraft, ProductRecord, validate};

    /// A flat product form that passes validation.
    pub fn form(title: &str) -> FormFields {
        [
            ("title", title),
            (
                "description",
                "A smooth-writing gel pen with a comfortable grip, ideal for daily notes.",
            ),
            ("category", "Pens"),
            ("price", "12.50"),
            ("stock", "40"),
            ("brand", "Inkwell"),
            ("weight", "15"),
            ("dimensions.width", "1"),
            ("dimensions.height", "14"),
            ("dimensions.depth", "1"),
            ("color", "Blue"),
            ("warrantyInformation", "1 year warranty"),
            ("shippingInformation", "Ships in 2 days"),
            ("availabilityStatus", "In Stock"),
            ("returnPolicy", "30 days return policy"),
            ("minimumOrderQuantity", "1"),
            ("images", "https://cdn.example.com/products/blue-pen.jpg"),
        ]
        .into_iter()
        .collect()
    }

    pub fn record(title: &str) -> ProductRecord {
        validate(&ProductDraft::from_fields(&form(title))).unwrap()
    }
}
