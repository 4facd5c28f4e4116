//! Business logic services for admin.
//!
//! # Services
//!
//! - `uploads` - Product image uploads to the object store

pub mod uploads;

pub use uploads::{ImageFormat, UploadError, store_product_image};
