//! Core types for Deskshop.
//!
//! This module provides the product record and the type-safe wrappers around it.

pub mod id;
pub mod labels;
pub mod product;

pub use id::ProductId;
pub use labels::{AvailabilityStatus, Category, LabelError, ReturnPolicy};
pub use product::{Dimensions, Meta, Product, ProductRecord};
