//! Deskshop Core - Shared domain library.
//!
//! This crate provides the types and pure logic used across all Deskshop components:
//! - `catalog` - Document/object storage and the product persistence pipeline
//! - `admin` - Product administration service
//! - `storefront` - Public catalog and session cart
//! - `cli` - Migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Everything here is deterministic: the same form
//! input always normalizes and validates to the same result.
//!
//! # Modules
//!
//! - [`types`] - Product record, identifiers and labelled enums
//! - [`form`] - Flat form fields to a structured product draft
//! - [`validation`] - Declarative rule table shared by create and edit
//! - [`cart`] - Cart reducer with derived totals
//! - [`format`] - Display helpers for prices, titles and dimensions
//! - [`outcome`] - Result contract returned by submissions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod form;
pub mod format;
pub mod outcome;
pub mod types;
pub mod validation;

pub use cart::{Cart, CartAction, CartItem, NewCartItem};
pub use form::{FormFields, FormMode, ProductDraft};
pub use outcome::{FormOutcome, OutcomeKind};
pub use types::*;
pub use validation::{FieldError, FieldErrors, ProductField, validate};
