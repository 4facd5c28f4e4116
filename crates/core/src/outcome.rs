//! Result contract for product submissions.
//!
//! Create, edit and delete all answer with a [`FormOutcome`], so the caller
//! can re-render the form with what was entered and the errors next to it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::form::ProductDraft;
use crate::types::Product;
use crate::validation::{FieldErrors, ProductField};

/// Broad class of a submission result, for callers choosing a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Succeeded,
    /// The input was rejected; field errors say why.
    Invalid,
    NotFound,
    /// The store failed; resubmitting may work.
    Failed,
}

/// Outcome of a create, edit or delete submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormOutcome {
    #[serde(skip)]
    pub kind: OutcomeKind,
    pub success: bool,
    pub message: String,
    /// Submitted values, echoed back when the submission failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<ProductDraft>,
    /// The persisted product, on successful create or edit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    /// Messages per field, in field declaration order.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<ProductField, Vec<String>>,
}

impl FormOutcome {
    /// A successful outcome carrying the written product, if any.
    #[must_use]
    pub fn succeeded(message: impl Into<String>, product: Option<Product>) -> Self {
        Self {
            kind: OutcomeKind::Succeeded,
            success: true,
            message: message.into(),
            inputs: None,
            product,
            errors: BTreeMap::new(),
        }
    }

    /// A failure with no field-level detail.
    #[must_use]
    pub fn failed(message: impl Into<String>, inputs: Option<ProductDraft>) -> Self {
        Self {
            kind: OutcomeKind::Failed,
            success: false,
            message: message.into(),
            inputs,
            product: None,
            errors: BTreeMap::new(),
        }
    }

    /// A failure for a product that does not exist.
    #[must_use]
    pub fn not_found(message: impl Into<String>, inputs: Option<ProductDraft>) -> Self {
        Self {
            kind: OutcomeKind::NotFound,
            ..Self::failed(message, inputs)
        }
    }

    /// A failure carrying validation errors.
    #[must_use]
    pub fn invalid(message: impl Into<String>, inputs: ProductDraft, errors: &FieldErrors) -> Self {
        Self {
            kind: OutcomeKind::Invalid,
            errors: errors.messages(),
            ..Self::failed(message, Some(inputs))
        }
    }

    /// Add a message against one field. The outcome becomes [`OutcomeKind::Invalid`].
    #[must_use]
    pub fn with_field_error(mut self, field: ProductField, message: impl Into<String>) -> Self {
        self.kind = OutcomeKind::Invalid;
        self.errors.entry(field).or_default().push(message.into());
        self
    }

    /// Messages recorded for `field`.
    #[must_use]
    pub fn field_errors(&self, field: ProductField) -> &[String] {
        self.errors.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }
}
