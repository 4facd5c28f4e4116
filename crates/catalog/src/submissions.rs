//! Product form submissions.
//!
//! A submission flows form normalizer → schema validator → repository, and
//! always ends in a [`FormOutcome`]. Nothing here returns an error past the
//! pipeline: store failures become a generic message, and rejected input is
//! echoed back with its field errors so the form can be re-rendered.

use deskshop_core::validation::validate;
use deskshop_core::{FormFields, FormMode, FormOutcome, ProductDraft, ProductField, ProductId};

use crate::products::{ProductError, ProductRepository};

pub const INVALID_INPUT: &str = "Please correct the form input";
pub const DUPLICATE_TITLE: &str = "A product with this title already exists.";
pub const EMPTY_IMAGES: &str = "At least one image is required.";
pub const NOT_FOUND: &str = "Product not found";

/// Which write a submission performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Create,
    Update,
    Delete,
}

impl Action {
    const fn succeeded(self) -> &'static str {
        match self {
            Self::Create => "The product is created successfully",
            Self::Update => "The product is updated successfully",
            Self::Delete => "The product is deleted successfully",
        }
    }

    const fn failed(self) -> &'static str {
        match self {
            Self::Create => "Failed to add product",
            Self::Update => "Failed to update product",
            Self::Delete => "Failed to delete product",
        }
    }
}

/// Create, edit and delete pipeline over a [`ProductRepository`].
#[derive(Debug, Clone)]
pub struct ProductPipeline {
    products: ProductRepository,
}

impl ProductPipeline {
    #[must_use]
    pub const fn new(products: ProductRepository) -> Self {
        Self { products }
    }

    /// The repository submissions are written to.
    #[must_use]
    pub const fn products(&self) -> &ProductRepository {
        &self.products
    }

    /// Create or edit a product from a flat form submission.
    ///
    /// A non-empty `id` field makes the submission an edit.
    #[tracing::instrument(skip_all, fields(fields = fields.len()))]
    pub async fn submit(&self, fields: &FormFields) -> FormOutcome {
        let draft = ProductDraft::from_fields(fields);

        let record = match validate(&draft) {
            Ok(record) => record,
            Err(errors) => {
                tracing::debug!(fields = errors.len(), "Product form rejected");
                let no_images = draft.images.is_empty();
                let outcome = FormOutcome::invalid(INVALID_INPUT, draft, &errors);
                // The repository never sees a rejected draft, so report its image rule here too.
                return if no_images {
                    outcome.with_field_error(ProductField::Images, EMPTY_IMAGES)
                } else {
                    outcome
                };
            }
        };

        match draft.mode() {
            FormMode::Create => match self.products.create(record).await {
                Ok(product) => FormOutcome::succeeded(Action::Create.succeeded(), Some(product)),
                Err(e) => failure(Action::Create, &e, Some(draft)),
            },
            FormMode::Edit(id) => match self.products.update(&id, record).await {
                Ok(product) => FormOutcome::succeeded(Action::Update.succeeded(), Some(product)),
                Err(e) => failure(Action::Update, &e, Some(draft)),
            },
        }
    }

    /// Delete a product and its images.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &ProductId) -> FormOutcome {
        match self.products.delete(id).await {
            Ok(_) => FormOutcome::succeeded(Action::Delete.succeeded(), None),
            Err(e) => failure(Action::Delete, &e, None),
        }
    }
}

fn failure(action: Action, error: &ProductError, inputs: Option<ProductDraft>) -> FormOutcome {
    match error {
        ProductError::DuplicateTitle => FormOutcome::failed(INVALID_INPUT, inputs)
            .with_field_error(ProductField::Title, DUPLICATE_TITLE),
        ProductError::EmptyImageSet => FormOutcome::failed(INVALID_INPUT, inputs)
            .with_field_error(ProductField::Images, EMPTY_IMAGES),
        ProductError::NotFound => FormOutcome::not_found(NOT_FOUND, inputs),
        ProductError::StoreRead(_) | ProductError::StoreWrite(_) | ProductError::DataCorruption(_) => {
            tracing::error!(error = %error, ?action, "Product submission failed");
            FormOutcome::failed(action.failed(), inputs)
        }
    }
}
