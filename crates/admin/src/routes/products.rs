//! Product route handlers.
//!
//! Create and edit share one endpoint: the submitted form decides the mode
//! through its `id` field. Every submission answers with a `FormOutcome`.

use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use deskshop_core::format::{format_percentage, format_price};
use deskshop_core::{FormFields, FormOutcome, OutcomeKind, Product, ProductDraft, ProductId};
use serde::Serialize;
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// Product row for the admin product list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummaryView {
    pub id: String,
    pub title: String,
    pub brand: String,
    pub category: String,
    pub price: String,
    pub discount: String,
    pub stock: u32,
    pub availability_status: String,
    pub thumbnail: Option<String>,
}

/// Product detail with the values to prefill the edit form.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetailView {
    pub product: Product,
    pub form: ProductDraft,
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&Product> for ProductSummaryView {
    fn from(product: &Product) -> Self {
        let record = &product.record;
        Self {
            id: product.id.to_string(),
            title: record.title.clone(),
            brand: record.brand.clone(),
            category: record.category.to_string(),
            price: format_price(Some(record.price)),
            discount: format_percentage(record.discount_percentage),
            stock: record.stock,
            availability_status: record.availability_status.to_string(),
            thumbnail: product.thumbnail().map(str::to_owned),
        }
    }
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            product: product.clone(),
            form: ProductDraft::from_product(product),
        }
    }
}

/// A `FormOutcome` sent with a status code matching its kind.
#[derive(Debug)]
pub struct OutcomeResponse(pub FormOutcome);

impl IntoResponse for OutcomeResponse {
    fn into_response(self) -> Response {
        let status = match self.0.kind {
            OutcomeKind::Succeeded => StatusCode::OK,
            OutcomeKind::Invalid => StatusCode::UNPROCESSABLE_ENTITY,
            OutcomeKind::NotFound => StatusCode::NOT_FOUND,
            OutcomeKind::Failed => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self.0)).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// List all products.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<ProductSummaryView>>, AppError> {
    let products = state.products().get_all().await?;
    Ok(Json(products.iter().map(ProductSummaryView::from).collect()))
}

/// Show one product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductDetailView>, AppError> {
    let product = state
        .products()
        .get_by_id(&ProductId::new(id.clone()))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(Json(ProductDetailView::from(&product)))
}

/// Create or edit a product from the urlencoded product form.
#[instrument(skip(state, pairs), fields(fields = pairs.len()))]
pub async fn submit(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> OutcomeResponse {
    let fields = FormFields::from(pairs);
    OutcomeResponse(state.pipeline().submit(&fields).await)
}

/// Delete a product and its images.
#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> OutcomeResponse {
    OutcomeResponse(state.pipeline().delete(&ProductId::new(id)).await)
}
