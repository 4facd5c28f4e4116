//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use deskshop_core::format::{
    discounted_price, display_title, format_dimensions, format_percentage, format_price,
};
use deskshop_core::cart::addable_quantity;
use deskshop_core::{Product, ProductId};
use rust_decimal::Decimal;
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::routes::cart::load_cart;
use crate::state::AppState;

/// Product card shown in category listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCardView {
    pub id: String,
    pub title: String,
    pub brand: String,
    pub price: String,
    pub discounted_price: Option<String>,
    pub thumbnail: Option<String>,
    pub availability_status: String,
}

/// Product detail page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub category_slug: &'static str,
    pub brand: String,
    pub price: String,
    /// Present only when a positive discount applies.
    pub discounted_price: Option<String>,
    pub discount: String,
    pub stock: u32,
    pub weight: String,
    pub dimensions: String,
    pub material: Option<String>,
    pub color: Option<String>,
    pub pack_quantity: Option<u32>,
    pub page_count: Option<u32>,
    pub warranty_information: String,
    pub shipping_information: String,
    pub availability_status: String,
    pub return_policy: String,
    pub minimum_order_quantity: u32,
    pub images: Vec<String>,
    pub qr_code: Option<String>,
}

/// Product detail plus what the visitor's cart already holds of it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPageView {
    #[serde(flatten)]
    pub product: ProductDetailView,
    pub in_cart: u32,
    /// Largest quantity the add-to-cart control should offer.
    pub addable: u32,
}

// =============================================================================
// Type Conversions
// =============================================================================

/// Formatted sale price, when the discount changes the price.
fn sale_price(product: &Product) -> Option<String> {
    let record = &product.record;
    record
        .discount_percentage
        .filter(|discount| *discount > Decimal::ZERO)
        .map(|_| format_price(Some(discounted_price(record.price, record.discount_percentage))))
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        let record = &product.record;
        Self {
            id: product.id.to_string(),
            title: display_title(&record.brand, &record.title),
            brand: record.brand.clone(),
            price: format_price(Some(record.price)),
            discounted_price: sale_price(product),
            thumbnail: product.thumbnail().map(str::to_owned),
            availability_status: record.availability_status.to_string(),
        }
    }
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        let record = &product.record;
        Self {
            id: product.id.to_string(),
            title: display_title(&record.brand, &record.title),
            description: record.description.clone(),
            category: record.category.to_string(),
            category_slug: record.category.slug(),
            brand: record.brand.clone(),
            price: format_price(Some(record.price)),
            discounted_price: sale_price(product),
            discount: format_percentage(record.discount_percentage),
            stock: record.stock,
            weight: format!("{} kg", record.weight.normalize()),
            dimensions: format_dimensions(&record.dimensions),
            material: record.material.clone(),
            color: record.color.clone(),
            pack_quantity: record.pack_quantity,
            page_count: record.page_count,
            warranty_information: record.warranty_information.clone(),
            shipping_information: record.shipping_information.clone(),
            availability_status: record.availability_status.to_string(),
            return_policy: record.return_policy.to_string(),
            minimum_order_quantity: record.minimum_order_quantity,
            images: record.images.clone(),
            qr_code: product.meta.qr_code.clone(),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Show one product.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<ProductPageView>, AppError> {
    let product = state
        .products()
        .get_by_id(&ProductId::new(id.clone()))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let cart = load_cart(&session).await?;
    let in_cart = cart.line(&product.id).map_or(0, |line| line.quantity);

    Ok(Json(ProductPageView {
        product: ProductDetailView::from(&product),
        in_cart,
        addable: addable_quantity(u32::MAX, product.record.stock, in_cart),
    }))
}
