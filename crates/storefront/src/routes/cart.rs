//! Cart route handlers.
//!
//! The cart is a `deskshop_core::Cart` stored in the visitor's session. Every
//! handler loads it, applies one `CartAction`, saves it back, and answers
//! with the updated cart.

use axum::{Json, extract::State};
use deskshop_core::cart::addable_quantity;
use deskshop_core::format::format_price;
use deskshop_core::{Cart, CartAction, CartItem, NewCartItem, ProductId};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::models::session_keys;
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
    pub price: String,
    pub line_total: String,
    pub quantity: u32,
    pub stock: u32,
    /// The line already holds every unit in stock.
    pub at_stock: bool,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total_items: u64,
    pub total_price: String,
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&CartItem> for CartLineView {
    fn from(line: &CartItem) -> Self {
        Self {
            id: line.id.to_string(),
            name: line.name.clone(),
            thumbnail: line.thumbnail.clone(),
            price: format_price(Some(line.price)),
            line_total: format_price(Some(line.line_total())),
            quantity: line.quantity,
            stock: line.stock,
            at_stock: line.quantity >= line.stock,
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            total_items: cart.total_items(),
            total_price: format_price(Some(cart.total_price())),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart from the session, empty when the visitor has none yet.
///
/// # Errors
///
/// Returns error if the session store cannot be read.
pub async fn load_cart(session: &Session) -> Result<Cart, AppError> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Store the cart in the session.
async fn save_cart(session: &Session, cart: &Cart) -> Result<(), AppError> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

/// Apply one action to the session cart and return the result.
async fn update_cart(session: &Session, action: CartAction) -> Result<Json<CartView>, AppError> {
    let mut cart = load_cart(session).await?;
    cart.apply(action);
    save_cart(session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

// =============================================================================
// Request Bodies
// =============================================================================

const fn default_quantity() -> u32 {
    1
}

/// Add to cart request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// Request naming one cart line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineRequest {
    pub product_id: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Show the cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>, AppError> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Add a product to the cart.
///
/// The quantity is capped so the line never exceeds the product's stock.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>, AppError> {
    if request.quantity == 0 {
        return Err(AppError::BadRequest("quantity must be at least 1".to_string()));
    }

    let id = ProductId::new(request.product_id);
    let product = state
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let mut cart = load_cart(&session).await?;
    let in_cart = cart.line(&id).map_or(0, |line| line.quantity);
    let quantity = addable_quantity(request.quantity, product.record.stock, in_cart);

    if quantity < request.quantity {
        tracing::debug!(
            product_id = %id,
            requested = request.quantity,
            added = quantity,
            "Capped cart quantity at stock"
        );
    }

    cart.apply(CartAction::Add {
        item: NewCartItem::from_product(&product),
        quantity,
    });
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// One more of a line, unless the line already holds all stock.
#[instrument(skip(session))]
pub async fn increase(
    session: Session,
    Json(request): Json<CartLineRequest>,
) -> Result<Json<CartView>, AppError> {
    let id = ProductId::new(request.product_id);
    let mut cart = load_cart(&session).await?;

    let at_stock = cart
        .line(&id)
        .is_some_and(|line| line.quantity >= line.stock);
    if !at_stock {
        cart.apply(CartAction::Increase(id));
        save_cart(&session, &cart).await?;
    }

    Ok(Json(CartView::from(&cart)))
}

/// One fewer of a line, never below one.
#[instrument(skip(session))]
pub async fn decrease(
    session: Session,
    Json(request): Json<CartLineRequest>,
) -> Result<Json<CartView>, AppError> {
    update_cart(&session, CartAction::Decrease(ProductId::new(request.product_id))).await
}

/// Drop a line.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(request): Json<CartLineRequest>,
) -> Result<Json<CartView>, AppError> {
    update_cart(&session, CartAction::Remove(ProductId::new(request.product_id))).await
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartView>, AppError> {
    update_cart(&session, CartAction::Clear).await
}
