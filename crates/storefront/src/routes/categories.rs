//! Category route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use deskshop_core::Category;
use serde::Serialize;
use tracing::instrument;

use crate::error::AppError;
use crate::routes::products::ProductCardView;
use crate::state::AppState;

/// A category link.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub name: &'static str,
    pub slug: &'static str,
}

/// A category page: the category and its products.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryPageView {
    #[serde(flatten)]
    pub category: CategoryView,
    pub products: Vec<ProductCardView>,
}

impl From<Category> for CategoryView {
    fn from(category: Category) -> Self {
        Self {
            name: category.label(),
            slug: category.slug(),
        }
    }
}

/// List every category.
pub async fn index() -> Json<Vec<CategoryView>> {
    Json(Category::ALL.iter().copied().map(CategoryView::from).collect())
}

/// Products in one category.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CategoryPageView>, AppError> {
    let category = Category::from_slug(&slug)
        .ok_or_else(|| AppError::NotFound(format!("category {slug}")))?;

    let products = state.products().get_by_category(category).await?;

    Ok(Json(CategoryPageView {
        category: CategoryView::from(category),
        products: products.iter().map(ProductCardView::from).collect(),
    }))
}
