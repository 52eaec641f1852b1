//! Category and product route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use serde::{Deserialize, Serialize};

use herreria_core::ordering::group_by_subcategory;
use herreria_core::{Category, NewProduct, Product, ProductId, ProductPatch};

use super::{reject_blank, require_text};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Build the category router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(index))
        .route("/categories/{category}", get(show))
        .route("/categories/{category}/products", post(create_product))
        .route(
            "/products/{id}",
            patch(update_product).delete(delete_product),
        )
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// A category as listed in navigation.
#[derive(Debug, Serialize)]
pub struct CategorySummary {
    pub slug: &'static str,
    pub title: &'static str,
}

impl From<Category> for CategorySummary {
    fn from(category: Category) -> Self {
        Self {
            slug: category.slug(),
            title: category.title(),
        }
    }
}

/// One subcategory section of a category page.
#[derive(Debug, Serialize)]
pub struct SubcategoryGroup {
    pub name: String,
    pub products: Vec<Product>,
}

/// Response for a category page.
#[derive(Debug, Serialize)]
pub struct CategoryPage {
    pub category: CategorySummary,
    pub subcategories: Vec<SubcategoryGroup>,
}

/// Request to add a product. The category comes from the path.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub image: String,
    pub subcategory: String,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Response for a newly added record.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

// =============================================================================
// Route Handlers
// =============================================================================

/// List every category.
///
/// GET /api/categories
async fn index() -> Json<Vec<CategorySummary>> {
    Json(Category::ALL.iter().copied().map(Into::into).collect())
}

/// Products in one category, grouped by subcategory.
///
/// GET /api/categories/:category
///
/// A store failure shows up as an empty page, same as an empty category.
async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CategoryPage>> {
    let category = parse_category(&slug)?;
    let products = state.catalog().list_by_category(category).await;

    let subcategories = group_by_subcategory(products)
        .into_iter()
        .map(|(name, products)| SubcategoryGroup { name, products })
        .collect();

    Ok(Json(CategoryPage {
        category: category.into(),
        subcategories,
    }))
}

/// Add a product to a category.
///
/// POST /api/categories/:category/products
async fn create_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(slug): Path<String>,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let category = parse_category(&slug)?;
    require_text("name", &request.name)?;
    require_text("image", &request.image)?;
    require_text("subcategory", &request.subcategory)?;

    let product = NewProduct {
        name: request.name,
        image: request.image,
        category,
        subcategory: request.subcategory,
        price: request.price,
        description: request.description,
    };

    let id = state
        .catalog()
        .add(product)
        .await
        .ok_or_else(|| AppError::Store("Could not save product".to_string()))?;

    tracing::info!(admin = %admin.username, id = %id, "Product created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: id.into_inner(),
        }),
    ))
}

/// Apply a partial update to a product.
///
/// PATCH /api/products/:id
async fn update_product(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> Result<StatusCode> {
    reject_blank("name", patch.name.as_ref())?;
    reject_blank("image", patch.image.as_ref())?;
    reject_blank("subcategory", patch.subcategory.as_ref())?;

    if state.catalog().update(&ProductId::new(id), patch).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Store("Could not update product".to_string()))
    }
}

/// Delete a product.
///
/// DELETE /api/products/:id
async fn delete_product(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if state.catalog().remove(&ProductId::new(id)).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Store("Could not delete product".to_string()))
    }
}

fn parse_category(slug: &str) -> Result<Category> {
    slug.parse()
        .map_err(|_| AppError::NotFound(format!("Unknown category: {slug}")))
}
