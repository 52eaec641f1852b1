//! Featured product route handlers.
//!
//! The landing page shows a curated list. Admins add, edit, remove and
//! reorder it one step at a time.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use serde::{Deserialize, Serialize};

use herreria_core::{
    Direction, FeaturedProduct, FeaturedProductId, FeaturedProductPatch, NewFeaturedProduct,
};

use super::categories::CreatedResponse;
use super::{reject_blank, require_text};
use crate::catalog::MoveOutcome;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Build the featured products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/featured", get(index).post(create))
        .route("/featured/{id}", patch(update).delete(delete))
        .route("/featured/{id}/move", post(move_one))
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Request to move a featured product one step.
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub direction: Direction,
}

/// Response for a move: what happened and the list as it now reads.
#[derive(Debug, Serialize)]
pub struct MoveResponse {
    #[serde(flatten)]
    pub outcome: MoveOutcome,
    pub featured: Vec<FeaturedProduct>,
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Featured products in display order.
///
/// GET /api/featured
async fn index(State(state): State<AppState>) -> Json<Vec<FeaturedProduct>> {
    Json(state.catalog().list_featured().await)
}

/// Add a featured product.
///
/// POST /api/featured
async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(product): Json<NewFeaturedProduct>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    require_text("name", &product.name)?;
    require_text("image", &product.image)?;

    let id = state
        .catalog()
        .add_featured(product)
        .await
        .ok_or_else(|| AppError::Store("Could not save featured product".to_string()))?;

    tracing::info!(admin = %admin.username, id = %id, "Featured product created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: id.into_inner(),
        }),
    ))
}

/// Apply a partial update to a featured product.
///
/// PATCH /api/featured/:id
async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
    Json(patch): Json<FeaturedProductPatch>,
) -> Result<StatusCode> {
    reject_blank("name", patch.name.as_ref())?;
    reject_blank("image", patch.image.as_ref())?;

    if state
        .catalog()
        .update_featured(&FeaturedProductId::new(id), patch)
        .await
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Store(
            "Could not update featured product".to_string(),
        ))
    }
}

/// Delete a featured product.
///
/// DELETE /api/featured/:id
async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if state
        .catalog()
        .remove_featured(&FeaturedProductId::new(id))
        .await
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Store(
            "Could not delete featured product".to_string(),
        ))
    }
}

/// Move a featured product one step up or down.
///
/// POST /api/featured/:id/move
///
/// The move is planned against a fresh read of the list, so the neighbour is
/// whatever sits next to the record right now. Moving the first record up or
/// the last one down answers `unchanged` without writing.
async fn move_one(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<MoveResponse>> {
    let catalog = state.catalog();
    let id = FeaturedProductId::new(id);

    let displayed = catalog.list_featured().await;
    let outcome = catalog
        .move_featured(&displayed, &id, request.direction)
        .await;

    if let MoveOutcome::Incomplete {
        record_written,
        neighbour_written,
    } = outcome
    {
        tracing::error!(
            admin = %admin.username,
            id = %id,
            record_written,
            neighbour_written,
            "Featured reorder left the list inconsistent"
        );
        return Err(AppError::Store(
            "Reorder only partially applied; reload and check the list".to_string(),
        ));
    }

    Ok(Json(MoveResponse {
        outcome,
        featured: catalog.list_featured().await,
    }))
}
