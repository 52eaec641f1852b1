//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                              - Liveness check
//! GET    /health/ready                        - Store reachability
//!
//! # Catalog (public)
//! GET    /api/categories                      - Category slugs and titles
//! GET    /api/categories/{category}           - Products grouped by subcategory
//! GET    /api/featured                        - Featured products, display order
//!
//! # Auth
//! POST   /api/auth/login                      - Exchange credentials for a session
//! POST   /api/auth/logout                     - Drop the session
//! GET    /api/auth/session                    - Current admin, or null
//!
//! # Catalog (requires admin)
//! POST   /api/categories/{category}/products  - Add product
//! PATCH  /api/products/{id}                   - Update product
//! DELETE /api/products/{id}                   - Delete product
//! POST   /api/featured                        - Add featured product
//! PATCH  /api/featured/{id}                   - Update featured product
//! DELETE /api/featured/{id}                   - Delete featured product
//! POST   /api/featured/{id}/move              - Move one step up or down
//! ```

pub mod auth;
pub mod categories;
pub mod featured;
pub mod health;

use axum::Router;

use crate::error::AppError;
use crate::state::AppState;

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest(
            "/api",
            Router::new()
                .merge(categories::router())
                .merge(featured::router())
                .nest("/auth", auth::router()),
        )
}

/// Reject a required text field that is empty or whitespace.
fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(())
}

/// Reject a patch field that is present but blank.
fn reject_blank(field: &str, value: Option<&String>) -> Result<(), AppError> {
    value.map_or(Ok(()), |value| require_text(field, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        assert!(require_text("name", "Puerta colonial").is_ok());
        assert!(matches!(
            require_text("name", "   "),
            Err(AppError::BadRequest(msg)) if msg == "name is required"
        ));
    }

    #[test]
    fn test_reject_blank_allows_unset() {
        assert!(reject_blank("image", None).is_ok());
        assert!(reject_blank("image", Some(&String::new())).is_err());
    }
}
