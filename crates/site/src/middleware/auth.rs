//! Authentication middleware and extractors.
//!
//! Provides extractors that hand route handlers the admin capability stored in
//! the session.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::models::{AdminSession, session_keys};

/// Extractor that requires a logged-in admin.
///
/// Handlers that modify the catalog take this as an argument; without a valid
/// session the request is rejected before the handler runs.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdmin(admin): RequireAdmin,
/// ) -> impl IntoResponse {
///     format!("Hola, {}!", admin.username)
/// }
/// ```
pub struct RequireAdmin(pub AdminSession);

/// Error returned when admin authentication is required but missing.
#[derive(Debug)]
pub enum AdminRejection {
    /// No admin is logged in.
    Unauthorized,
    /// The session layer is missing from the router.
    SessionUnavailable,
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Admin login required" })),
            )
                .into_response(),
            Self::SessionUnavailable => {
                tracing::error!("Session layer missing from router");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminRejection::SessionUnavailable)?;

        let admin: AdminSession = session
            .get(session_keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten()
            .ok_or(AdminRejection::Unauthorized)?;

        Ok(Self(admin))
    }
}

/// Extractor that optionally gets the current admin.
///
/// Unlike `RequireAdmin`, this does not reject the request if no admin is
/// logged in.
pub struct OptionalAdmin(pub Option<AdminSession>);

impl<S> FromRequestParts<S> for OptionalAdmin
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let admin = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<AdminSession>(session_keys::CURRENT_ADMIN)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(admin))
    }
}

/// Store the admin capability in the session (login).
///
/// Cycles the session id first so a pre-login session id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &AdminSession,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Drop the session entirely (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
