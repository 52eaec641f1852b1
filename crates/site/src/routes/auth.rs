//! Admin authentication route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::middleware::{OptionalAdmin, clear_current_admin, set_current_admin};
use crate::models::AdminSession;
use crate::services::AuthError;
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/session", get(current))
}

/// Login request body.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: SecretString,
}

/// The signed-in admin, or `null`.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub admin: Option<AdminSession>,
}

/// Exchange admin credentials for a session.
///
/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>> {
    let admin = state
        .authenticator()
        .authenticate(&request.username, request.password.expose_secret())?;

    set_current_admin(&session, &admin)
        .await
        .map_err(AuthError::from)?;

    Ok(Json(SessionResponse { admin: Some(admin) }))
}

/// Drop the admin session.
///
/// POST /api/auth/logout
async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_admin(&session)
        .await
        .map_err(|e| AppError::Auth(AuthError::Session(e)))?;

    tracing::info!("Admin logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// Report who is signed in.
///
/// GET /api/auth/session
async fn current(OptionalAdmin(admin): OptionalAdmin) -> Json<SessionResponse> {
    Json(SessionResponse { admin })
}
