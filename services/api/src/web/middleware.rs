//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting the back-office routes.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

use crate::web::auth::session_cookie;
use crate::web::state::AppState;

/// Middleware that validates the auth session cookie.
///
/// If valid, inserts the `AuthSession` into request extensions for handlers to use.
/// If invalid, expired or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_session_id = session_cookie(req.headers())
        .ok_or(StatusCode::UNAUTHORIZED)?
        .to_string();

    let session = state
        .sessions
        .validate_auth_session(&auth_session_id)
        .await
        .map_err(|e| {
            warn!("Failed to validate auth session: {:?}", e);
            StatusCode::UNAUTHORIZED
        })?;

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}
