//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for the back-office login and logout.

use crate::web::protocol::{AuthResponse, LoginRequest};
use crate::web::state::AppState;
use argon2::{
    password_hash::{PasswordHash, PasswordVerifier},
    Argon2,
};
use axum::{
    extract::{Extension, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Utc};
use recipe_catalog_core::domain::AuthSession;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

const SESSION_DAYS: i64 = 30;

/// Reads the auth session id out of the `Cookie` header.
pub fn session_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())?
        .split(';')
        .find_map(|c| c.trim().strip_prefix("session="))
        .filter(|id| !id.is_empty())
}

/// Checks a password against the configured argon2 PHC string.
fn password_matches(password: &str, phc: &str) -> Result<bool, (StatusCode, String)> {
    let parsed_hash = PasswordHash::new(phc).map_err(|e| {
        error!("Failed to parse the admin password hash: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Authentication error".to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/login - Open a back-office session
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 1. Verify the credentials against the configured admin account
    let known_user = req.username == state.config.admin_username;
    if !known_user || !password_matches(&req.password, &state.config.admin_password_hash)? {
        warn!("Rejected back-office login for '{}'.", req.username);
        return Err((
            StatusCode::UNAUTHORIZED,
            "Invalid username or password".to_string(),
        ));
    }

    // 2. Drop sessions that ran out, then store a new one
    match state.sessions.delete_expired_auth_sessions().await {
        Ok(0) => {}
        Ok(pruned) => info!("Pruned {} expired back-office sessions.", pruned),
        Err(e) => warn!("Failed to prune expired auth sessions: {:?}", e),
    }

    let auth_session_id = Uuid::new_v4().to_string();
    let expires_at = Utc::now() + Duration::days(SESSION_DAYS);
    state
        .sessions
        .create_auth_session(&auth_session_id, &req.username, expires_at)
        .await
        .map_err(|e| {
            error!("Failed to create auth session: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create session".to_string())
        })?;
    info!("Back-office session opened for '{}'.", req.username);

    // 3. Return the session cookie
    let cookie = format!(
        "session={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        auth_session_id,
        Duration::days(SESSION_DAYS).num_seconds()
    );
    let response = AuthResponse {
        username: req.username,
        expires_at,
    };

    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(response)))
}

/// POST /auth/logout - Close the current session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 401, description = "No active session")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let auth_session_id = session_cookie(&headers)
        .ok_or((StatusCode::UNAUTHORIZED, "No session found".to_string()))?;

    state
        .sessions
        .delete_auth_session(auth_session_id)
        .await
        .map_err(|e| {
            error!("Failed to delete auth session: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to logout".to_string())
        })?;

    let cookie = "session=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0";
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie.to_string())]))
}

/// GET /auth/session - The session the request was authenticated with
#[utoipa::path(
    get,
    path = "/auth/session",
    responses(
        (status = 200, description = "The current session", body = AuthResponse),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn session_handler(Extension(session): Extension<AuthSession>) -> Json<AuthResponse> {
    Json(AuthResponse {
        username: session.username,
        expires_at: session.expires_at,
    })
}
