//! Login and logout endpoints.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    Json,
};

use serde::{Deserialize, Serialize};

use crate::auth::constant_time_compare;
use crate::errors::AppError;
use crate::AppState;

/// Request body for `POST /api/admin/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response body for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// POST /api/admin/login - Exchange admin credentials for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    // Bitwise AND so both comparisons always run
    let ok = constant_time_compare(&request.username, &state.config.admin_username)
        & constant_time_compare(&request.password, &state.config.admin_password);

    if !ok {
        tracing::warn!("Failed login attempt for user {:?}", request.username);
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let access_token = state
        .sessions
        .issue(&request.username, state.config.session_ttl_secs);
    tracing::info!("Issued session for {}", request.username);

    Ok(Json(LoginResponse { access_token }))
}

/// POST /api/admin/logout - Invalidate the presented bearer token.
///
/// The frontend also drops the token locally; this just makes sure the
/// server-side session cannot be replayed.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Json<serde_json::Value> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
    {
        state.sessions.revoke(token);
    }

    Json(serde_json::json!({ "success": true }))
}
