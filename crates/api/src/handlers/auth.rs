//! Handlers for the `/auth` resource (login, refresh, logout, current user).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use sitetrack_db::models::user::Personnel;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::auth::{
    self as service, AuthResponse, LoginRequest, RefreshRequest, UpdateProfile,
};
use crate::state::AppState;

/// POST /api/auth/login
///
/// Authenticate with email + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let response = service::login(&state.pool, &state.config.jwt, &input).await?;
    Ok(Json(DataResponse::new(response)))
}

/// POST /api/auth/refresh
///
/// Exchange a refresh token for a new token pair. The old token is revoked.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let response = service::refresh(&state.pool, &state.config.jwt, &input).await?;
    Ok(Json(DataResponse::new(response)))
}

/// POST /api/auth/logout
///
/// Revoke every session of the caller.
pub async fn logout(auth: AuthUser, State(state): State<AppState>) -> AppResult<StatusCode> {
    service::logout(&state.pool, &auth.caller()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/current-user
pub async fn current_user(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Personnel>>> {
    let user = service::current_user(&state.pool, &auth.caller()).await?;
    Ok(Json(DataResponse::new(user)))
}

/// PUT /api/auth/current-user
pub async fn update_current_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<DataResponse<Personnel>>> {
    let user = service::update_current_user(&state.pool, &auth.caller(), &input).await?;
    Ok(Json(DataResponse::new(user)))
}
