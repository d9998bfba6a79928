//! Authentication request handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use jobtrack_core::models::api::{AuthResponse, LoginRequest, RegisterRequest, UpdateUserRequest};

use crate::AppState;
use crate::error::AppResult;
use crate::extract;
use crate::middleware::auth::AuthenticatedUser;
use crate::services::auth;

/// `POST /auth/register`: create a new user account.
pub async fn register_handler(
    State(state): State<AppState>,
    extract::Json(body): extract::Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let resp = auth::register(state.users.as_ref(), &state.config, body).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

/// `POST /auth/login`: authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    extract::Json(body): extract::Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let resp = auth::login(state.users.as_ref(), &state.config, body).await?;
    Ok(Json(resp))
}

/// `PATCH /auth/updateUser`: replace the caller's profile.
pub async fn update_user_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    extract::Json(body): extract::Json<UpdateUserRequest>,
) -> AppResult<Json<AuthResponse>> {
    let resp = auth::update_user(state.users.as_ref(), &state.config, claims.sub, body).await?;
    Ok(Json(resp))
}
