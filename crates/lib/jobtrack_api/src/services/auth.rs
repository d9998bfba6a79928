//! Authentication service: register, login and profile update flows.

use jobtrack_core::auth::{jwt, password};
use jobtrack_core::models::api::{
    AuthResponse, LoginRequest, RegisterRequest, UpdateUserRequest,
};
use jobtrack_core::models::auth::{DEFAULT_LAST_NAME, NewUser, User, UserUpdate};
use jobtrack_core::models::job::DEFAULT_LOCATION;
use jobtrack_core::store::UserStore;
use tracing::info;
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};

/// Message for any request missing a required field.
pub const MISSING_VALUES: &str = "Please provide all values";

fn require_all(values: &[&str]) -> AppResult<()> {
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(AppError::Validation(MISSING_VALUES.into()));
    }
    Ok(())
}

/// Minimal shape check: one `@` with text on both sides and a dotted domain.
fn validate_email(email: &str) -> AppResult<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split('.')
                    .filter(|part| !part.is_empty())
                    .count()
                    >= 2
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(AppError::Validation("Please provide a valid email".into()));
    }
    Ok(())
}

/// Build the session payload for `user` with a fresh token.
fn session_for(user: User, config: &ApiConfig) -> AppResult<AuthResponse> {
    let token = jwt::generate_token(
        user.id,
        &user.name,
        config.jwt_secret.as_bytes(),
        config.jwt_lifetime_secs,
    )?;
    let location = user.location.clone();
    Ok(AuthResponse {
        user,
        token,
        location,
    })
}

/// Register a new user account.
pub async fn register(
    users: &dyn UserStore,
    config: &ApiConfig,
    req: RegisterRequest,
) -> AppResult<AuthResponse> {
    require_all(&[req.name.as_str(), req.email.as_str(), req.password.as_str()])?;
    validate_email(&req.email)?;
    password::validate_password(&req.password)?;

    if users.find_user_by_email(&req.email).await?.is_some() {
        return Err(AppError::Validation("Email already in use".into()));
    }

    let password_hash = password::hash_password(&req.password)?;
    let user = users
        .create_user(NewUser {
            name: req.name.trim().to_string(),
            email: req.email,
            password_hash,
            last_name: DEFAULT_LAST_NAME.to_string(),
            location: DEFAULT_LOCATION.to_string(),
        })
        .await?;

    info!(user_id = %user.id, "user registered");
    session_for(user, config)
}

/// Authenticate with email + password.
pub async fn login(
    users: &dyn UserStore,
    config: &ApiConfig,
    req: LoginRequest,
) -> AppResult<AuthResponse> {
    require_all(&[req.email.as_str(), req.password.as_str()])?;

    // Same message for unknown email and wrong password.
    let Some(found) = users.find_user_by_email(&req.email).await? else {
        return Err(AppError::Unauthorized("Invalid Credentials".into()));
    };
    password::verify_password(&req.password, &found.password_hash)?;

    info!(user_id = %found.user.id, "user logged in");
    session_for(found.user, config)
}

/// Replace the authenticated user's profile and issue a fresh token.
pub async fn update_user(
    users: &dyn UserStore,
    config: &ApiConfig,
    user_id: Uuid,
    req: UpdateUserRequest,
) -> AppResult<AuthResponse> {
    require_all(&[
        req.email.as_str(),
        req.name.as_str(),
        req.last_name.as_str(),
        req.location.as_str(),
    ])?;
    validate_email(&req.email)?;

    let user = users
        .update_user(
            user_id,
            UserUpdate {
                name: req.name.trim().to_string(),
                email: req.email,
                last_name: req.last_name.trim().to_string(),
                location: req.location.trim().to_string(),
            },
        )
        .await?;

    info!(user_id = %user.id, "user profile updated");
    session_for(user, config)
}
