//! Authentication domain models.
//!
//! `User` is the public profile returned to clients; the password hash only
//! travels inside `UserWithPassword` and is never serialized.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default last name for newly registered users.
pub const DEFAULT_LAST_NAME: &str = "lastName";

/// Public user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub last_name: String,
    pub location: String,
}

/// User with password hash (for internal auth flows).
#[derive(Debug, Clone)]
pub struct UserWithPassword {
    pub user: User,
    pub password_hash: String,
}

/// Fields for a new account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub last_name: String,
    pub location: String,
}

/// Profile fields replaced by `PATCH /auth/updateUser`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub last_name: String,
    pub location: String,
}

/// JWT claims embedded in bearer tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: user ID (standard JWT `sub` claim).
    pub sub: Uuid,
    /// Display name at issue time.
    pub name: String,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}
