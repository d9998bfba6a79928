//! API configuration.
//!
//! Listener address and database URL belong to the server binary; this holds
//! what the router itself needs.

use std::time::Duration;

use jobtrack_core::auth::jwt::{DEFAULT_TOKEN_LIFETIME_SECS, resolve_jwt_secret};

/// Default register/login attempts allowed per window and source address.
pub const DEFAULT_AUTH_RATE_LIMIT: u32 = 10;

/// Default register/login rate-limit window: 15 minutes.
pub const DEFAULT_AUTH_RATE_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Configuration for the API router.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Bearer token lifetime in seconds.
    pub jwt_lifetime_secs: i64,
    /// Register/login requests allowed per window and source address.
    pub auth_rate_limit: u32,
    /// Length of the register/login rate-limit window.
    pub auth_rate_window: Duration,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                 | Default                       |
    /// |--------------------------|-------------------------------|
    /// | `JWT_SECRET`             | generated & persisted to file |
    /// | `JWT_LIFETIME_SECS`      | `86400`                       |
    /// | `AUTH_RATE_LIMIT`        | `10`                          |
    /// | `AUTH_RATE_WINDOW_SECS`  | `900`                         |
    pub fn from_env() -> Self {
        Self::from_lookup(resolve_jwt_secret(), |key| std::env::var(key).ok())
    }

    /// Builds the configuration from `lookup`, falling back to defaults for
    /// missing or unparsable values.
    pub fn from_lookup(jwt_secret: String, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());
        Self {
            jwt_secret,
            jwt_lifetime_secs: lookup("JWT_LIFETIME_SECS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS),
            auth_rate_limit: parsed("AUTH_RATE_LIMIT")
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(DEFAULT_AUTH_RATE_LIMIT),
            auth_rate_window: parsed("AUTH_RATE_WINDOW_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_AUTH_RATE_WINDOW),
        }
    }

    /// Configuration for tests and embedded servers: fixed secret, defaults
    /// everywhere else.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self::from_lookup(secret.into(), |_| None)
    }
}
