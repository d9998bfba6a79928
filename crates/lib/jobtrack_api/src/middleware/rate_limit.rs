//! Fixed-window rate limiting for the register and login endpoints.
//!
//! Each source address may make `max_requests` calls per window; the window
//! starts with the first request and resets once it has fully elapsed.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use dashmap::DashMap;
use tracing::warn;

use crate::AppState;
use crate::error::AppError;

/// Message returned once a source address exhausts its window.
pub const RATE_LIMIT_MESSAGE: &str =
    "Too many requests from this IP address, please try again after 15 minutes.";

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    hits: u32,
}

/// Per-key fixed-window request counter.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: DashMap<String, Window>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: DashMap::new(),
        }
    }

    /// Record a request from `key`; `false` when it exceeds the limit.
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    /// [`check`](Self::check) at an explicit instant.
    pub fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            started: now,
            hits: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                hits: 0,
            };
        }
        if entry.hits >= self.max_requests {
            return false;
        }
        entry.hits += 1;
        true
    }

    /// Drop windows that have fully elapsed.
    pub fn prune(&self) {
        let now = Instant::now();
        self.windows
            .retain(|_, w| now.duration_since(w.started) < self.window);
    }
}

/// Source address of a request: the peer address when the server was started
/// with connect info, otherwise the first `X-Forwarded-For` hop.
fn client_key(request: &Request) -> String {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Axum middleware: rejects requests beyond the per-address limit.
pub async fn limit_auth_attempts(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = client_key(&request);
    if !state.limiter.check(&key) {
        warn!(client = %key, path = %request.uri().path(), "auth rate limit exceeded");
        return Err(AppError::TooManyRequests(RATE_LIMIT_MESSAGE.into()));
    }
    Ok(next.run(request).await)
}
