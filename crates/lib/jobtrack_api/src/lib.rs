//! # jobtrack_api
//!
//! HTTP API library for Jobtrack: account and job routes over a pluggable
//! store.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, patch, post};
use jobtrack_core::store::{JobStore, UserStore};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{auth, jobs};
use crate::middleware::rate_limit::RateLimiter;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub jobs: Arc<dyn JobStore>,
    /// API configuration.
    pub config: ApiConfig,
    /// Register/login attempt counter.
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    /// State backed by a single store serving both users and jobs.
    pub fn new<S>(store: Arc<S>, config: ApiConfig) -> Self
    where
        S: UserStore + JobStore + 'static,
    {
        let limiter = Arc::new(RateLimiter::new(
            config.auth_rate_limit,
            config.auth_rate_window,
        ));
        Self {
            users: store.clone(),
            jobs: store,
            config,
            limiter,
        }
    }
}

/// Run embedded database migrations.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    jobtrack_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes, rate limited per source address
    let public = Router::new()
        .route(routes::POST_AUTH_REGISTER, post(auth::register_handler))
        .route(routes::POST_AUTH_LOGIN, post(auth::login_handler))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::limit_auth_attempts,
        ));

    // Protected routes (require auth)
    let protected = Router::new()
        .route(
            routes::PATCH_AUTH_UPDATE_USER,
            patch(auth::update_user_handler),
        )
        .route(
            routes::JOBS,
            post(jobs::create_job_handler).get(jobs::list_jobs_handler),
        )
        .route(routes::GET_JOBS_STATS, get(jobs::show_stats_handler))
        .route(
            routes::JOBS_ID,
            patch(jobs::update_job_handler).delete(jobs::delete_job_handler),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    let api = Router::new().merge(public).merge(protected);

    Router::new()
        .nest(routes::API_PREFIX, api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
