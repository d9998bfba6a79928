//! # jobtrack_core
//!
//! Core domain logic for Jobtrack: models, the persistence port with its
//! Postgres and in-memory stores, job search, statistics and auth primitives.

pub mod auth;
pub mod jobs;
pub mod migrate;
pub mod models;
pub mod store;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
