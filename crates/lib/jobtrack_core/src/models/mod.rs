//! Domain models shared by the API, the stores and the client.

pub mod api;
pub mod auth;
pub mod job;
pub mod stats;
