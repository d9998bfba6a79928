//! Job search and statistics logic shared by every store.

pub mod query;
pub mod stats;

pub use query::{JobQuery, JobQueryParams, JobSort};
