//! Persistence port.
//!
//! Handlers talk to users and jobs through [`UserStore`] and [`JobStore`].
//! [`PgStore`] is the production implementation; [`MemoryStore`] backs tests
//! and `--memory` server runs.

pub mod memory;
pub mod pg;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::jobs::JobQuery;
use crate::models::auth::{NewUser, User, UserUpdate, UserWithPassword};
use crate::models::job::{Job, JobUpdate, NewJob};
use crate::models::stats::{MonthCount, StatusCount};

pub use memory::MemoryStore;
pub use pg::PgStore;

/// Persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// User accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. Fails with `Duplicate` when the email is taken.
    async fn create_user(&self, new: NewUser) -> StoreResult<User>;

    /// Look up a user and password hash by email.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserWithPassword>>;

    /// Fetch a user by ID.
    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Replace a user's profile fields. Fails with `Duplicate` when the new
    /// email belongs to another account.
    async fn update_user(&self, id: Uuid, update: UserUpdate) -> StoreResult<User>;
}

/// Job records, always owner-scoped on read.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a job owned by `owner`.
    async fn create_job(&self, owner: Uuid, new: NewJob) -> StoreResult<Job>;

    /// Fetch a job by ID regardless of owner (callers check ownership).
    async fn get_job(&self, id: Uuid) -> StoreResult<Option<Job>>;

    /// All jobs matching `query`, in the query's order.
    async fn find_jobs(&self, query: &JobQuery) -> StoreResult<Vec<Job>>;

    /// Replace a job's mutable fields. Last write wins.
    async fn update_job(&self, id: Uuid, update: JobUpdate) -> StoreResult<Job>;

    /// Remove a job.
    async fn delete_job(&self, id: Uuid) -> StoreResult<()>;

    /// Job count per status present for `owner`.
    async fn status_counts(&self, owner: Uuid) -> StoreResult<Vec<StatusCount>>;

    /// Job count per creation month for `owner`, newest first, at most `limit`.
    async fn monthly_counts(&self, owner: Uuid, limit: usize) -> StoreResult<Vec<MonthCount>>;
}
