//! In-memory store.
//!
//! Keeps rows in insertion order so unsorted queries behave like the
//! Postgres default ordering. Nothing persists across restarts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{JobStore, StoreError, StoreResult, UserStore};
use crate::jobs::{JobQuery, stats};
use crate::models::auth::{NewUser, User, UserUpdate, UserWithPassword};
use crate::models::job::{Job, JobUpdate, NewJob};
use crate::models::stats::{MonthCount, StatusCount};
use crate::uuid::uuidv7;

/// Store holding users and jobs in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<UserWithPassword>>,
    jobs: RwLock<Vec<Job>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a job with an explicit creation time.
    pub async fn create_job_at(&self, owner: Uuid, new: NewJob, created_at: DateTime<Utc>) -> Job {
        let job = Job {
            id: uuidv7(),
            company: new.company,
            position: new.position,
            status: new.status,
            job_type: new.job_type,
            job_location: new.job_location,
            created_by: owner,
            created_at,
            updated_at: created_at,
        };
        self.jobs.write().await.push(job.clone());
        job
    }

    async fn owned_jobs(&self, owner: Uuid) -> Vec<Job> {
        self.jobs
            .read()
            .await
            .iter()
            .filter(|j| j.created_by == owner)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new: NewUser) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.user.email == new.email) {
            return Err(StoreError::Duplicate(new.email));
        }
        let user = User {
            id: uuidv7(),
            name: new.name,
            email: new.email,
            last_name: new.last_name,
            location: new.location,
        };
        users.push(UserWithPassword {
            user: user.clone(),
            password_hash: new.password_hash,
        });
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserWithPassword>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.user.email == email).cloned())
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.user.id == id).map(|u| u.user.clone()))
    }

    async fn update_user(&self, id: Uuid, update: UserUpdate) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|u| u.user.id != id && u.user.email == update.email)
        {
            return Err(StoreError::Duplicate(update.email));
        }
        let entry = users
            .iter_mut()
            .find(|u| u.user.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("user {id}")))?;
        entry.user.name = update.name;
        entry.user.email = update.email;
        entry.user.last_name = update.last_name;
        entry.user.location = update.location;
        Ok(entry.user.clone())
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn create_job(&self, owner: Uuid, new: NewJob) -> StoreResult<Job> {
        Ok(self.create_job_at(owner, new, Utc::now()).await)
    }

    async fn get_job(&self, id: Uuid) -> StoreResult<Option<Job>> {
        let jobs = self.jobs.read().await;
        Ok(jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn find_jobs(&self, query: &JobQuery) -> StoreResult<Vec<Job>> {
        let mut found: Vec<Job> = self
            .jobs
            .read()
            .await
            .iter()
            .filter(|j| query.matches(j))
            .cloned()
            .collect();
        query.sort_jobs(&mut found);
        Ok(found)
    }

    async fn update_job(&self, id: Uuid, update: JobUpdate) -> StoreResult<Job> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        job.company = update.company;
        job.position = update.position;
        job.status = update.status;
        job.job_type = update.job_type;
        job.job_location = update.job_location;
        job.updated_at = Utc::now();
        Ok(job.clone())
    }

    async fn delete_job(&self, id: Uuid) -> StoreResult<()> {
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|j| j.id != id);
        if jobs.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn status_counts(&self, owner: Uuid) -> StoreResult<Vec<StatusCount>> {
        Ok(stats::group_by_status(&self.owned_jobs(owner).await))
    }

    async fn monthly_counts(&self, owner: Uuid, limit: usize) -> StoreResult<Vec<MonthCount>> {
        let mut groups = stats::group_by_month(&self.owned_jobs(owner).await);
        groups.truncate(limit);
        Ok(groups)
    }
}
