//! PostgreSQL store.
//!
//! Raw SQLx queries over the `users` and `jobs` tables created by the
//! embedded migrations.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{JobStore, StoreError, StoreResult, UserStore};
use crate::jobs::JobQuery;
use crate::models::auth::{NewUser, User, UserUpdate, UserWithPassword};
use crate::models::job::{Job, JobUpdate, NewJob};
use crate::models::stats::{MonthCount, StatusCount};
use crate::uuid::uuidv7;

const USER_COLUMNS: &str = "id, name, email, last_name, location";

const JOB_COLUMNS: &str =
    "id, company, position, status, job_type, job_location, created_by, created_at, updated_at";

/// Store backed by a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Map a unique-constraint violation to `Duplicate`.
fn unique_violation(e: sqlx::Error, what: &str) -> StoreError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => StoreError::Duplicate(what.to_string()),
        _ => StoreError::Db(e),
    }
}

// =============================================================================
// Users
// =============================================================================

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, new: NewUser) -> StoreResult<User> {
        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash, last_name, location) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(uuidv7())
            .bind(&new.name)
            .bind(&new.email)
            .bind(&new.password_hash)
            .bind(&new.last_name)
            .bind(&new.location)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| unique_violation(e, &new.email))
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserWithPassword>> {
        let row = sqlx::query_as::<_, (Uuid, String, String, String, String, String)>(
            "SELECT id, name, email, last_name, location, password_hash \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(
            |(id, name, email, last_name, location, password_hash)| UserWithPassword {
                user: User {
                    id,
                    name,
                    email,
                    last_name,
                    location,
                },
                password_hash,
            },
        ))
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_user(&self, id: Uuid, update: UserUpdate) -> StoreResult<User> {
        let sql = format!(
            "UPDATE users SET name = $1, email = $2, last_name = $3, location = $4, \
             updated_at = now() WHERE id = $5 RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&update.name)
            .bind(&update.email)
            .bind(&update.last_name)
            .bind(&update.location)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| unique_violation(e, &update.email))?
            .ok_or_else(|| StoreError::NotFound(format!("user {id}")))
    }
}

// =============================================================================
// Jobs
// =============================================================================

#[async_trait]
impl JobStore for PgStore {
    async fn create_job(&self, owner: Uuid, new: NewJob) -> StoreResult<Job> {
        let sql = format!(
            "INSERT INTO jobs (id, company, position, status, job_type, job_location, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {JOB_COLUMNS}"
        );
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(uuidv7())
            .bind(&new.company)
            .bind(&new.position)
            .bind(new.status)
            .bind(new.job_type)
            .bind(&new.job_location)
            .bind(owner)
            .fetch_one(&self.pool)
            .await?;
        Ok(job)
    }

    async fn get_job(&self, id: Uuid) -> StoreResult<Option<Job>> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1");
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    async fn find_jobs(&self, query: &JobQuery) -> StoreResult<Vec<Job>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {JOB_COLUMNS} FROM jobs"));
        query.push_sql(&mut qb);
        let jobs = qb.build_query_as::<Job>().fetch_all(&self.pool).await?;
        Ok(jobs)
    }

    async fn update_job(&self, id: Uuid, update: JobUpdate) -> StoreResult<Job> {
        let sql = format!(
            "UPDATE jobs SET company = $1, position = $2, status = $3, job_type = $4, \
             job_location = $5, updated_at = now() WHERE id = $6 RETURNING {JOB_COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&sql)
            .bind(&update.company)
            .bind(&update.position)
            .bind(update.status)
            .bind(update.job_type)
            .bind(&update.job_location)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn delete_job(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn status_counts(&self, owner: Uuid) -> StoreResult<Vec<StatusCount>> {
        let rows = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM jobs
            WHERE created_by = $1
            GROUP BY status
            ORDER BY status
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn monthly_counts(&self, owner: Uuid, limit: usize) -> StoreResult<Vec<MonthCount>> {
        let rows = sqlx::query_as::<_, MonthCount>(
            r#"
            SELECT EXTRACT(YEAR FROM created_at AT TIME ZONE 'UTC')::int AS year,
                   EXTRACT(MONTH FROM created_at AT TIME ZONE 'UTC')::int AS month,
                   COUNT(*) AS count
            FROM jobs
            WHERE created_by = $1
            GROUP BY 1, 2
            ORDER BY 1 DESC, 2 DESC
            LIMIT $2
            "#,
        )
        .bind(owner)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
