//! Job service: owner-scoped CRUD, search and statistics.

use jobtrack_core::jobs::{JobQuery, JobQueryParams, stats};
use jobtrack_core::models::api::{JobRequest, JobsResponse, MessageResponse};
use jobtrack_core::models::job::{DEFAULT_LOCATION, Job, JobStatus, JobType, JobUpdate, NewJob};
use jobtrack_core::models::stats::StatsSnapshot;
use jobtrack_core::store::JobStore;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::auth::MISSING_VALUES;

/// Message for a mutation attempted by someone other than the owner.
pub const NOT_OWNER: &str = "Not authorized to access this route";

/// Parsed optional enum and location fields of a job request.
struct JobFields {
    status: Option<JobStatus>,
    job_type: Option<JobType>,
    job_location: Option<String>,
}

/// Check required fields and parse the rest, before any store access.
fn validate(req: &JobRequest) -> AppResult<JobFields> {
    if req.company.trim().is_empty() || req.position.trim().is_empty() {
        return Err(AppError::Validation(MISSING_VALUES.into()));
    }
    let status = req.status.as_deref().map(str::parse).transpose()?;
    let job_type = req.job_type.as_deref().map(str::parse).transpose()?;
    let job_location = req
        .job_location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string);
    Ok(JobFields {
        status,
        job_type,
        job_location,
    })
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("No job with id : {id}"))
}

/// Reject mutation of a job the requester does not own.
pub fn check_permissions(requester: &Uuid, job: &Job) -> AppResult<()> {
    if job.is_owned_by(requester) {
        return Ok(());
    }
    Err(AppError::Forbidden(NOT_OWNER.into()))
}

/// Load a job by its path id, mapping malformed and unknown ids alike.
async fn load_job(jobs: &dyn JobStore, id: &str) -> AppResult<Job> {
    let job_id = Uuid::parse_str(id).map_err(|_| not_found(id))?;
    jobs.get_job(job_id).await?.ok_or_else(|| not_found(id))
}

/// Create a job owned by `owner`.
pub async fn create_job(jobs: &dyn JobStore, owner: Uuid, req: JobRequest) -> AppResult<Job> {
    let fields = validate(&req)?;
    let job = jobs
        .create_job(
            owner,
            NewJob {
                company: req.company.trim().to_string(),
                position: req.position.trim().to_string(),
                status: fields.status.unwrap_or_default(),
                job_type: fields.job_type.unwrap_or_default(),
                job_location: fields
                    .job_location
                    .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            },
        )
        .await?;
    info!(job_id = %job.id, owner = %owner, "job created");
    Ok(job)
}

/// Search `owner`'s jobs.
///
/// No pagination: every match is returned and `numOfPages` is always 1.
pub async fn list_jobs(
    jobs: &dyn JobStore,
    owner: Uuid,
    params: &JobQueryParams,
) -> AppResult<JobsResponse> {
    let query = JobQuery::from_params(owner, params)?;
    let found = jobs.find_jobs(&query).await?;
    debug!(owner = %owner, count = found.len(), "jobs listed");
    Ok(JobsResponse {
        total_jobs: found.len() as u64,
        jobs: found,
        num_of_pages: 1,
    })
}

/// Update a job owned by `requester`. Fields absent from the request keep
/// their stored values.
pub async fn update_job(
    jobs: &dyn JobStore,
    requester: Uuid,
    id: &str,
    req: JobRequest,
) -> AppResult<Job> {
    let fields = validate(&req)?;
    let existing = load_job(jobs, id).await?;
    check_permissions(&requester, &existing)?;

    let updated = jobs
        .update_job(
            existing.id,
            JobUpdate {
                company: req.company.trim().to_string(),
                position: req.position.trim().to_string(),
                status: fields.status.unwrap_or(existing.status),
                job_type: fields.job_type.unwrap_or(existing.job_type),
                job_location: fields.job_location.unwrap_or(existing.job_location),
            },
        )
        .await?;
    info!(job_id = %updated.id, "job updated");
    Ok(updated)
}

/// Delete a job owned by `requester`.
pub async fn delete_job(
    jobs: &dyn JobStore,
    requester: Uuid,
    id: &str,
) -> AppResult<MessageResponse> {
    let existing = load_job(jobs, id).await?;
    check_permissions(&requester, &existing)?;
    jobs.delete_job(existing.id).await?;
    info!(job_id = %existing.id, "job removed");
    Ok(MessageResponse {
        msg: "Success! Job removed.".into(),
    })
}

/// Status counts and monthly series for `owner`.
pub async fn show_stats(jobs: &dyn JobStore, owner: Uuid) -> AppResult<StatsSnapshot> {
    let statuses = jobs.status_counts(owner).await?;
    let months = jobs.monthly_counts(owner, stats::MONTHLY_WINDOW).await?;
    Ok(stats::snapshot(&statuses, months))
}
