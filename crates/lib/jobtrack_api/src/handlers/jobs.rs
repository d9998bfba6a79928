//! Job request handlers. All routes here sit behind `require_auth`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use jobtrack_core::jobs::JobQueryParams;
use jobtrack_core::models::api::{
    JobRequest, JobResponse, JobsResponse, MessageResponse, UpdatedJobResponse,
};
use jobtrack_core::models::stats::StatsSnapshot;

use crate::AppState;
use crate::error::AppResult;
use crate::extract;
use crate::middleware::auth::AuthenticatedUser;
use crate::services::jobs;

/// `POST /jobs`
pub async fn create_job_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    extract::Json(body): extract::Json<JobRequest>,
) -> AppResult<(StatusCode, Json<JobResponse>)> {
    let job = jobs::create_job(state.jobs.as_ref(), claims.sub, body).await?;
    Ok((StatusCode::CREATED, Json(JobResponse { job })))
}

/// `GET /jobs?status=&jobType=&sort=&search=`
pub async fn list_jobs_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    Query(params): Query<JobQueryParams>,
) -> AppResult<Json<JobsResponse>> {
    let resp = jobs::list_jobs(state.jobs.as_ref(), claims.sub, &params).await?;
    Ok(Json(resp))
}

/// `PATCH /jobs/{id}`
pub async fn update_job_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    extract::Json(body): extract::Json<JobRequest>,
) -> AppResult<Json<UpdatedJobResponse>> {
    let updated_job = jobs::update_job(state.jobs.as_ref(), claims.sub, &id, body).await?;
    Ok(Json(UpdatedJobResponse { updated_job }))
}

/// `DELETE /jobs/{id}`
pub async fn delete_job_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let resp = jobs::delete_job(state.jobs.as_ref(), claims.sub, &id).await?;
    Ok(Json(resp))
}

/// `GET /jobs/stats`
pub async fn show_stats_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> AppResult<Json<StatsSnapshot>> {
    let snapshot = jobs::show_stats(state.jobs.as_ref(), claims.sub).await?;
    Ok(Json(snapshot))
}
