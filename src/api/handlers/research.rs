//! Research job handlers.

use crate::{
    AppState,
    types::{AppError, JobStatusResponse, Result, StartResearchRequest, StartResearchResponse},
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::{Value, json};
use uuid::Uuid;

/// Submit a research job. Returns immediately; poll the status endpoint for
/// progress.
#[utoipa::path(
    post,
    path = "/api/research",
    request_body = StartResearchRequest,
    responses(
        (status = 201, description = "Job accepted", body = StartResearchResponse),
        (status = 400, description = "Invalid prompt or depth")
    ),
    tag = "research"
)]
pub async fn start_research(
    State(state): State<AppState>,
    payload: std::result::Result<Json<StartResearchRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<StartResearchResponse>)> {
    // Malformed bodies (missing prompt, wrong types) are invalid input, not
    // the extractor's default 422.
    let Json(payload) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    let job_id = state.orchestrator.submit(&payload.prompt, payload.depth)?;

    Ok((StatusCode::CREATED, Json(StartResearchResponse { job_id })))
}

/// Poll a job's state and progress.
#[utoipa::path(
    get,
    path = "/api/research/{job_id}",
    params(("job_id" = Uuid, Path, description = "Job identifier")),
    responses(
        (status = 200, description = "Current job snapshot", body = JobStatusResponse),
        (status = 404, description = "Unknown job id")
    ),
    tag = "research"
)]
pub async fn research_status(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobStatusResponse>> {
    let job = state.jobs.get(job_id)?;

    Ok(Json(JobStatusResponse {
        state: job.state,
        progress: job.progress,
        artifact_url: job.artifact_url,
        error: job.error,
    }))
}

/// Request cooperative cancellation. The job stops at the next layer
/// boundary.
#[utoipa::path(
    post,
    path = "/api/research/{job_id}/cancel",
    params(("job_id" = Uuid, Path, description = "Job identifier")),
    responses(
        (status = 202, description = "Cancellation requested"),
        (status = 404, description = "Unknown job id"),
        (status = 409, description = "Job already terminal")
    ),
    tag = "research"
)]
pub async fn cancel_research(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Value>)> {
    let state_now = state.jobs.request_cancel(job_id)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "state": state_now })),
    ))
}
