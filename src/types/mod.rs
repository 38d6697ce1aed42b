//! Core request/response types and the crate error taxonomy.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::jobs::{JobState, Progress};

// ============= API Request/Response Types =============

/// Body of `POST /api/research`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StartResearchRequest {
    /// The research prompt. Must be non-empty.
    pub prompt: String,
    /// Number of research layers to perform (1-5). Defaults to 3.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u8>,
}

/// Response to a successful job submission.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StartResearchResponse {
    /// Identifier to poll via `GET /api/research/{job_id}`.
    pub job_id: Uuid,
}

/// Snapshot of a job returned by the status endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobStatusResponse {
    /// Current lifecycle state.
    pub state: JobState,
    /// Progress percent and human-readable label.
    pub progress: Progress,
    /// Set only once the job has completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_url: Option<String>,
    /// Set only if the job failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A durable record of a finished research job.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResearchReport {
    /// Record identifier.
    pub id: String,
    /// The job this report was produced by. Unique per report.
    pub job_id: String,
    /// The original research prompt.
    pub prompt: String,
    /// Storage key of the uploaded artifact.
    pub artifact_key: String,
    /// Publicly resolvable artifact URL.
    pub artifact_url: String,
    /// Unix timestamp of creation.
    pub created_at: i64,
}

// ============= Error Types =============

/// Application-wide error taxonomy.
///
/// Submission-time errors (`InvalidInput`) surface synchronously to the
/// caller. Errors raised during job execution are caught by the orchestrator
/// and recorded as a terminal `Failed` state instead, since the submitter has
/// already returned.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Capability error: {0}")]
    Capability(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Capability(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Render(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Upload(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Database(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (AppError::InvalidInput("bad".into()), 400),
            (AppError::NotFound("missing".into()), 404),
            (AppError::Conflict("terminal".into()), 409),
            (AppError::Capability("upstream".into()), 502),
            (AppError::Render("convert".into()), 502),
            (AppError::Upload("store".into()), 502),
            (AppError::Database("db".into()), 500),
            (AppError::Internal("oops".into()), 500),
        ];

        for (err, expected) in cases {
            let response = err.into_response();
            assert_eq!(response.status().as_u16(), expected);
        }
    }

    #[test]
    fn test_error_display_includes_message() {
        let err = AppError::Capability("generation timed out".into());
        assert!(err.to_string().contains("generation timed out"));
    }
}
