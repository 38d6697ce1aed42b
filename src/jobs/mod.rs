//! Asynchronous research job pipeline.
//!
//! A job moves through a small state machine:
//!
//! ```text
//! Pending -> Running -> Completed
//!                    -> Failed
//!                    -> Cancelled
//! ```
//!
//! The submitting caller never blocks on execution. The orchestrator is the
//! sole writer of a job's record; any number of pollers read it through the
//! [`store::JobStore`]. Terminal states are immutable.

/// Submission and execution of research jobs.
pub mod orchestrator;
/// Polling bridge for embedding UIs.
pub mod poller;
/// Shared job status store.
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Minimum accepted research depth.
pub const MIN_DEPTH: u8 = 1;
/// Maximum accepted research depth.
pub const MAX_DEPTH: u8 = 5;
/// Depth used when a submission omits one.
pub const DEFAULT_DEPTH: u8 = 3;

/// Share of the progress bar covered by the research layers. The remainder
/// is spent on compiling, rendering, and uploading the report.
pub(crate) const RESEARCH_WEIGHT: f64 = 0.8;

/// Lifecycle state of a research job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    /// Created but not yet claimed by the orchestrator.
    Pending,
    /// Claimed and executing.
    Running,
    /// Finished successfully; the artifact URL is set.
    Completed,
    /// Aborted by a capability, render, or upload failure.
    Failed,
    /// Stopped cooperatively between layers after a cancel request.
    Cancelled,
}

impl JobState {
    /// Whether no further transitions are permitted.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Completed | JobState::Failed | JobState::Cancelled
        )
    }
}

/// Progress metadata reported while a job runs.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Progress {
    /// 0-100, monotonically non-decreasing. 100 exactly when completed.
    pub percent: u8,
    /// Human-readable description of the current step.
    pub label: String,
}

/// One research layer's output.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Finding {
    /// Zero-based layer index. Findings are appended in layer order.
    pub layer: u8,
    /// Synthesized text for this layer.
    pub text: String,
}

/// One research request tracked from submission to a terminal state.
#[derive(Debug, Clone, Serialize)]
pub struct ResearchJob {
    pub id: Uuid,
    /// Original user prompt.
    pub query: String,
    /// Number of research layers (1-5).
    pub depth: u8,
    pub state: JobState,
    pub progress: Progress,
    /// Append-only, one entry per completed layer.
    pub findings: Vec<Finding>,
    /// Set only when `state` is `Completed`.
    pub artifact_url: Option<String>,
    /// Set only when `state` is `Failed`.
    pub error: Option<String>,
    /// Cooperative cancellation flag, checked between layers.
    pub cancel_requested: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResearchJob {
    pub(crate) fn new(query: String, depth: u8) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            query,
            depth,
            state: JobState::Pending,
            progress: Progress {
                percent: 0,
                label: "queued".to_string(),
            },
            findings: Vec::new(),
            artifact_url: None,
            error: None,
            cancel_requested: false,
            created_at: now,
            updated_at: now,
        }
    }
}
