//! Shared job status store.
//!
//! Single source of truth for job state. Reads take a shared lock and never
//! block each other; every mutation takes the write lock and re-checks the
//! state it transitions from, so writers per job are serialized and terminal
//! records stay immutable.

use crate::jobs::{Finding, JobState, ResearchJob};
use crate::types::{AppError, Result};
use chrono::{Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

/// In-memory record of all known jobs. Jobs are ephemeral; completed work is
/// persisted separately as a report record.
#[derive(Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<Uuid, ResearchJob>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new `Pending` job and return a snapshot of it.
    pub fn insert(&self, query: String, depth: u8) -> ResearchJob {
        let job = ResearchJob::new(query, depth);
        let snapshot = job.clone();
        self.jobs.write().insert(job.id, job);
        snapshot
    }

    /// Snapshot a job by id.
    pub fn get(&self, id: Uuid) -> Result<ResearchJob> {
        self.jobs
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("unknown job {id}")))
    }

    /// Number of tracked jobs.
    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.read().is_empty()
    }

    /// Transition `Pending -> Running`. Compare-and-set: claiming a job in
    /// any other state is a conflict, which enforces at most one active
    /// execution per job.
    pub fn claim(&self, id: Uuid) -> Result<()> {
        self.mutate(id, |job| {
            if job.state != JobState::Pending {
                return Err(AppError::Conflict(format!(
                    "job {id} is {:?}, not pending",
                    job.state
                )));
            }
            job.state = JobState::Running;
            Ok(())
        })
    }

    /// Update progress. The percent is clamped so it never decreases.
    pub fn set_progress(&self, id: Uuid, percent: u8, label: &str) -> Result<()> {
        self.mutate(id, |job| {
            job.progress.percent = job.progress.percent.max(percent.min(100));
            job.progress.label = label.to_string();
            Ok(())
        })
    }

    /// Append one layer's finding.
    pub fn push_finding(&self, id: Uuid, layer: u8, text: String) -> Result<()> {
        self.mutate(id, |job| {
            job.findings.push(Finding { layer, text });
            Ok(())
        })
    }

    /// Transition `Running -> Completed` with the artifact URL and a full
    /// progress bar.
    pub fn complete(&self, id: Uuid, artifact_url: &str) -> Result<()> {
        self.mutate(id, |job| {
            if job.state != JobState::Running {
                return Err(AppError::Conflict(format!(
                    "cannot complete job {id} in state {:?}",
                    job.state
                )));
            }
            job.state = JobState::Completed;
            job.artifact_url = Some(artifact_url.to_string());
            job.progress.percent = 100;
            job.progress.label = "completed".to_string();
            Ok(())
        })
    }

    /// Transition any non-terminal state to `Failed`, recording the error.
    pub fn fail(&self, id: Uuid, message: &str) -> Result<()> {
        self.mutate(id, |job| {
            job.state = JobState::Failed;
            job.error = Some(message.to_string());
            job.progress.label = "failed".to_string();
            Ok(())
        })
    }

    /// Ask a running job to stop at the next layer boundary. The job itself
    /// transitions to `Cancelled` only when the orchestrator observes the
    /// flag.
    pub fn request_cancel(&self, id: Uuid) -> Result<JobState> {
        self.mutate(id, |job| {
            job.cancel_requested = true;
            Ok(())
        })?;
        Ok(self.get(id)?.state)
    }

    /// Whether cancellation has been requested for a job.
    pub fn cancel_requested(&self, id: Uuid) -> Result<bool> {
        Ok(self.get(id)?.cancel_requested)
    }

    /// Transition a non-terminal job to `Cancelled`.
    pub fn mark_cancelled(&self, id: Uuid) -> Result<()> {
        self.mutate(id, |job| {
            job.state = JobState::Cancelled;
            job.progress.label = "cancelled".to_string();
            Ok(())
        })
    }

    /// Drop terminal jobs last updated more than `retention` ago. Returns the
    /// number of jobs removed.
    pub fn prune_terminal(&self, retention: Duration) -> usize {
        let cutoff = Utc::now() - retention;
        let mut jobs = self.jobs.write();
        let before = jobs.len();
        jobs.retain(|_, job| !(job.state.is_terminal() && job.updated_at < cutoff));
        before - jobs.len()
    }

    /// Apply a patch under the write lock. Rejects any patch against a
    /// terminal job, keeping terminal records immutable.
    fn mutate<F>(&self, id: Uuid, patch: F) -> Result<()>
    where
        F: FnOnce(&mut ResearchJob) -> Result<()>,
    {
        let mut jobs = self.jobs.write();
        let job = jobs
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("unknown job {id}")))?;

        if job.state.is_terminal() {
            return Err(AppError::Conflict(format!(
                "job {id} is already terminal ({:?})",
                job.state
            )));
        }

        patch(job)?;
        job.updated_at = Utc::now();
        Ok(())
    }
}
