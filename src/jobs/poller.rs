//! Polling bridge between an embedding UI and the job pipeline.
//!
//! The client starts a job, then watches the status store at a fixed
//! interval until a terminal state. Watching stops when the receiver is
//! dropped (UI teardown), which stops polling but does not cancel the
//! underlying job; use [`ResearchClient::cancel`] for that.

use crate::db::ReportStore;
use crate::jobs::orchestrator::ResearchOrchestrator;
use crate::jobs::{JobState, ResearchJob};
use crate::types::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Default interval between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Client-side poller: submits jobs and observes them to completion.
pub struct ResearchClient {
    orchestrator: Arc<ResearchOrchestrator>,
    reports: Arc<ReportStore>,
    interval: Duration,
}

impl ResearchClient {
    pub fn new(
        orchestrator: Arc<ResearchOrchestrator>,
        reports: Arc<ReportStore>,
        interval: Duration,
    ) -> Self {
        Self {
            orchestrator,
            reports,
            interval,
        }
    }

    /// Submit a job. Returns the id to poll with.
    pub fn start(&self, query: &str, depth: Option<u8>) -> Result<Uuid> {
        self.orchestrator.submit(query, depth)
    }

    /// Request cooperative cancellation of a running job.
    pub fn cancel(&self, id: Uuid) -> Result<JobState> {
        self.orchestrator.store().request_cancel(id)
    }

    /// Stream job snapshots until a terminal state. The spawned poll loop
    /// exits when the job ends or the receiver is dropped.
    pub fn watch(&self, id: Uuid) -> mpsc::Receiver<ResearchJob> {
        let (tx, rx) = mpsc::channel(16);
        let store = Arc::clone(self.orchestrator.store());
        let reports = Arc::clone(&self.reports);
        let interval = self.interval;

        tokio::spawn(async move {
            // Local guard so one watcher saves at most once; the unique
            // constraint in the report store covers concurrent watchers.
            let mut report_saved = false;
            let mut ticker = tokio::time::interval(interval);

            loop {
                ticker.tick().await;

                let job = match store.get(id) {
                    Ok(job) => job,
                    Err(e) => {
                        tracing::warn!(job_id = %id, error = %e, "poll failed, stopping watch");
                        break;
                    }
                };

                let terminal = job.state.is_terminal();

                if job.state == JobState::Completed && !report_saved {
                    if let Some(url) = &job.artifact_url {
                        let key = format!("research-{id}.pdf");
                        match reports
                            .save_report(&id.to_string(), &job.query, &key, url)
                            .await
                        {
                            Ok(_) => report_saved = true,
                            Err(e) => {
                                tracing::warn!(job_id = %id, error = %e, "report save failed")
                            }
                        }
                    }
                }

                if tx.send(job).await.is_err() {
                    // Receiver gone: the UI went away, stop polling.
                    break;
                }

                if terminal {
                    break;
                }
            }
        });

        rx
    }

    /// Poll until the job reaches a terminal state and return that snapshot.
    pub async fn wait_for_terminal(&self, id: Uuid) -> Result<ResearchJob> {
        let mut rx = self.watch(id);
        let mut last = self.orchestrator.store().get(id)?;

        while let Some(job) = rx.recv().await {
            last = job;
            if last.state.is_terminal() {
                break;
            }
        }

        Ok(last)
    }
}
