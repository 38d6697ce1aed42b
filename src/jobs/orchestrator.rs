//! Research orchestrator.
//!
//! Drives a single job from `Pending` to a terminal state without blocking
//! the submitter. Each job runs as an independent tokio task behind a
//! semaphore that bounds concurrent outbound API usage. Layers are strictly
//! sequential within a job because each layer's prompt builds on the
//! previous layer's finding.

use crate::capabilities::{SearchHit, TextGenerator, WebSearch};
use crate::compiler::ReportCompiler;
use crate::db::ReportStore;
use crate::jobs::store::JobStore;
use crate::jobs::{DEFAULT_DEPTH, MAX_DEPTH, MIN_DEPTH, RESEARCH_WEIGHT};
use crate::types::{AppError, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use uuid::Uuid;

/// Tunables for job execution.
#[derive(Debug, Clone)]
pub struct JobSettings {
    /// Upper bound on jobs executing at once.
    pub max_concurrent_jobs: usize,
    /// Timeout applied to every capability call.
    pub call_timeout: Duration,
    /// Search results requested per layer.
    pub search_results: usize,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: 4,
            call_timeout: Duration::from_secs(60),
            search_results: 5,
        }
    }
}

/// State machine driving research jobs. The orchestrator is the sole writer
/// of a job's record; everything else observes through the [`JobStore`].
///
/// Cheap to clone; clones share the same store and adapters.
#[derive(Clone)]
pub struct ResearchOrchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<JobStore>,
    generator: Arc<dyn TextGenerator>,
    search: Arc<dyn WebSearch>,
    compiler: Arc<ReportCompiler>,
    reports: Arc<ReportStore>,
    limiter: Semaphore,
    settings: JobSettings,
}

impl ResearchOrchestrator {
    pub fn new(
        store: Arc<JobStore>,
        generator: Arc<dyn TextGenerator>,
        search: Arc<dyn WebSearch>,
        compiler: Arc<ReportCompiler>,
        reports: Arc<ReportStore>,
        settings: JobSettings,
    ) -> Self {
        let limiter = Semaphore::new(settings.max_concurrent_jobs.max(1));
        Self {
            inner: Arc::new(Inner {
                store,
                generator,
                search,
                compiler,
                reports,
                limiter,
                settings,
            }),
        }
    }

    /// Validate and enqueue a research job. Returns the job id immediately;
    /// execution happens on a spawned task.
    pub fn submit(&self, query: &str, depth: Option<u8>) -> Result<Uuid> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput("query must not be empty".to_string()));
        }

        let depth = depth.unwrap_or(DEFAULT_DEPTH);
        if !(MIN_DEPTH..=MAX_DEPTH).contains(&depth) {
            return Err(AppError::InvalidInput(format!(
                "depth must be between {MIN_DEPTH} and {MAX_DEPTH}, got {depth}"
            )));
        }

        let job = self.inner.store.insert(query.to_string(), depth);
        let id = job.id;
        tracing::info!(job_id = %id, depth, "research job submitted");

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            inner.run(id).await;
        });

        Ok(id)
    }

    /// The shared status store, for pollers and handlers.
    pub fn store(&self) -> &Arc<JobStore> {
        &self.inner.store
    }
}

impl Inner {
    /// Execute one job to a terminal state. Every failure path lands in the
    /// store; nothing is raised past this point.
    async fn run(&self, id: Uuid) {
        let _permit = match self.limiter.acquire().await {
            Ok(permit) => permit,
            Err(_) => {
                let _ = self.store.fail(id, "job scheduler shut down");
                return;
            }
        };

        match self.execute(id).await {
            Ok(()) => {}
            Err(e) => {
                tracing::warn!(job_id = %id, error = %e, "research job failed");
                // The job may already be terminal (e.g. cancelled); a
                // conflict here is not an error.
                let _ = self.store.fail(id, &e.to_string());
            }
        }
    }

    async fn execute(&self, id: Uuid) -> Result<()> {
        self.store.claim(id)?;
        let job = self.store.get(id)?;
        let depth = job.depth;
        let mut findings: Vec<String> = Vec::with_capacity(depth as usize);

        for layer in 0..depth {
            if self.store.cancel_requested(id)? {
                tracing::info!(job_id = %id, layer, "cancel observed, stopping");
                self.store.mark_cancelled(id)?;
                return Ok(());
            }

            self.store.set_progress(
                id,
                research_percent(layer, depth),
                &format!("layer {}/{}: searching", layer + 1, depth),
            )?;
            let hits = self
                .call(self.search.search(&job.query, self.settings.search_results))
                .await?;

            self.store.set_progress(
                id,
                research_percent(layer, depth),
                &format!(
                    "layer {}/{}: synthesizing with {}",
                    layer + 1,
                    depth,
                    self.generator.model_name()
                ),
            )?;
            let prompt = layer_prompt(&job.query, &findings, &hits, layer, depth);
            let text = self.call(self.generator.generate(&prompt)).await?;

            self.store.push_finding(id, layer, text.clone())?;
            findings.push(text);
            self.store.set_progress(
                id,
                research_percent(layer + 1, depth),
                &format!("layer {}/{} complete", layer + 1, depth),
            )?;
        }

        if self.store.cancel_requested(id)? {
            self.store.mark_cancelled(id)?;
            return Ok(());
        }

        let job = self.store.get(id)?;
        self.store.set_progress(id, 85, "compiling report")?;
        let markup = ReportCompiler::compile(&job.query, &job.findings);

        self.store.set_progress(id, 90, "rendering document")?;
        let document = self.call(self.compiler.render(&markup)).await?;

        self.store.set_progress(id, 95, "uploading artifact")?;
        let artifact_key = format!("research-{id}.pdf");
        let url = self
            .call(self.compiler.upload(document, &artifact_key))
            .await?;

        self.store.complete(id, &url)?;
        tracing::info!(job_id = %id, url = %url, "research job completed");

        // Durable report record, idempotent on job id. The artifact already
        // exists, so a persistence failure does not fail the job.
        if let Err(e) = self
            .reports
            .save_report(&id.to_string(), &job.query, &artifact_key, &url)
            .await
        {
            tracing::warn!(job_id = %id, error = %e, "failed to persist report record");
        }

        Ok(())
    }

    /// Wrap a capability call with the configured timeout.
    async fn call<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.settings.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Capability(format!(
                "capability call timed out after {:?}",
                self.settings.call_timeout
            ))),
        }
    }
}

/// Percent of the overall job covered by `completed_layers` out of `depth`,
/// scaled so the research phase tops out below the compile/upload steps.
fn research_percent(completed_layers: u8, depth: u8) -> u8 {
    ((completed_layers as f64 / depth as f64) * 100.0 * RESEARCH_WEIGHT).round() as u8
}

/// Build the prompt for one research layer. Later layers see every prior
/// finding so the run digs progressively deeper instead of repeating itself.
fn layer_prompt(
    query: &str,
    prior_findings: &[String],
    hits: &[SearchHit],
    layer: u8,
    depth: u8,
) -> String {
    let mut prompt = format!(
        "Research task: {query}\n\nThis is layer {} of {}.\n",
        layer + 1,
        depth
    );

    if !prior_findings.is_empty() {
        prompt.push_str("\nFindings from earlier layers:\n");
        for (i, finding) in prior_findings.iter().enumerate() {
            prompt.push_str(&format!("\n--- Layer {} ---\n{}\n", i + 1, finding));
        }
        prompt.push_str(
            "\nGo one level deeper: address gaps, open questions, and \
             follow-ups raised by the findings above.\n",
        );
    }

    if !hits.is_empty() {
        prompt.push_str("\nWeb search results:\n");
        for hit in hits {
            prompt.push_str(&format!("- {} ({})\n  {}\n", hit.title, hit.url, hit.snippet));
        }
    }

    prompt.push_str("\nWrite this layer's findings as a few focused paragraphs.");
    prompt
}
