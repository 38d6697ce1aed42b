//! Shared mock capability adapters for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use strata::capabilities::{ArtifactStore, DocumentRenderer, SearchHit, TextGenerator, WebSearch};
use strata::jobs::orchestrator::{JobSettings, ResearchOrchestrator};
use strata::types::{AppError, Result};
use strata::{JobStore, ReportCompiler, ReportStore};
use tokio::sync::Semaphore;

/// Text generator with configurable failure behavior.
pub struct MockGenerator {
    response: String,
    calls: AtomicUsize,
    /// Fail on the nth call (zero-based).
    fail_on_call: Option<usize>,
    /// Fail whenever the prompt contains this marker.
    fail_on_marker: Option<String>,
    /// When set, each call waits for a permit before returning.
    gate: Option<Arc<Semaphore>>,
}

impl MockGenerator {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            calls: AtomicUsize::new(0),
            fail_on_call: None,
            fail_on_marker: None,
            gate: None,
        }
    }

    pub fn failing_on_call(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    pub fn failing_on_marker(mut self, marker: &str) -> Self {
        self.fail_on_marker = Some(marker.to_string());
        self
    }

    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|_| AppError::Capability("gate closed".to_string()))?;
            permit.forget();
        }

        if self.fail_on_call == Some(call) {
            return Err(AppError::Capability("mock network error".to_string()));
        }
        if let Some(marker) = &self.fail_on_marker {
            if prompt.contains(marker.as_str()) {
                return Err(AppError::Capability("mock network error".to_string()));
            }
        }

        Ok(format!("{} (call {})", self.response, call))
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Web search returning fixed hits.
pub struct MockSearch {
    should_fail: bool,
}

impl MockSearch {
    pub fn new() -> Self {
        Self { should_fail: false }
    }

    pub fn failing() -> Self {
        Self { should_fail: true }
    }
}

#[async_trait]
impl WebSearch for MockSearch {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        if self.should_fail {
            return Err(AppError::Capability("mock search outage".to_string()));
        }

        Ok((0..limit.min(2))
            .map(|i| SearchHit {
                title: format!("Result {i} for {query}"),
                url: format!("https://example.com/{i}"),
                snippet: "snippet".to_string(),
            })
            .collect())
    }
}

/// Renderer returning a fixed byte blob.
pub struct MockRenderer {
    should_fail: bool,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self { should_fail: false }
    }

    pub fn failing() -> Self {
        Self { should_fail: true }
    }
}

#[async_trait]
impl DocumentRenderer for MockRenderer {
    async fn render(&self, markup: &str) -> Result<Vec<u8>> {
        if self.should_fail {
            return Err(AppError::Render("mock renderer down".to_string()));
        }
        Ok(format!("%PDF-mock:{}", markup.len()).into_bytes())
    }
}

/// Artifact store keeping uploads in memory.
#[derive(Default)]
pub struct MockArtifactStore {
    pub uploads: Mutex<Vec<(String, usize)>>,
    should_fail: bool,
}

impl MockArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            should_fail: true,
        }
    }
}

#[async_trait]
impl ArtifactStore for MockArtifactStore {
    async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> Result<String> {
        if self.should_fail {
            return Err(AppError::Upload("mock storage outage".to_string()));
        }
        self.uploads
            .lock()
            .push((file_name.to_string(), bytes.len()));
        Ok(format!("https://artifacts.test/{file_name}"))
    }
}

/// A config that never touches the environment, for handler tests.
pub fn test_config() -> strata::Config {
    use strata::utils::config::{
        ArtifactConfig, Config, DatabaseConfig, JobConfig, LLMConfig, ServerConfig,
    };

    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            path: ":memory:".to_string(),
            turso_url: None,
            turso_auth_token: None,
        },
        llm: LLMConfig {
            openai_api_key: "test-key".to_string(),
            openai_api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
        },
        artifacts: ArtifactConfig {
            render_url: "http://localhost:9000".to_string(),
            storage_url: "http://localhost:9001".to_string(),
            storage_token: None,
            public_base_url: "https://artifacts.test".to_string(),
        },
        jobs: JobConfig {
            max_concurrent: 4,
            call_timeout_secs: 5,
            search_results: 2,
            poll_interval_secs: 1,
            retention_hours: 24,
        },
    }
}

/// Settings with a short capability timeout for tests.
pub fn fast_settings() -> JobSettings {
    JobSettings {
        max_concurrent_jobs: 4,
        call_timeout: Duration::from_secs(5),
        search_results: 2,
    }
}

/// Wire an orchestrator around the given adapters with an in-memory report
/// store.
pub async fn build_orchestrator(
    generator: Arc<dyn TextGenerator>,
    search: Arc<dyn WebSearch>,
    renderer: Arc<dyn DocumentRenderer>,
    artifacts: Arc<dyn ArtifactStore>,
) -> (Arc<ResearchOrchestrator>, Arc<JobStore>, Arc<ReportStore>) {
    let store = Arc::new(JobStore::new());
    let reports = Arc::new(ReportStore::new_memory().await.unwrap());
    let compiler = Arc::new(ReportCompiler::new(renderer, artifacts));
    let orchestrator = Arc::new(ResearchOrchestrator::new(
        store.clone(),
        generator,
        search,
        compiler,
        reports.clone(),
        fast_settings(),
    ));
    (orchestrator, store, reports)
}

/// Default happy-path orchestrator.
pub async fn happy_orchestrator() -> (Arc<ResearchOrchestrator>, Arc<JobStore>, Arc<ReportStore>) {
    build_orchestrator(
        Arc::new(MockGenerator::new("layer finding")),
        Arc::new(MockSearch::new()),
        Arc::new(MockRenderer::new()),
        Arc::new(MockArtifactStore::new()),
    )
    .await
}

/// Poll the store until the job is terminal, with a bounded wait.
pub async fn wait_terminal(store: &JobStore, id: uuid::Uuid) -> strata::ResearchJob {
    for _ in 0..500 {
        let job = store.get(id).unwrap();
        if job.state.is_terminal() {
            return job;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {id} did not reach a terminal state in time");
}
