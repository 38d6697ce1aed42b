//! Capability adapters.
//!
//! Each external provider the pipeline depends on is wrapped behind a small
//! async trait: text generation, web search, document rendering, and artifact
//! storage. Adapters normalize provider errors into the crate taxonomy and
//! are injected explicitly into the orchestrator and compiler, so tests swap
//! them for mocks and nothing holds process-global clients.

/// Text generation via the OpenAI chat completion API.
pub mod openai;
/// HTTP markup-to-binary rendering service adapter.
pub mod render;
/// Web search via daedra (DuckDuckGo backend).
pub mod search;
/// HTTP artifact storage adapter.
pub mod upload;

use crate::types::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One web search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Generate text given a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// The model identifier, for progress labels and logs.
    fn model_name(&self) -> &str;
}

/// Search the web given a query.
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>>;
}

/// Convert document markup into a binary artifact (e.g. PDF).
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(&self, markup: &str) -> Result<Vec<u8>>;
}

/// Store a binary artifact and return a publicly resolvable URL.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> Result<String>;
}
