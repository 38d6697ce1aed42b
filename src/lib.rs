//! # Strata - Layered Research Job Server
//!
//! An asynchronous research pipeline: submit a prompt, a background task
//! performs iterative web-search and LLM calls across a bounded number of
//! layers, compiles the findings into a document, uploads the rendered
//! artifact, and reports progress through a pollable status store.
//!
//! ## Overview
//!
//! Strata can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `strata-server` binary
//! 2. **As a library** - Embed the pipeline in your own Rust project
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use strata::{
//!     JobSettings, JobStore, ReportCompiler, ReportStore, ResearchClient,
//!     ResearchOrchestrator,
//! };
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let store = Arc::new(JobStore::new());
//! let reports = Arc::new(ReportStore::new_local("strata.db").await?);
//! let compiler = Arc::new(ReportCompiler::new(renderer, artifacts));
//! let orchestrator = Arc::new(ResearchOrchestrator::new(
//!     store, generator, search, compiler, reports.clone(), JobSettings::default(),
//! ));
//!
//! let client = ResearchClient::new(orchestrator, reports, Duration::from_secs(5));
//! let job_id = client.start("Explain quantum entanglement", Some(2))?;
//! let done = client.wait_for_terminal(job_id).await?;
//! println!("{:?} {:?}", done.state, done.artifact_url);
//! ```
//!
//! ## Modules
//!
//! - [`capabilities`] - Adapters for generation, search, rendering, upload
//! - [`compiler`] - Findings-to-artifact compilation
//! - [`jobs`] - Job model, status store, orchestrator, and poller
//! - [`db`] - Durable report records
//! - [`api`] - REST API handlers and routes
//! - [`types`] - Common types and error handling

#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// External capability adapters (generate, search, render, upload).
pub mod capabilities;
/// Report compilation and publishing.
pub mod compiler;
/// Durable report persistence.
pub mod db;
/// Asynchronous research job pipeline.
pub mod jobs;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use compiler::ReportCompiler;
pub use db::ReportStore;
pub use jobs::orchestrator::{JobSettings, ResearchOrchestrator};
pub use jobs::poller::ResearchClient;
pub use jobs::store::JobStore;
pub use jobs::{Finding, JobState, Progress, ResearchJob};
pub use types::{AppError, Result};
pub use utils::config::Config;

use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<Config>,
    /// Shared job status store.
    pub jobs: Arc<JobStore>,
    /// Durable report records.
    pub reports: Arc<ReportStore>,
    /// Job submission and execution.
    pub orchestrator: Arc<ResearchOrchestrator>,
}
