use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use strata::{
    AppState, Config, JobStore, ReportCompiler, ReportStore, ResearchOrchestrator,
    capabilities::{openai::OpenAIGenerator, render::HttpRenderer, search::DuckDuckGoSearch,
        upload::HttpArtifactStore},
    jobs::orchestrator::JobSettings,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Strata - layered research job server.
#[derive(Parser, Debug)]
#[command(name = "strata-server", version, about = "Strata - layered research job server")]
struct Cli {
    /// Override the configured listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the configured listen port
    #[arg(long)]
    port: Option<u16>,

    /// Enable debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "strata=debug,tower_http=debug"
    } else {
        "strata=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("failed to load configuration")?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    let config = Arc::new(config);

    let reports = Arc::new(match (&config.database.turso_url, &config.database.turso_auth_token) {
        (Some(url), Some(token)) => ReportStore::new_remote(url.clone(), token.clone()).await?,
        _ => ReportStore::new_local(&config.database.path).await?,
    });

    let call_timeout = Duration::from_secs(config.jobs.call_timeout_secs);
    let generator = Arc::new(OpenAIGenerator::new(
        config.llm.openai_api_key.clone(),
        config.llm.openai_api_base.clone(),
        config.llm.model.clone(),
    ));
    let search = Arc::new(DuckDuckGoSearch::new());
    let renderer = Arc::new(HttpRenderer::new(
        config.artifacts.render_url.clone(),
        call_timeout,
    )?);
    let artifacts = Arc::new(HttpArtifactStore::new(
        config.artifacts.storage_url.clone(),
        config.artifacts.public_base_url.clone(),
        config.artifacts.storage_token.clone(),
        call_timeout,
    )?);
    let compiler = Arc::new(ReportCompiler::new(renderer, artifacts));

    let jobs = Arc::new(JobStore::new());
    let orchestrator = Arc::new(ResearchOrchestrator::new(
        jobs.clone(),
        generator,
        search,
        compiler,
        reports.clone(),
        JobSettings {
            max_concurrent_jobs: config.jobs.max_concurrent,
            call_timeout,
            search_results: config.jobs.search_results,
        },
    ));

    // Terminal jobs are ephemeral; sweep them past the retention window.
    let retention = chrono::Duration::hours(config.jobs.retention_hours);
    let prune_store = jobs.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(600));
        loop {
            ticker.tick().await;
            let pruned = prune_store.prune_terminal(retention);
            if pruned > 0 {
                tracing::debug!(pruned, "pruned terminal jobs");
            }
        }
    });

    let state = AppState {
        config: config.clone(),
        jobs,
        reports,
        orchestrator,
    };

    let app = strata::api::routes::create_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "strata server listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
