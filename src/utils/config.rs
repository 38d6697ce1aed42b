use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: LLMConfig,
    pub artifacts: ArtifactConfig,
    pub jobs: JobConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Local database file path. Ignored when a Turso URL is configured.
    pub path: String,
    pub turso_url: Option<String>,
    pub turso_auth_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    pub openai_api_key: String,
    pub openai_api_base: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactConfig {
    /// Base URL of the markup-to-PDF rendering service.
    pub render_url: String,
    /// Base URL of the artifact storage service.
    pub storage_url: String,
    pub storage_token: Option<String>,
    /// Public base URL uploaded artifact links resolve against.
    pub public_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    pub max_concurrent: usize,
    pub call_timeout_secs: u64,
    pub search_results: usize,
    pub poll_interval_secs: u64,
    /// Terminal jobs older than this are pruned from the in-memory store.
    pub retention_hours: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        Ok(Config {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()?,
            },
            database: DatabaseConfig {
                path: env::var("DATABASE_PATH").unwrap_or_else(|_| "strata.db".to_string()),
                turso_url: env::var("TURSO_URL").ok(),
                turso_auth_token: env::var("TURSO_AUTH_TOKEN").ok(),
            },
            llm: LLMConfig {
                openai_api_key: env::var("OPENAI_API_KEY")?,
                openai_api_base: env::var("OPENAI_API_BASE")
                    .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
                model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            },
            artifacts: ArtifactConfig {
                render_url: env::var("RENDER_SERVICE_URL")?,
                storage_url: env::var("STORAGE_SERVICE_URL")?,
                storage_token: env::var("STORAGE_SERVICE_TOKEN").ok(),
                public_base_url: env::var("ARTIFACT_PUBLIC_BASE_URL")?,
            },
            jobs: JobConfig {
                max_concurrent: env::var("MAX_CONCURRENT_JOBS")
                    .unwrap_or_else(|_| "4".to_string())
                    .parse()?,
                call_timeout_secs: env::var("CAPABILITY_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()?,
                search_results: env::var("SEARCH_RESULTS_PER_LAYER")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()?,
                poll_interval_secs: env::var("POLL_INTERVAL_SECS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()?,
                retention_hours: env::var("JOB_RETENTION_HOURS")
                    .unwrap_or_else(|_| "24".to_string())
                    .parse()?,
            },
        })
    }
}
