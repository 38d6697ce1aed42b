//! Artifact storage adapter.
//!
//! Uploads rendered documents to an external storage service and resolves
//! the public URL the client can fetch the artifact from.

use crate::capabilities::ArtifactStore;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// HTTP storage service adapter. Artifacts are PUT to
/// `{base_url}/artifacts/{file_name}` and resolved against a public base URL.
pub struct HttpArtifactStore {
    client: reqwest::Client,
    base_url: String,
    public_base_url: String,
    auth_token: Option<String>,
}

impl HttpArtifactStore {
    pub fn new(
        base_url: String,
        public_base_url: String,
        auth_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            auth_token,
        })
    }
}

#[async_trait]
impl ArtifactStore for HttpArtifactStore {
    async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> Result<String> {
        let url = format!("{}/artifacts/{}", self.base_url, file_name);

        let mut request = self
            .client
            .put(&url)
            .header("content-type", "application/pdf")
            .body(bytes);

        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Upload(format!("Storage service unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Upload(format!(
                "Storage service returned {}",
                response.status()
            )));
        }

        Ok(format!("{}/{}", self.public_base_url, file_name))
    }
}
