//! Markup-to-binary rendering adapter.
//!
//! Talks to an external rendering service over HTTP: the service accepts
//! document markup and returns the rendered binary (PDF by default).

use crate::capabilities::DocumentRenderer;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

/// HTTP rendering service adapter.
pub struct HttpRenderer {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRenderer {
    /// `base_url` is the root of the rendering service; the adapter posts to
    /// `{base_url}/render`.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl DocumentRenderer for HttpRenderer {
    async fn render(&self, markup: &str) -> Result<Vec<u8>> {
        let url = format!("{}/render", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "markup": markup,
                "format": "pdf",
            }))
            .send()
            .await
            .map_err(|e| AppError::Render(format!("Rendering service unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Render(format!(
                "Rendering service returned {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Render(format!("Failed to read rendered document: {}", e)))?;

        if bytes.is_empty() {
            return Err(AppError::Render(
                "Rendering service returned an empty document".to_string(),
            ));
        }

        Ok(bytes.to_vec())
    }
}
