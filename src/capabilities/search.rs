//! Web search adapter backed by daedra, which uses DuckDuckGo.

use crate::capabilities::{SearchHit, WebSearch};
use crate::types::{AppError, Result};
use async_trait::async_trait;

/// DuckDuckGo-backed [`WebSearch`] implementation.
pub struct DuckDuckGoSearch;

impl DuckDuckGoSearch {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DuckDuckGoSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let search_args = daedra::SearchArgs {
            query: query.to_string(),
            options: Some(daedra::SearchOptions {
                num_results: limit,
                ..Default::default()
            }),
        };

        match daedra::tools::search::perform_search(&search_args).await {
            Ok(response) => Ok(response
                .data
                .iter()
                .map(|r| SearchHit {
                    title: r.title.clone(),
                    url: r.url.clone(),
                    snippet: r.description.clone(),
                })
                .collect()),
            Err(e) => Err(AppError::Capability(format!("Search failed: {}", e))),
        }
    }
}
