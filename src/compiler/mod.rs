//! Report compilation.
//!
//! Turns a finished research run into a shareable artifact in three
//! sequential steps: compile the findings into markup (pure), render the
//! markup into a binary document, and upload the document. Each step's
//! failure propagates to the calling job unchanged.

use crate::capabilities::{ArtifactStore, DocumentRenderer};
use crate::jobs::Finding;
use crate::types::Result;
use std::sync::Arc;

/// Compiles findings into a document and publishes it through the injected
/// rendering and storage adapters.
pub struct ReportCompiler {
    renderer: Arc<dyn DocumentRenderer>,
    artifacts: Arc<dyn ArtifactStore>,
}

impl ReportCompiler {
    pub fn new(renderer: Arc<dyn DocumentRenderer>, artifacts: Arc<dyn ArtifactStore>) -> Self {
        Self {
            renderer,
            artifacts,
        }
    }

    /// Render findings into markdown. Pure and deterministic: a title, the
    /// query, then one section per finding in layer order.
    pub fn compile(query: &str, findings: &[Finding]) -> String {
        let mut doc = String::new();
        doc.push_str("# Research Report\n\n");
        doc.push_str("## Query\n\n");
        doc.push_str(query);
        doc.push_str("\n\n");

        for finding in findings {
            doc.push_str(&format!("## Layer {}\n\n", finding.layer + 1));
            doc.push_str(&finding.text);
            doc.push_str("\n\n");
        }

        doc
    }

    /// Convert markup into a binary document via the rendering capability.
    pub async fn render(&self, markup: &str) -> Result<Vec<u8>> {
        self.renderer.render(markup).await
    }

    /// Upload a rendered document, returning its public URL.
    pub async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> Result<String> {
        self.artifacts.upload(bytes, file_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn findings(texts: &[&str]) -> Vec<Finding> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Finding {
                layer: i as u8,
                text: t.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_compile_includes_query_and_findings_in_order() {
        let doc = ReportCompiler::compile(
            "Explain quantum entanglement",
            &findings(&["first layer", "second layer"]),
        );

        assert!(doc.starts_with("# Research Report"));
        assert!(doc.contains("Explain quantum entanglement"));

        let first = doc.find("first layer").unwrap();
        let second = doc.find("second layer").unwrap();
        assert!(first < second);
        assert!(doc.contains("## Layer 1"));
        assert!(doc.contains("## Layer 2"));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let f = findings(&["a", "b"]);
        assert_eq!(
            ReportCompiler::compile("q", &f),
            ReportCompiler::compile("q", &f)
        );
    }

    #[test]
    fn test_compile_with_no_findings() {
        let doc = ReportCompiler::compile("empty run", &[]);
        assert!(doc.contains("empty run"));
        assert!(!doc.contains("## Layer"));
    }
}
