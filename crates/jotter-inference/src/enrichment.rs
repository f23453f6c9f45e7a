//! Note enrichment: summaries and embeddings from an inference backend.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use jotter_core::defaults::SUMMARY_INSTRUCTION;
use jotter_core::{
    EmbeddingBackend, Error, GenerationBackend, InferenceBackend, Result, Vector,
};

/// Summarizes and embeds note text through one provider.
///
/// Cheap to clone; the backend is shared.
#[derive(Clone)]
pub struct EnrichmentService {
    backend: Arc<dyn InferenceBackend>,
}

impl EnrichmentService {
    pub fn new(backend: Arc<dyn InferenceBackend>) -> Self {
        Self { backend }
    }

    /// Expected length of every vector returned by [`embed`](Self::embed).
    pub fn dimension(&self) -> usize {
        self.backend.dimension()
    }

    pub fn gen_model(&self) -> &str {
        GenerationBackend::model_name(self.backend.as_ref())
    }

    pub fn embed_model(&self) -> &str {
        EmbeddingBackend::model_name(self.backend.as_ref())
    }

    /// Ask the provider for a brief summary of `text`.
    ///
    /// The reply is trimmed; an empty reply is an `Inference` error.
    pub async fn summarize(&self, text: &str) -> Result<String> {
        let start = Instant::now();
        let reply = self
            .backend
            .generate_with_system(SUMMARY_INSTRUCTION, text)
            .await?;

        let summary = reply.trim();
        if summary.is_empty() {
            return Err(Error::Inference(
                "Provider returned an empty summary".to_string(),
            ));
        }

        info!(
            subsystem = "inference",
            component = "enrichment",
            op = "summarize",
            model = self.gen_model(),
            prompt_len = text.len(),
            response_len = summary.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Summary generated"
        );
        Ok(summary.to_string())
    }

    /// Embed `text` as a single vector of the configured dimension.
    pub async fn embed(&self, text: &str) -> Result<Vector> {
        let start = Instant::now();
        let vector = self
            .backend
            .embed_texts(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("Provider returned no embedding".to_string()))?;

        let expected = self.dimension();
        let found = vector.as_slice().len();
        if found != expected {
            return Err(Error::Embedding(format!(
                "Expected {}-dimensional embedding, provider returned {} dimensions",
                expected, found
            )));
        }

        debug!(
            subsystem = "inference",
            component = "enrichment",
            op = "embed",
            model = self.embed_model(),
            dimension = found,
            duration_ms = start.elapsed().as_millis() as u64,
            "Embedding generated"
        );
        Ok(vector)
    }

    /// Whether the provider is reachable.
    pub async fn health_check(&self) -> Result<bool> {
        self.backend.health_check().await
    }
}
