//! Mock inference backend for deterministic testing.
//!
//! Implements the inference traits without any network access: embeddings
//! are derived from the input text, generations come from fixed or mapped
//! responses, and every call is logged for assertions.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jotter_inference::mock::MockInferenceBackend;
//! use jotter_core::GenerationBackend;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let backend = MockInferenceBackend::new()
//!     .with_dimension(8)
//!     .with_fixed_response("Buy milk and eggs.");
//!
//! let summary = backend.generate("buy milk and eggs").await.unwrap();
//! assert_eq!(summary, "Buy milk and eggs.");
//! assert_eq!(backend.generate_call_count(), 1);
//! # }
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use async_trait::async_trait;

use jotter_core::{EmbeddingBackend, Error, GenerationBackend, InferenceBackend, Result, Vector};

/// Mock inference backend for testing.
#[derive(Clone)]
pub struct MockInferenceBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    dimension: usize,
    fixed_responses: HashMap<String, String>,
    fixed_embeddings: HashMap<String, Vec<f32>>,
    default_response: String,
    fail: bool,
}

#[derive(Debug, Clone)]
pub struct MockCall {
    pub operation: String,
    pub input: String,
    pub timestamp: Instant,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            dimension: 8,
            fixed_responses: HashMap::new(),
            fixed_embeddings: HashMap::new(),
            default_response: "Mock summary".to_string(),
            fail: false,
        }
    }
}

impl MockInferenceBackend {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the embedding dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        Arc::make_mut(&mut self.config).dimension = dimension;
        self
    }

    /// Set a fixed response for generation requests.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Add a response mapping for a specific prompt.
    pub fn with_response_mapping(
        mut self,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .fixed_responses
            .insert(input.into(), output.into());
        self
    }

    /// Return `embedding` verbatim whenever `input` is embedded.
    ///
    /// The vector is not checked against the configured dimension, so tests
    /// can provoke dimension errors.
    pub fn with_embedding_mapping(mut self, input: impl Into<String>, embedding: Vec<f32>) -> Self {
        Arc::make_mut(&mut self.config)
            .fixed_embeddings
            .insert(input.into(), embedding);
        self
    }

    /// Make every call fail with a provider error.
    pub fn with_failure(mut self, fail: bool) -> Self {
        Arc::make_mut(&mut self.config).fail = fail;
        self
    }

    fn log(&self) -> MutexGuard<'_, Vec<MockCall>> {
        self.call_log.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.log().clone()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.log().clear()
    }

    /// Get number of embed calls.
    pub fn embed_call_count(&self) -> usize {
        self.log().iter().filter(|c| c.operation == "embed").count()
    }

    /// Get number of generation calls.
    pub fn generate_call_count(&self) -> usize {
        self.log()
            .iter()
            .filter(|c| c.operation == "generate")
            .count()
    }

    fn log_call(&self, operation: &str, input: &str) {
        self.log().push(MockCall {
            operation: operation.to_string(),
            input: input.to_string(),
            timestamp: Instant::now(),
        });
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        match self.config.fixed_embeddings.get(text) {
            Some(embedding) => embedding.clone(),
            None => MockEmbeddingGenerator::generate(text, self.config.dimension),
        }
    }
}

impl Default for MockInferenceBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingBackend for MockInferenceBackend {
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vector>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            self.log_call("embed", text);
            if self.config.fail {
                return Err(Error::Embedding("Simulated failure for testing".to_string()));
            }
            vectors.push(Vector::from(self.embed_one(text)));
        }
        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    fn model_name(&self) -> &str {
        "mock-embed"
    }
}

#[async_trait]
impl GenerationBackend for MockInferenceBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, _system: &str, prompt: &str) -> Result<String> {
        self.log_call("generate", prompt);
        if self.config.fail {
            return Err(Error::Inference("Simulated failure for testing".to_string()));
        }

        Ok(self
            .config
            .fixed_responses
            .get(prompt)
            .cloned()
            .unwrap_or_else(|| self.config.default_response.clone()))
    }

    fn model_name(&self) -> &str {
        "mock-gen"
    }
}

#[async_trait]
impl InferenceBackend for MockInferenceBackend {
    async fn health_check(&self) -> Result<bool> {
        Ok(!self.config.fail)
    }
}

/// Mock embedding generator with deterministic output.
pub struct MockEmbeddingGenerator;

impl MockEmbeddingGenerator {
    /// Generate a deterministic embedding from text.
    ///
    /// Uses character-based hashing for reproducibility. The same text
    /// will always produce the same unit-length embedding.
    pub fn generate(text: &str, dimension: usize) -> Vec<f32> {
        let mut vec = vec![0.0; dimension];
        if dimension == 0 {
            return vec;
        }

        for (i, c) in text.chars().enumerate() {
            let idx = (c as usize + i) % dimension;
            vec[idx] += 0.1;
        }

        let magnitude: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            vec.iter_mut().for_each(|x| *x /= magnitude);
        }
        vec
    }
}
