//! OpenAI-compatible inference backend.
//!
//! Works with any endpoint exposing `/chat/completions` and `/embeddings`:
//!
//! - OpenAI cloud API
//! - Ollama (in OpenAI compatibility mode)
//! - vLLM
//! - LocalAI
//!
//! # Example
//!
//! ```rust,no_run
//! use jotter_inference::openai::{OpenAIBackend, OpenAIConfig};
//! use jotter_core::EmbeddingBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = OpenAIConfig {
//!         base_url: "http://localhost:11434/v1".to_string(), // Ollama
//!         embed_model: "nomic-embed-text".to_string(),
//!         embed_dimension: 768,
//!         ..Default::default()
//!     };
//!     let backend = OpenAIBackend::new(config).unwrap();
//!
//!     let texts = vec!["Hello, world!".to_string()];
//!     let vectors = backend.embed_texts(&texts).await.unwrap();
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{OpenAIBackend, OpenAIConfig, DEFAULT_OPENAI_URL};
pub use error::{to_jotter_error, OpenAIErrorCode, ProviderCall};
pub use types::*;
