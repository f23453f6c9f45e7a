//! # jotter-inference
//!
//! Summary and embedding providers for jotter.
//!
//! This crate provides:
//! - `EnrichmentService`: summarize and embed note text through any
//!   [`InferenceBackend`](jotter_core::InferenceBackend)
//! - OpenAI-compatible implementation (feature `openai`, default)
//! - Deterministic mock backend (feature `mock`)
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use jotter_inference::{EnrichmentService, OpenAIBackend};
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = OpenAIBackend::from_env().unwrap();
//!     let enrichment = EnrichmentService::new(Arc::new(backend));
//!     let summary = enrichment.summarize("buy milk and eggs").await.unwrap();
//! }
//! ```

pub mod enrichment;

#[cfg(feature = "openai")]
pub mod openai;

// Mock inference backend for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use jotter_core::*;

pub use enrichment::EnrichmentService;

#[cfg(feature = "openai")]
pub use openai::{OpenAIBackend, OpenAIConfig};
