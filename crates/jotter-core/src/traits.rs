//! Core traits for jotter abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// NOTE REPOSITORY TRAITS
// =============================================================================

/// Repository for note CRUD, enrichment attachment, and search.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a new note and return the persisted record.
    ///
    /// Fails with `InvalidInput` if content is blank.
    async fn insert(&self, req: CreateNoteRequest) -> Result<Note>;

    /// List all notes, newest first.
    ///
    /// Embeddings are not loaded; `fetch` returns them.
    async fn list(&self) -> Result<Vec<Note>>;

    /// Fetch a note by id.
    async fn fetch(&self, id: i64) -> Result<Note>;

    /// Replace the supplied user-editable fields. Enrichment is untouched.
    async fn update(&self, id: i64, req: UpdateNoteRequest) -> Result<Note>;

    /// Permanently delete a note. Missing ids fail with `NoteNotFound`.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Attach summary and/or embedding to an existing note.
    ///
    /// An enrichment carrying neither fails with `InvalidInput`.
    async fn attach_enrichment(&self, id: i64, enrichment: NoteEnrichment) -> Result<Note>;

    /// Case-insensitive substring search over title and content.
    ///
    /// A blank query returns no results. Embeddings are not loaded.
    async fn search_text(&self, query: &str) -> Result<Vec<Note>>;

    /// Notes closest to `query_vec` by Euclidean distance, nearest first.
    async fn search_by_embedding(&self, query_vec: &Vector, limit: i64) -> Result<Vec<Note>>;

    /// Check if a note exists.
    async fn exists(&self, id: i64) -> Result<bool>;

    /// Short backend name for health output ("postgres", "memory").
    fn backend_name(&self) -> &'static str;
}

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// Backend for generating text embeddings.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Generate embeddings for the given texts.
    ///
    /// Returns a vector of embedding vectors, one per input text.
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vector>>;

    /// Get the expected dimension of embedding vectors.
    fn dimension(&self) -> usize;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

/// Backend for text generation (LLM).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text given a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate text with system context.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

/// Combined inference backend supporting both embedding and generation.
#[async_trait]
pub trait InferenceBackend: EmbeddingBackend + GenerationBackend {
    /// Check if the backend is available and responding.
    async fn health_check(&self) -> Result<bool>;
}
