//! Note service: storage plus the enrichment policy.
//!
//! Handlers talk to this instead of the repository so that validation,
//! eager/lazy enrichment and the "check before calling the provider" rule
//! live in one place.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use jotter_core::defaults::{SEMANTIC_SEARCH_LIMIT, SEMANTIC_SEARCH_MAX_LIMIT};
use jotter_core::{
    validate_content, validate_limit, CreateNoteRequest, EnrichmentMode, Error, Note,
    NoteEnrichment, NoteRepository, Result, UpdateNoteRequest,
};
use jotter_inference::EnrichmentService;

/// Which enrichment the service may perform, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichmentConfig {
    /// Enrich at creation time or only on request.
    pub on_create: EnrichmentMode,
    /// Summaries may be generated.
    pub summaries: bool,
    /// Embeddings (and semantic search) are available.
    pub embeddings: bool,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            on_create: EnrichmentMode::Lazy,
            summaries: true,
            embeddings: false,
        }
    }
}

/// Result of creating a note.
///
/// `enrichment_error` is set when eager enrichment failed; the note was
/// stored anyway, without the failed fields.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreatedNote {
    #[serde(flatten)]
    pub note: Note,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrichment_error: Option<String>,
}

#[derive(Clone)]
pub struct NoteService {
    repo: Arc<dyn NoteRepository>,
    enrichment: Option<EnrichmentService>,
    config: EnrichmentConfig,
}

impl NoteService {
    pub fn new(
        repo: Arc<dyn NoteRepository>,
        enrichment: Option<EnrichmentService>,
        config: EnrichmentConfig,
    ) -> Self {
        Self {
            repo,
            enrichment,
            config,
        }
    }

    pub fn config(&self) -> &EnrichmentConfig {
        &self.config
    }

    /// Short name of the storage backend ("postgres", "memory").
    pub fn storage_backend(&self) -> &'static str {
        self.repo.backend_name()
    }

    pub fn enrichment(&self) -> Option<&EnrichmentService> {
        self.enrichment.as_ref()
    }

    fn summarizer(&self) -> Result<&EnrichmentService> {
        match &self.enrichment {
            Some(svc) if self.config.summaries => Ok(svc),
            Some(_) => Err(Error::EnrichmentDisabled(
                "summaries are turned off (SUMMARIES_ENABLED=false)".to_string(),
            )),
            None => Err(Error::EnrichmentDisabled(
                "no enrichment provider configured".to_string(),
            )),
        }
    }

    fn embedder(&self) -> Result<&EnrichmentService> {
        match &self.enrichment {
            Some(svc) if self.config.embeddings => Ok(svc),
            Some(_) => Err(Error::EnrichmentDisabled(
                "embeddings are turned off (EMBEDDINGS_ENABLED=false)".to_string(),
            )),
            None => Err(Error::EnrichmentDisabled(
                "no enrichment provider configured".to_string(),
            )),
        }
    }

    /// Create a note, enriching it first when the policy is eager.
    ///
    /// Enrichment failures never block creation.
    pub async fn create_note(&self, title: Option<String>, content: String) -> Result<CreatedNote> {
        validate_content(&content)?;

        let mut req = CreateNoteRequest::new(title, content);
        let mut failures = Vec::new();

        if self.config.on_create == EnrichmentMode::Eager {
            if let Ok(svc) = self.summarizer() {
                match svc.summarize(&req.content).await {
                    Ok(summary) => req.summary = Some(summary),
                    Err(e) => failures.push(format!("summary: {}", e)),
                }
            }
            if let Ok(svc) = self.embedder() {
                match svc.embed(&req.content).await {
                    Ok(embedding) => req.embedding = Some(embedding),
                    Err(e) => failures.push(format!("embedding: {}", e)),
                }
            }
        }

        let note = self.repo.insert(req).await?;

        let enrichment_error = if failures.is_empty() {
            None
        } else {
            let message = failures.join("; ");
            warn!(
                subsystem = "api",
                component = "note_service",
                op = "create",
                note_id = note.id,
                error = %message,
                "Eager enrichment failed, note stored without it"
            );
            Some(message)
        };

        Ok(CreatedNote {
            note,
            enrichment_error,
        })
    }

    pub async fn list_notes(&self) -> Result<Vec<Note>> {
        self.repo.list().await
    }

    pub async fn get_note(&self, id: i64) -> Result<Note> {
        self.repo.fetch(id).await
    }

    /// Replace user-editable fields. Stored enrichment is left as-is.
    pub async fn update_note(&self, id: i64, req: UpdateNoteRequest) -> Result<Note> {
        self.repo.update(id, req).await
    }

    pub async fn delete_note(&self, id: i64) -> Result<()> {
        self.repo.delete(id).await?;
        info!(
            subsystem = "api",
            component = "note_service",
            op = "delete",
            note_id = id,
            "Note deleted"
        );
        Ok(())
    }

    /// Summarize a stored note and attach the summary.
    ///
    /// A missing note fails before the provider is contacted.
    pub async fn summarize_note(&self, id: i64) -> Result<Note> {
        let note = self.repo.fetch(id).await?;
        let summary = self.summarizer()?.summarize(&note.content).await?;
        self.repo
            .attach_enrichment(id, NoteEnrichment::summary(summary))
            .await
    }

    /// Embed a stored note and attach the vector.
    ///
    /// A missing note fails before the provider is contacted.
    pub async fn embed_note(&self, id: i64) -> Result<Note> {
        let note = self.repo.fetch(id).await?;
        let embedding = self.embedder()?.embed(&note.content).await?;
        self.repo
            .attach_enrichment(id, NoteEnrichment::embedding(embedding))
            .await
    }

    pub async fn search_text(&self, query: &str) -> Result<Vec<Note>> {
        self.repo.search_text(query).await
    }

    /// Embed `query` and return the nearest notes.
    ///
    /// `limit` defaults to 5 and is capped at 50. A blank query returns no
    /// results without calling the provider.
    pub async fn search_semantic(&self, query: &str, limit: Option<i64>) -> Result<Vec<Note>> {
        let limit = limit.unwrap_or(SEMANTIC_SEARCH_LIMIT);
        validate_limit(limit)?;
        let limit = limit.min(SEMANTIC_SEARCH_MAX_LIMIT);

        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let vector = self.embedder()?.embed(query).await?;
        self.repo.search_by_embedding(&vector, limit).await
    }
}
