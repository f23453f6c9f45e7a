//! Core data models for jotter.
//!
//! These types are shared across all jotter crates and represent the note
//! domain and its enrichment lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use pgvector::Vector;

// =============================================================================
// NOTE TYPES
// =============================================================================

/// A persisted note.
///
/// `summary` and `embedding` are written only by the enrichment path. The
/// embedding is never serialized; clients see it only through semantic search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Note {
    pub id: i64,
    /// Empty string means "untitled".
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    #[serde(skip)]
    pub embedding: Option<Vector>,
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Whether an embedding has been attached.
    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some()
    }

    /// Case-insensitive substring match on title or content.
    ///
    /// `needle_lower` must already be lowercased.
    pub fn matches_text(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self.content.to_lowercase().contains(needle_lower)
    }
}

/// Request for creating a new note.
///
/// Callers that computed enrichment up front (eager mode) pass it here so the
/// note is persisted in one write.
#[derive(Debug, Clone, Default)]
pub struct CreateNoteRequest {
    pub title: Option<String>,
    pub content: String,
    pub summary: Option<String>,
    pub embedding: Option<Vector>,
}

impl CreateNoteRequest {
    /// Create a request with no pre-computed enrichment.
    pub fn new(title: Option<String>, content: impl Into<String>) -> Self {
        Self {
            title,
            content: content.into(),
            summary: None,
            embedding: None,
        }
    }

    /// Attach a pre-computed summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Attach a pre-computed embedding.
    pub fn with_embedding(mut self, embedding: Vector) -> Self {
        self.embedding = Some(embedding);
        self
    }
}

/// Request for updating a note's user-editable fields.
///
/// A supplied field replaces the stored value; `None` leaves it unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Enrichment output to attach to an existing note.
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct NoteEnrichment {
    pub summary: Option<String>,
    pub embedding: Option<Vector>,
}

impl NoteEnrichment {
    /// Enrichment carrying only a summary.
    pub fn summary(summary: impl Into<String>) -> Self {
        Self {
            summary: Some(summary.into()),
            embedding: None,
        }
    }

    /// Enrichment carrying only an embedding.
    pub fn embedding(embedding: Vector) -> Self {
        Self {
            summary: None,
            embedding: Some(embedding),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_none() && self.embedding.is_none()
    }
}

// =============================================================================
// ENRICHMENT POLICY
// =============================================================================

/// When enrichment runs for newly created notes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentMode {
    /// Summarize/embed at creation time; failures do not block creation.
    Eager,
    /// Only enrich when a client explicitly asks.
    #[default]
    Lazy,
}

impl std::fmt::Display for EnrichmentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eager => write!(f, "eager"),
            Self::Lazy => write!(f, "lazy"),
        }
    }
}

impl std::str::FromStr for EnrichmentMode {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "eager" => Ok(Self::Eager),
            "lazy" => Ok(Self::Lazy),
            _ => Err(format!("Invalid enrichment mode: {}", s)),
        }
    }
}
