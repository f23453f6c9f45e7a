//! Note repository implementation.

use std::time::Instant;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::{debug, info};

use jotter_core::validation::dimension_mismatch;
use jotter_core::{
    validate_content, validate_enrichment, validate_limit, validate_query_vector, CreateNoteRequest, Error, Note,
    NoteEnrichment, NoteRepository, Result, UpdateNoteRequest, Vector,
};

use crate::escape_like;

/// Columns selected for a full `Note` row.
const NOTE_COLUMNS: &str = "id, title, content, summary, embedding, created_at";

/// Columns for listings, which never need the vector.
const LISTING_COLUMNS: &str = "id, title, content, summary, NULL::vector AS embedding, created_at";

/// PostgreSQL implementation of NoteRepository.
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Dimension of some stored embedding that differs from `dims`, if any.
    async fn find_mismatched_dimension(&self, dims: usize) -> Result<Option<usize>> {
        let found: Option<i32> = sqlx::query_scalar(
            "SELECT vector_dims(embedding) FROM notes
             WHERE embedding IS NOT NULL AND vector_dims(embedding) <> $1
             LIMIT 1",
        )
        .bind(dims as i32)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(found.map(|d| d as usize))
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn insert(&self, req: CreateNoteRequest) -> Result<Note> {
        validate_content(&req.content)?;

        let sql = format!(
            "INSERT INTO notes (title, content, summary, embedding)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            NOTE_COLUMNS
        );
        let note = sqlx::query_as::<_, Note>(&sql)
            .bind(req.title.unwrap_or_default())
            .bind(req.content)
            .bind(req.summary)
            .bind(req.embedding)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        info!(
            subsystem = "db",
            component = "notes",
            op = "insert",
            note_id = note.id,
            "Note created"
        );
        Ok(note)
    }

    async fn list(&self) -> Result<Vec<Note>> {
        let sql = format!("SELECT {} FROM notes ORDER BY id DESC", LISTING_COLUMNS);
        let notes = sqlx::query_as::<_, Note>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(notes)
    }

    async fn fetch(&self, id: i64) -> Result<Note> {
        let sql = format!("SELECT {} FROM notes WHERE id = $1", NOTE_COLUMNS);
        sqlx::query_as::<_, Note>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::NoteNotFound(id))
    }

    async fn update(&self, id: i64, req: UpdateNoteRequest) -> Result<Note> {
        if let Some(content) = &req.content {
            validate_content(content)?;
        }

        let sql = format!(
            "UPDATE notes
             SET title = COALESCE($1, title), content = COALESCE($2, content)
             WHERE id = $3
             RETURNING {}",
            NOTE_COLUMNS
        );
        let note = sqlx::query_as::<_, Note>(&sql)
            .bind(req.title)
            .bind(req.content)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::NoteNotFound(id))?;

        info!(
            subsystem = "db",
            component = "notes",
            op = "update",
            note_id = id,
            "Note updated"
        );
        Ok(note)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(id));
        }

        info!(
            subsystem = "db",
            component = "notes",
            op = "delete",
            note_id = id,
            "Note deleted"
        );
        Ok(())
    }

    async fn attach_enrichment(&self, id: i64, enrichment: NoteEnrichment) -> Result<Note> {
        validate_enrichment(&enrichment)?;

        let sql = format!(
            "UPDATE notes
             SET summary = COALESCE($1, summary), embedding = COALESCE($2, embedding)
             WHERE id = $3
             RETURNING {}",
            NOTE_COLUMNS
        );
        let has_summary = enrichment.summary.is_some();
        let has_embedding = enrichment.embedding.is_some();
        let note = sqlx::query_as::<_, Note>(&sql)
            .bind(enrichment.summary)
            .bind(enrichment.embedding)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::NoteNotFound(id))?;

        debug!(
            subsystem = "db",
            component = "notes",
            op = "attach_enrichment",
            note_id = id,
            has_summary,
            has_embedding,
            "Enrichment attached"
        );
        Ok(note)
    }

    async fn search_text(&self, query: &str) -> Result<Vec<Note>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let pattern = format!("%{}%", escape_like(query));
        let sql = format!(
            "SELECT {} FROM notes
             WHERE title ILIKE $1 ESCAPE '\\' OR content ILIKE $1 ESCAPE '\\'
             ORDER BY id DESC",
            LISTING_COLUMNS
        );
        let notes = sqlx::query_as::<_, Note>(&sql)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "notes",
            op = "search_text",
            query = query,
            result_count = notes.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Text search complete"
        );
        Ok(notes)
    }

    async fn search_by_embedding(&self, query_vec: &Vector, limit: i64) -> Result<Vec<Note>> {
        validate_limit(limit)?;
        validate_query_vector(query_vec)?;

        let dims = query_vec.as_slice().len();
        if let Some(found) = self.find_mismatched_dimension(dims).await? {
            return Err(dimension_mismatch(dims, found));
        }

        let start = Instant::now();
        let sql = format!(
            "SELECT {} FROM notes
             WHERE embedding IS NOT NULL
             ORDER BY embedding <-> $1, id DESC
             LIMIT $2",
            NOTE_COLUMNS
        );
        let notes = sqlx::query_as::<_, Note>(&sql)
            .bind(query_vec)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "notes",
            op = "search_by_embedding",
            dimension = dims,
            result_count = notes.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Vector search complete"
        );
        Ok(notes)
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM notes WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(exists)
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_columns_cover_model() {
        for column in ["id", "title", "content", "summary", "embedding", "created_at"] {
            assert!(NOTE_COLUMNS.contains(column), "missing column {}", column);
            assert!(LISTING_COLUMNS.contains(column), "missing column {}", column);
        }
    }

    #[test]
    fn test_listing_columns_skip_stored_vector() {
        assert!(LISTING_COLUMNS.contains("NULL::vector AS embedding"));
        assert!(!LISTING_COLUMNS.contains(", embedding,"));
    }
}
