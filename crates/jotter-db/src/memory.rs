//! In-process note repository.
//!
//! Implements the same contract as [`PgNoteRepository`](crate::PgNoteRepository)
//! over a `BTreeMap`, for local development without PostgreSQL and for tests.
//! Nothing survives a restart.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use jotter_core::validation::dimension_mismatch;
use jotter_core::{
    validate_content, validate_enrichment, validate_limit, validate_query_vector,
    CreateNoteRequest, Error, Note, NoteEnrichment, NoteRepository, Result, UpdateNoteRequest,
    Vector,
};

/// Euclidean (L2) distance, the same metric as pgvector's `<->`.
///
/// Returns `None` when the vectors have different lengths.
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() {
        return None;
    }
    let sum: f32 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
    Some(sum.sqrt())
}

/// Memory-backed implementation of NoteRepository.
pub struct MemoryNoteRepository {
    notes: RwLock<BTreeMap<i64, Note>>,
    next_id: AtomicI64,
}

impl MemoryNoteRepository {
    pub fn new() -> Self {
        Self {
            notes: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

/// Copy of `note` as listings return it, without the vector.
fn without_embedding(note: &Note) -> Note {
    Note {
        embedding: None,
        ..note.clone()
    }
}

impl Default for MemoryNoteRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NoteRepository for MemoryNoteRepository {
    async fn insert(&self, req: CreateNoteRequest) -> Result<Note> {
        validate_content(&req.content)?;

        let id = self.next_id.fetch_add(1, AtomicOrdering::SeqCst);
        let note = Note {
            id,
            title: req.title.unwrap_or_default(),
            content: req.content,
            summary: req.summary,
            embedding: req.embedding,
            created_at: Utc::now(),
        };
        self.notes.write().await.insert(id, note.clone());
        debug!(
            subsystem = "db",
            component = "memory",
            op = "insert",
            note_id = id,
            "Note created"
        );
        Ok(note)
    }

    async fn list(&self) -> Result<Vec<Note>> {
        Ok(self
            .notes
            .read()
            .await
            .values()
            .rev()
            .map(without_embedding)
            .collect())
    }

    async fn fetch(&self, id: i64) -> Result<Note> {
        self.notes
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(Error::NoteNotFound(id))
    }

    async fn update(&self, id: i64, req: UpdateNoteRequest) -> Result<Note> {
        if let Some(content) = &req.content {
            validate_content(content)?;
        }

        let mut notes = self.notes.write().await;
        let note = notes.get_mut(&id).ok_or(Error::NoteNotFound(id))?;
        if let Some(title) = req.title {
            note.title = title;
        }
        if let Some(content) = req.content {
            note.content = content;
        }
        Ok(note.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.notes
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::NoteNotFound(id))
    }

    async fn attach_enrichment(&self, id: i64, enrichment: NoteEnrichment) -> Result<Note> {
        validate_enrichment(&enrichment)?;
        let mut notes = self.notes.write().await;
        let note = notes.get_mut(&id).ok_or(Error::NoteNotFound(id))?;
        if let Some(summary) = enrichment.summary {
            note.summary = Some(summary);
        }
        if let Some(embedding) = enrichment.embedding {
            note.embedding = Some(embedding);
        }
        Ok(note.clone())
    }

    async fn search_text(&self, query: &str) -> Result<Vec<Note>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .notes
            .read()
            .await
            .values()
            .rev()
            .filter(|n| n.matches_text(&needle))
            .map(without_embedding)
            .collect())
    }

    async fn search_by_embedding(&self, query_vec: &Vector, limit: i64) -> Result<Vec<Note>> {
        validate_limit(limit)?;
        validate_query_vector(query_vec)?;

        let query = query_vec.as_slice();
        let notes = self.notes.read().await;

        let mut ranked = Vec::new();
        for note in notes.values() {
            let Some(embedding) = &note.embedding else {
                continue;
            };
            let stored = embedding.as_slice();
            let distance = euclidean_distance(query, stored)
                .ok_or_else(|| dimension_mismatch(query.len(), stored.len()))?;
            ranked.push((distance, note));
        }

        ranked.sort_by(|(da, a), (db, b)| {
            da.partial_cmp(db)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(ranked
            .into_iter()
            .take(limit as usize)
            .map(|(_, note)| note.clone())
            .collect())
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        Ok(self.notes.read().await.contains_key(&id))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(values: &[f32]) -> Vector {
        Vector::from(values.to_vec())
    }

    async fn insert(repo: &MemoryNoteRepository, title: &str, content: &str) -> Note {
        repo.insert(CreateNoteRequest::new(Some(title.to_string()), content))
            .await
            .expect("insert should succeed")
    }

    #[test]
    fn test_euclidean_distance() {
        assert_eq!(euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]), Some(5.0));
        assert_eq!(euclidean_distance(&[1.0], &[1.0]), Some(0.0));
        assert_eq!(euclidean_distance(&[1.0], &[1.0, 2.0]), None);
    }

    #[tokio::test]
    async fn test_create_then_fetch_groceries() {
        let repo = MemoryNoteRepository::new();
        let created = insert(&repo, "Groceries", "buy milk and eggs").await;
        assert_eq!(created.id, 1);

        let fetched = repo.fetch(created.id).await.unwrap();
        assert_eq!(fetched.id, 1);
        assert_eq!(fetched.title, "Groceries");
        assert_eq!(fetched.content, "buy milk and eggs");
        assert!(fetched.summary.is_none());
        assert!(fetched.embedding.is_none());
    }

    #[tokio::test]
    async fn test_create_without_title_is_untitled() {
        let repo = MemoryNoteRepository::new();
        let note = repo
            .insert(CreateNoteRequest::new(None, "just content"))
            .await
            .unwrap();
        assert_eq!(note.title, "");
    }

    #[tokio::test]
    async fn test_create_blank_content_rejected_and_not_persisted() {
        let repo = MemoryNoteRepository::new();
        for content in ["", "   ", "\n\t"] {
            let err = repo
                .insert(CreateNoteRequest::new(Some("t".into()), content))
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)));
        }
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_keeps_precomputed_enrichment() {
        let repo = MemoryNoteRepository::new();
        let note = repo
            .insert(
                CreateNoteRequest::new(None, "content")
                    .with_summary("sum")
                    .with_embedding(vector(&[1.0, 0.0])),
            )
            .await
            .unwrap();
        assert_eq!(note.summary.as_deref(), Some("sum"));
        assert!(note.has_embedding());
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let repo = MemoryNoteRepository::new();
        insert(&repo, "a", "first").await;
        insert(&repo, "b", "second").await;
        insert(&repo, "c", "third").await;

        let ids: Vec<i64> = repo.list().await.unwrap().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_fetch_missing_is_not_found() {
        let repo = MemoryNoteRepository::new();
        let err = repo.fetch(42).await.unwrap_err();
        assert!(matches!(err, Error::NoteNotFound(42)));
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_keeps_enrichment() {
        let repo = MemoryNoteRepository::new();
        let note = insert(&repo, "old", "old content").await;
        repo.attach_enrichment(
            note.id,
            NoteEnrichment {
                summary: Some("summary".into()),
                embedding: Some(vector(&[0.5, 0.5])),
            },
        )
        .await
        .unwrap();

        repo.update(
            note.id,
            UpdateNoteRequest {
                title: Some("new".into()),
                content: Some("new content".into()),
            },
        )
        .await
        .unwrap();

        let fetched = repo.fetch(note.id).await.unwrap();
        assert_eq!(fetched.title, "new");
        assert_eq!(fetched.content, "new content");
        assert_eq!(fetched.summary.as_deref(), Some("summary"));
        assert_eq!(fetched.embedding, Some(vector(&[0.5, 0.5])));
    }

    #[tokio::test]
    async fn test_update_omitted_fields_unchanged() {
        let repo = MemoryNoteRepository::new();
        let note = insert(&repo, "keep me", "content").await;
        let updated = repo
            .update(
                note.id,
                UpdateNoteRequest {
                    title: None,
                    content: Some("changed".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "keep me");
        assert_eq!(updated.content, "changed");
    }

    #[tokio::test]
    async fn test_update_missing_and_blank() {
        let repo = MemoryNoteRepository::new();
        let err = repo
            .update(7, UpdateNoteRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoteNotFound(7)));

        let note = insert(&repo, "t", "content").await;
        let err = repo
            .update(
                note.id,
                UpdateNoteRequest {
                    title: None,
                    content: Some("  ".into()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(repo.fetch(note.id).await.unwrap().content, "content");
    }

    #[tokio::test]
    async fn test_delete_then_fetch_not_found() {
        let repo = MemoryNoteRepository::new();
        let note = insert(&repo, "t", "content").await;
        repo.delete(note.id).await.unwrap();

        assert!(matches!(
            repo.fetch(note.id).await.unwrap_err(),
            Error::NoteNotFound(_)
        ));
        assert!(matches!(
            repo.delete(note.id).await.unwrap_err(),
            Error::NoteNotFound(_)
        ));
        assert!(!repo.exists(note.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = MemoryNoteRepository::new();
        let first = insert(&repo, "a", "one").await;
        repo.delete(first.id).await.unwrap();
        let second = insert(&repo, "b", "two").await;
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_attach_enrichment_missing_note() {
        let repo = MemoryNoteRepository::new();
        let err = repo
            .attach_enrichment(5, NoteEnrichment::summary("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoteNotFound(5)));
    }

    #[tokio::test]
    async fn test_attach_empty_enrichment_rejected() {
        let repo = MemoryNoteRepository::new();
        let note = insert(&repo, "t", "content").await;

        let err = repo
            .attach_enrichment(note.id, NoteEnrichment::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(repo.fetch(note.id).await.unwrap().summary.is_none());
    }

    #[tokio::test]
    async fn test_listings_omit_embeddings() {
        let repo = MemoryNoteRepository::new();
        let note = insert(&repo, "Groceries", "buy milk").await;
        repo.attach_enrichment(note.id, NoteEnrichment::embedding(vector(&[1.0, 0.0])))
            .await
            .unwrap();

        assert!(!repo.list().await.unwrap()[0].has_embedding());
        assert!(!repo.search_text("milk").await.unwrap()[0].has_embedding());
        assert!(repo.fetch(note.id).await.unwrap().has_embedding());
    }

    #[tokio::test]
    async fn test_search_text_blank_query_is_empty() {
        let repo = MemoryNoteRepository::new();
        insert(&repo, "Groceries", "buy milk").await;
        assert!(repo.search_text("").await.unwrap().is_empty());
        assert!(repo.search_text("   ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_text_matches_title_or_content_case_insensitively() {
        let repo = MemoryNoteRepository::new();
        let groceries = insert(&repo, "Groceries", "buy milk and eggs").await;
        let work = insert(&repo, "Work", "finish the report").await;
        let milky = insert(&repo, "MILK run", "corner shop").await;

        let hits: Vec<i64> = repo
            .search_text("milk")
            .await
            .unwrap()
            .iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(hits, vec![milky.id, groceries.id]);

        let hits = repo.search_text("REPORT").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, work.id);
    }

    #[tokio::test]
    async fn test_search_by_embedding_returns_closest_in_order() {
        let repo = MemoryNoteRepository::new();
        let far = insert(&repo, "far", "far").await;
        let near = insert(&repo, "near", "near").await;
        let mid = insert(&repo, "mid", "mid").await;
        let _unembedded = insert(&repo, "none", "no embedding").await;

        repo.attach_enrichment(far.id, NoteEnrichment::embedding(vector(&[10.0, 0.0])))
            .await
            .unwrap();
        repo.attach_enrichment(near.id, NoteEnrichment::embedding(vector(&[1.0, 0.0])))
            .await
            .unwrap();
        repo.attach_enrichment(mid.id, NoteEnrichment::embedding(vector(&[3.0, 0.0])))
            .await
            .unwrap();

        let hits: Vec<i64> = repo
            .search_by_embedding(&vector(&[0.0, 0.0]), 2)
            .await
            .unwrap()
            .iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(hits, vec![near.id, mid.id]);
    }

    #[tokio::test]
    async fn test_search_by_embedding_dimension_mismatch() {
        let repo = MemoryNoteRepository::new();
        let note = insert(&repo, "t", "content").await;
        repo.attach_enrichment(note.id, NoteEnrichment::embedding(vector(&[1.0, 2.0, 3.0])))
            .await
            .unwrap();

        let err = repo
            .search_by_embedding(&vector(&[1.0, 2.0]), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_search_by_embedding_rejects_bad_limit_and_empty_vector() {
        let repo = MemoryNoteRepository::new();
        assert!(matches!(
            repo.search_by_embedding(&vector(&[1.0]), 0).await.unwrap_err(),
            Error::InvalidInput(_)
        ));
        assert!(matches!(
            repo.search_by_embedding(&vector(&[]), 3).await.unwrap_err(),
            Error::InvalidInput(_)
        ));
    }
}
