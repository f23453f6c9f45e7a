//! Note CRUD and enrichment HTTP handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::services::CreatedNote;
use crate::{ApiError, AppState};
use jotter_core::{Note, UpdateNoteRequest};

/// Request body for creating a note.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateNoteBody {
    /// Optional title; omitted means untitled.
    pub title: Option<String>,
    /// Note text. Must contain a non-whitespace character; a missing or
    /// null value is rejected as blank.
    pub content: Option<String>,
}

/// Request body for updating a note. Omitted fields keep their value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateNoteBody {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl From<UpdateNoteBody> for UpdateNoteRequest {
    fn from(body: UpdateNoteBody) -> Self {
        UpdateNoteRequest {
            title: body.title,
            content: body.content,
        }
    }
}

/// Body of the legacy summary endpoint, `{"noteId": 1}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SummaryBody {
    #[serde(rename = "noteId")]
    pub note_id: i64,
}

/// Create a note.
///
/// With `ENRICH_ON_CREATE=eager` the note is summarized and/or embedded
/// before it is stored. Enrichment failures are reported in
/// `enrichment_error` but do not fail the request.
///
/// # Returns
/// - 201 Created with the stored note
/// - 400 Bad Request if content is blank
#[utoipa::path(
    post,
    path = "/api/notes",
    tag = "Notes",
    request_body = CreateNoteBody,
    responses(
        (status = 201, description = "Note created", body = CreatedNote),
        (status = 400, description = "Content is blank"),
    )
)]
pub async fn create_note(
    State(state): State<AppState>,
    Json(body): Json<CreateNoteBody>,
) -> Result<(StatusCode, Json<CreatedNote>), ApiError> {
    let content = body.content.unwrap_or_default();
    let created = state.notes.create_note(body.title, content).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List all notes, newest first.
#[utoipa::path(
    get,
    path = "/api/notes",
    tag = "Notes",
    responses((status = 200, description = "All notes", body = [Note]))
)]
pub async fn list_notes(State(state): State<AppState>) -> Result<Json<Vec<Note>>, ApiError> {
    Ok(Json(state.notes.list_notes().await?))
}

/// Get a note by id.
///
/// # Returns
/// - 200 OK with the note
/// - 404 Not Found if no note has this id
#[utoipa::path(
    get,
    path = "/api/notes/{id}",
    tag = "Notes",
    params(("id" = i64, Path, description = "Note id")),
    responses(
        (status = 200, description = "The note", body = Note),
        (status = 404, description = "Note not found"),
    )
)]
pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Note>, ApiError> {
    Ok(Json(state.notes.get_note(id).await?))
}

/// Replace a note's title and/or content.
///
/// Summary and embedding are not recomputed.
///
/// # Returns
/// - 200 OK with the updated note
/// - 400 Bad Request if the new content is blank
/// - 404 Not Found if no note has this id
#[utoipa::path(
    put,
    path = "/api/notes/{id}",
    tag = "Notes",
    params(("id" = i64, Path, description = "Note id")),
    request_body = UpdateNoteBody,
    responses(
        (status = 200, description = "Updated note", body = Note),
        (status = 400, description = "Content is blank"),
        (status = 404, description = "Note not found"),
    )
)]
pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateNoteBody>,
) -> Result<Json<Note>, ApiError> {
    Ok(Json(state.notes.update_note(id, body.into()).await?))
}

/// Delete a note permanently.
///
/// # Returns
/// - 204 No Content on success
/// - 404 Not Found if no note has this id
#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    tag = "Notes",
    params(("id" = i64, Path, description = "Note id")),
    responses(
        (status = 204, description = "Note deleted"),
        (status = 404, description = "Note not found"),
    )
)]
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.notes.delete_note(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Generate and store a summary for a note.
///
/// # Returns
/// - 200 OK with the note including its new summary
/// - 404 Not Found if no note has this id (the provider is not called)
/// - 502 Bad Gateway if the provider fails
/// - 503 Service Unavailable if summaries are not enabled
#[utoipa::path(
    post,
    path = "/api/notes/{id}/summary",
    tag = "Enrichment",
    params(("id" = i64, Path, description = "Note id")),
    responses(
        (status = 200, description = "Summarized note", body = Note),
        (status = 404, description = "Note not found"),
        (status = 502, description = "Provider failed"),
        (status = 503, description = "Summaries disabled"),
    )
)]
pub async fn summarize_note(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Note>, ApiError> {
    Ok(Json(state.notes.summarize_note(id).await?))
}

/// Body form of [`summarize_note`], kept for older clients.
#[utoipa::path(
    post,
    path = "/api/summary",
    tag = "Enrichment",
    request_body = SummaryBody,
    responses(
        (status = 200, description = "Summarized note", body = Note),
        (status = 404, description = "Note not found"),
        (status = 502, description = "Provider failed"),
        (status = 503, description = "Summaries disabled"),
    )
)]
pub async fn summarize_note_legacy(
    State(state): State<AppState>,
    Json(body): Json<SummaryBody>,
) -> Result<Json<Note>, ApiError> {
    Ok(Json(state.notes.summarize_note(body.note_id).await?))
}

/// Compute and store the embedding for a note.
///
/// # Returns
/// - 200 OK with the note
/// - 404 Not Found if no note has this id
/// - 502 Bad Gateway if the provider fails or returns the wrong dimension
/// - 503 Service Unavailable if embeddings are not enabled
#[utoipa::path(
    post,
    path = "/api/notes/{id}/embedding",
    tag = "Enrichment",
    params(("id" = i64, Path, description = "Note id")),
    responses(
        (status = 200, description = "Embedded note", body = Note),
        (status = 404, description = "Note not found"),
        (status = 502, description = "Provider failed"),
        (status = 503, description = "Embeddings disabled"),
    )
)]
pub async fn embed_note(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Note>, ApiError> {
    Ok(Json(state.notes.embed_note(id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_body_accepts_missing_or_null_content() {
        let body: CreateNoteBody = serde_json::from_str(r#"{"title":"t"}"#).unwrap();
        assert_eq!(body.title.as_deref(), Some("t"));
        assert!(body.content.is_none());

        let body: CreateNoteBody = serde_json::from_str(r#"{"content":null}"#).unwrap();
        assert!(body.content.is_none());
    }

    #[test]
    fn test_summary_body_uses_camel_case_id() {
        let body: SummaryBody = serde_json::from_str(r#"{"noteId":42}"#).unwrap();
        assert_eq!(body.note_id, 42);
    }

    #[test]
    fn test_update_body_into_request() {
        let body: UpdateNoteBody = serde_json::from_str(r#"{"content":"new"}"#).unwrap();
        let req: UpdateNoteRequest = body.into();
        assert!(req.title.is_none());
        assert_eq!(req.content.as_deref(), Some("new"));
    }
}
