//! Text and semantic search handlers.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use crate::{ApiError, AppState};
use jotter_core::Note;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Case-insensitive substring matched against title and content.
    pub q: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SemanticSearchBody {
    /// Text to embed. A missing or blank query returns an empty list.
    pub query: Option<String>,
    /// Maximum results, default 5, capped at 50.
    pub limit: Option<i64>,
}

/// Substring search over title and content.
///
/// A missing or blank `q` returns an empty list.
#[utoipa::path(
    get,
    path = "/api/search",
    tag = "Search",
    params(SearchQuery),
    responses((status = 200, description = "Matching notes, newest first", body = [Note]))
)]
pub async fn search_text(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let q = query.q.unwrap_or_default();
    let notes = state.notes.search_text(&q).await?;
    debug!(
        subsystem = "api",
        op = "search_text",
        result_count = notes.len(),
        "Text search complete"
    );
    Ok(Json(notes))
}

/// Rank embedded notes by distance to the embedded query.
///
/// # Returns
/// - 200 OK with notes nearest first
/// - 400 Bad Request if `limit` is below 1 or dimensions disagree
/// - 502 Bad Gateway if embedding the query fails
/// - 503 Service Unavailable if embeddings are not enabled
#[utoipa::path(
    post,
    path = "/api/search/semantic",
    tag = "Search",
    request_body = SemanticSearchBody,
    responses(
        (status = 200, description = "Nearest notes", body = [Note]),
        (status = 400, description = "Invalid limit"),
        (status = 502, description = "Provider failed"),
        (status = 503, description = "Embeddings disabled"),
    )
)]
pub async fn search_semantic(
    State(state): State<AppState>,
    Json(body): Json<SemanticSearchBody>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let query = body.query.unwrap_or_default();
    let notes = state.notes.search_semantic(&query, body.limit).await?;
    debug!(
        subsystem = "api",
        op = "search_semantic",
        result_count = notes.len(),
        "Semantic search complete"
    );
    Ok(Json(notes))
}

/// Same as [`search_semantic`], at the path older clients post to.
#[utoipa::path(
    post,
    path = "/api/notes/search",
    tag = "Search",
    request_body = SemanticSearchBody,
    responses(
        (status = 200, description = "Nearest notes", body = [Note]),
        (status = 400, description = "Invalid limit"),
        (status = 502, description = "Provider failed"),
        (status = 503, description = "Embeddings disabled"),
    )
)]
pub async fn search_semantic_legacy(
    state: State<AppState>,
    body: Json<SemanticSearchBody>,
) -> Result<Json<Vec<Note>>, ApiError> {
    search_semantic(state, body).await
}
