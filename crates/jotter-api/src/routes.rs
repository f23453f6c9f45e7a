//! Router assembly: routes, OpenAPI document, and tower middleware.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use crate::handlers::{self, health, notes, search};
use crate::AppState;
use jotter_core::defaults::MAX_BODY_BYTES;

/// Request ID generator using UUIDv7 (time-ordered).
///
/// IDs sort chronologically, which keeps log correlation simple.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Jotter API",
        description = "Notes with optional AI summaries and semantic search"
    ),
    paths(
        health::health_check,
        notes::create_note,
        notes::list_notes,
        notes::get_note,
        notes::update_note,
        notes::delete_note,
        notes::summarize_note,
        notes::summarize_note_legacy,
        notes::embed_note,
        search::search_text,
        search::search_semantic,
        search::search_semantic_legacy,
    ),
    components(schemas(
        jotter_core::Note,
        jotter_core::EnrichmentMode,
        crate::services::CreatedNote,
        notes::CreateNoteBody,
        notes::UpdateNoteBody,
        notes::SummaryBody,
        search::SemanticSearchBody,
        health::HealthResponse,
        health::EnrichmentHealth,
    )),
    tags(
        (name = "Notes", description = "Note CRUD operations"),
        (name = "Enrichment", description = "Summaries and embeddings"),
        (name = "Search", description = "Text and semantic search"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;

/// Build the application router.
///
/// Swagger UI is served at `/docs`, the JSON document at
/// `/api-docs/openapi.json`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Notes CRUD
        .route(
            "/api/notes",
            get(handlers::list_notes).post(handlers::create_note),
        )
        .route(
            "/api/notes/:id",
            get(handlers::get_note)
                .put(handlers::update_note)
                .delete(handlers::delete_note),
        )
        // Enrichment
        .route("/api/notes/:id/summary", post(handlers::summarize_note))
        .route("/api/notes/:id/embedding", post(handlers::embed_note))
        .route("/api/summary", post(handlers::summarize_note_legacy))
        // Search
        .route("/api/search", get(handlers::search_text))
        .route("/api/search/semantic", post(handlers::search_semantic))
        .route("/api/notes/search", post(handlers::search_semantic_legacy))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::services::{EnrichmentConfig, NoteService};
    use jotter_db::MemoryNoteRepository;

    fn app() -> Router {
        let notes = NoteService::new(
            Arc::new(MemoryNoteRepository::new()),
            None,
            EnrichmentConfig::default(),
        );
        router(AppState::new(notes))
    }

    async fn send(app: Router, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_null_content_is_json_bad_request() {
        let (status, body) = send(
            app(),
            Method::POST,
            "/api/notes",
            json!({"title": "t", "content": null}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Content is required");
    }

    #[tokio::test]
    async fn test_notes_search_alias_reaches_semantic_search() {
        // Routed to semantic search, not parsed as a note id.
        let (status, body) = send(
            app(),
            Method::POST,
            "/api/notes/search",
            json!({"query": "dairy"}),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].is_string());

        let (status, body) =
            send(app(), Method::POST, "/api/notes/search", json!({"query": "  "})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[test]
    fn test_create_response_schema_is_created_note() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let schema = &doc["paths"]["/api/notes"]["post"]["responses"]["201"]["content"]
            ["application/json"]["schema"]["$ref"];
        assert_eq!(schema, "#/components/schemas/CreatedNote");
        assert!(doc["components"]["schemas"]["CreatedNote"].is_object());
    }

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/health",
            "/api/notes",
            "/api/notes/{id}",
            "/api/notes/{id}/summary",
            "/api/notes/{id}/embedding",
            "/api/summary",
            "/api/search",
            "/api/search/semantic",
            "/api/notes/search",
        ] {
            assert!(paths.contains(&expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_request_ids_are_uuid_v7() {
        let request = axum::http::Request::new(());
        let id = MakeRequestUuidV7.make_request_id(&request).unwrap();
        let parsed = Uuid::parse_str(id.header_value().to_str().unwrap()).unwrap();
        assert_eq!(parsed.get_version_num(), 7);
    }
}
