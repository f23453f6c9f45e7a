//! Liveness endpoint.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::AppState;
use jotter_core::EnrichmentMode;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Storage backend name, `postgres` or `memory`.
    pub storage: String,
    pub enrichment: EnrichmentHealth,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrichmentHealth {
    pub mode: EnrichmentMode,
    pub summaries: bool,
    pub embeddings: bool,
    /// `ok`, `unreachable`, or `disabled` when no provider is configured.
    pub provider: String,
}

/// Report service status and enrichment configuration.
///
/// Always 200; an unreachable provider degrades enrichment but not CRUD.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let config = *state.notes.config();

    let provider = match state.notes.enrichment() {
        None => "disabled",
        Some(svc) => match svc.health_check().await {
            Ok(true) => "ok",
            Ok(false) => "unreachable",
            Err(e) => {
                warn!(subsystem = "api", component = "health", error = %e, "Provider health check failed");
                "unreachable"
            }
        },
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: state.notes.storage_backend().to_string(),
        enrichment: EnrichmentHealth {
            mode: config.on_create,
            summaries: config.summaries,
            embeddings: config.embeddings,
            provider: provider.to_string(),
        },
    })
}
