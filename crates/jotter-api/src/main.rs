//! jotter-api - HTTP API server for jotter

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jotter_api::services::NoteService;
use jotter_api::{router, AppState, ServerConfig, StorageBackend};
use jotter_core::NoteRepository;
use jotter_db::{Database, MemoryNoteRepository, PoolConfig};
use jotter_inference::{EnrichmentService, OpenAIBackend};

/// Initialize tracing with configurable output.
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional, daily rotation)
///   LOG_ANSI    - "true"/"false" override ANSI colors
///   RUST_LOG    - env filter (default: "jotter_api=debug,tower_http=debug")
///
/// The returned guard must live as long as the process when logging to a file.
fn init_tracing() -> Option<WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let json = log_format == "json";
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "jotter_api=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = match log_file.as_deref() {
        Some(path) => {
            let path = std::path::Path::new(path);
            let dir = path.parent().unwrap_or(std::path::Path::new("."));
            let file_name = path
                .file_name()
                .and_then(|f| f.to_str())
                .unwrap_or("jotter-api.log");
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, file_name));

            if json {
                registry
                    .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
                    .init();
            } else {
                // No ANSI in files unless asked for.
                let layer = tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(log_ansi.unwrap_or(false));
                registry.with(layer).init();
            }
            Some(guard)
        }
        None => {
            if json {
                registry
                    .with(tracing_subscriber::fmt::layer().json())
                    .init();
            } else {
                let mut layer = tracing_subscriber::fmt::layer();
                if let Some(ansi) = log_ansi {
                    layer = layer.with_ansi(ansi);
                }
                registry.with(layer).init();
            }
            None
        }
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );
    guard
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = init_tracing();

    let config = ServerConfig::from_env().context("invalid configuration")?;

    // Storage
    let mut database = None;
    let repo: Arc<dyn NoteRepository> = match config.storage {
        StorageBackend::Memory => {
            warn!("Using in-memory storage; notes are lost on restart");
            Arc::new(MemoryNoteRepository::new())
        }
        StorageBackend::Postgres => {
            let pool_config = PoolConfig::new().max_connections(config.db_max_connections);
            let db = Database::connect_with_config(&config.database_url, pool_config)
                .await
                .context("failed to connect to database")?;
            if config.run_migrations {
                db.migrate().await.context("failed to run migrations")?;
                info!("Database migrations applied");
            }
            let repo: Arc<dyn NoteRepository> = Arc::new(db.notes.clone());
            database = Some(db);
            repo
        }
    };

    // Enrichment provider
    let enrichment = if config.enrichment_configured() {
        let backend = OpenAIBackend::new(config.openai.clone())?;
        Some(EnrichmentService::new(Arc::new(backend)))
    } else {
        info!("No OPENAI_API_KEY or OPENAI_BASE_URL set, enrichment disabled");
        None
    };

    info!(
        storage = repo.backend_name(),
        enrich_on_create = %config.enrichment.on_create,
        summaries = config.enrichment.summaries,
        embeddings = config.enrichment.embeddings,
        provider = enrichment.is_some(),
        "Services configured"
    );

    let notes = NoteService::new(repo, enrichment, config.enrichment);
    let app = router(AppState::new(notes));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Starting server on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db) = database {
        db.pool().close().await;
    }
    info!("Server stopped");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
