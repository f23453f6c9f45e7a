//! Server configuration from environment variables.
//!
//! `main` calls `dotenvy::dotenv()` first, so a `.env` file works too.

use std::str::FromStr;

use jotter_core::defaults::SERVER_PORT;
use jotter_core::{Error, Result};
use jotter_db::pool::DEFAULT_MAX_CONNECTIONS;
use jotter_inference::OpenAIConfig;

use crate::services::EnrichmentConfig;

/// Default PostgreSQL URL when `DATABASE_URL` is unset.
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/jotter";

/// Where notes are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageBackend {
    #[default]
    Postgres,
    /// Process memory; nothing survives a restart.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            _ => Err(format!("Invalid storage backend: {}", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub database_url: String,
    pub db_max_connections: u32,
    pub run_migrations: bool,
    pub openai: OpenAIConfig,
    pub enrichment: EnrichmentConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from a variable lookup.
    ///
    /// Invalid values are a `Config` error naming the variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = EnrichmentConfig::default();
        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_var("PORT", lookup("PORT"))?.unwrap_or(SERVER_PORT),
            storage: parse_var("STORAGE_BACKEND", lookup("STORAGE_BACKEND"))?.unwrap_or_default(),
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", lookup("DB_MAX_CONNECTIONS"))?
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            run_migrations: parse_bool("RUN_MIGRATIONS", lookup("RUN_MIGRATIONS"))?
                .unwrap_or(true),
            openai: OpenAIConfig::from_lookup(&lookup)?,
            enrichment: EnrichmentConfig {
                on_create: parse_var("ENRICH_ON_CREATE", lookup("ENRICH_ON_CREATE"))?
                    .unwrap_or(defaults.on_create),
                summaries: parse_bool("SUMMARIES_ENABLED", lookup("SUMMARIES_ENABLED"))?
                    .unwrap_or(defaults.summaries),
                embeddings: parse_bool("EMBEDDINGS_ENABLED", lookup("EMBEDDINGS_ENABLED"))?
                    .unwrap_or(defaults.embeddings),
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether an enrichment provider should be constructed at all.
    pub fn enrichment_configured(&self) -> bool {
        self.openai.is_usable()
    }
}

fn parse_var<T: FromStr>(name: &str, value: Option<String>) -> Result<Option<T>> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} has invalid value '{}'", name, raw))),
        None => Ok(None),
    }
}

fn parse_bool(name: &str, value: Option<String>) -> Result<Option<bool>> {
    match value.as_deref().map(|v| v.trim().to_lowercase()) {
        None => Ok(None),
        Some(v) => match v.as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::Config(format!(
                "{} must be true or false, got '{}'",
                name, v
            ))),
        },
    }
}
