//! jotter-api library
//!
//! Router, handlers and services for the jotter HTTP server. The binary in
//! `main.rs` wires configuration, storage and the enrichment provider into
//! [`routes::router`]; integration tests build the same router directly.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod state;

pub use config::{ServerConfig, StorageBackend};
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
