//! # jotter-core
//!
//! Core types, traits, and abstractions for the jotter notes service.
//!
//! This crate provides the note model, the error taxonomy, and the trait
//! definitions that the storage and inference crates implement.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
pub use validation::{
    validate_content, validate_enrichment, validate_limit, validate_query_vector,
};
