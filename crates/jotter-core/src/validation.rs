//! Input validation shared by every repository and the service layer.

use crate::error::{Error, Result};
use crate::models::{NoteEnrichment, Vector};

/// Reject empty or whitespace-only note content.
pub fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(Error::InvalidInput("Content is required".to_string()));
    }
    Ok(())
}

/// Reject non-positive result limits.
pub fn validate_limit(limit: i64) -> Result<()> {
    if limit < 1 {
        return Err(Error::InvalidInput("limit must be >= 1".to_string()));
    }
    Ok(())
}

/// Reject an empty query vector.
pub fn validate_query_vector(vector: &Vector) -> Result<()> {
    if vector.as_slice().is_empty() {
        return Err(Error::InvalidInput(
            "query embedding must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Reject an enrichment that carries neither a summary nor an embedding.
pub fn validate_enrichment(enrichment: &NoteEnrichment) -> Result<()> {
    if enrichment.is_empty() {
        return Err(Error::InvalidInput(
            "enrichment must include a summary or an embedding".to_string(),
        ));
    }
    Ok(())
}

/// Error for a stored embedding whose dimensionality disagrees with the query.
pub fn dimension_mismatch(expected: usize, found: usize) -> Error {
    Error::InvalidInput(format!(
        "embedding dimension mismatch: query has {} dimensions, stored embedding has {}",
        expected, found
    ))
}
