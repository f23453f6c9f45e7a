//! Centralized default constants for jotter.
//!
//! Crates reference these instead of defining their own magic numbers.

// =============================================================================
// EMBEDDING
// =============================================================================

/// Default embedding model name (OpenAI).
pub const EMBED_MODEL: &str = "text-embedding-3-small";

/// Default embedding vector dimension for text-embedding-3-small.
pub const EMBED_DIMENSION: usize = 1536;

// =============================================================================
// GENERATION
// =============================================================================

/// Default generation model used for summaries.
pub const GEN_MODEL: &str = "gpt-4o-mini";

/// System instruction sent with every summary request.
pub const SUMMARY_INSTRUCTION: &str =
    "You summarize notes. Reply with a brief summary of the user's note, one or two sentences, no preamble.";

// =============================================================================
// SEARCH
// =============================================================================

/// Default number of results for semantic search.
pub const SEMANTIC_SEARCH_LIMIT: i64 = 5;

/// Upper bound on a caller-supplied semantic search limit.
pub const SEMANTIC_SEARCH_MAX_LIMIT: i64 = 50;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP port.
pub const SERVER_PORT: u16 = 10000;

/// Maximum accepted request body size in bytes.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_limits_are_consistent() {
        assert!(SEMANTIC_SEARCH_LIMIT >= 1);
        assert!(SEMANTIC_SEARCH_LIMIT <= SEMANTIC_SEARCH_MAX_LIMIT);
    }

    #[test]
    fn test_embed_dimension_matches_default_model() {
        assert_eq!(EMBED_MODEL, "text-embedding-3-small");
        assert_eq!(EMBED_DIMENSION, 1536);
    }
}
