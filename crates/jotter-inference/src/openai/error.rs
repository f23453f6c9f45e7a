//! OpenAI-specific error handling.

use jotter_core::Error;

/// OpenAI-specific error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAIErrorCode {
    /// Invalid authentication credentials.
    AuthenticationError,
    /// Rate limit exceeded.
    RateLimitExceeded,
    /// Model not found or not available.
    ModelNotFound,
    /// Request too large.
    ContextLengthExceeded,
    /// Server error.
    ServerError,
    /// Unknown error.
    Unknown,
}

impl OpenAIErrorCode {
    /// Determine error code from HTTP status and error type.
    pub fn from_response(status: u16, error_type: &str) -> Self {
        match (status, error_type) {
            (401, _) => Self::AuthenticationError,
            (429, _) => Self::RateLimitExceeded,
            (404, _) | (_, "model_not_found") => Self::ModelNotFound,
            (400, _) if error_type.contains("context_length") => Self::ContextLengthExceeded,
            (500..=599, _) => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    fn label(&self) -> Option<&'static str> {
        match self {
            Self::AuthenticationError => Some("Authentication failed"),
            Self::RateLimitExceeded => Some("Rate limit exceeded"),
            Self::ModelNotFound => Some("Model not found"),
            Self::ContextLengthExceeded => Some("Context too long"),
            Self::ServerError => Some("Server error"),
            Self::Unknown => None,
        }
    }
}

/// Which provider endpoint produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderCall {
    Embedding,
    Generation,
}

/// Convert a provider error response to a jotter Error.
///
/// Every provider-side failure is an enrichment failure, including bad
/// credentials: the request that triggered it is what failed, not the server.
pub fn to_jotter_error(call: ProviderCall, code: OpenAIErrorCode, message: &str) -> Error {
    let message = match code.label() {
        Some(label) => format!("{}: {}", label, message),
        None => message.to_string(),
    };
    match call {
        ProviderCall::Embedding => Error::Embedding(message),
        ProviderCall::Generation => Error::Inference(message),
    }
}
