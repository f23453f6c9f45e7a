//! Mapping from `jotter_core::Error` to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    /// The enrichment provider failed.
    BadGateway(String),
    /// Enrichment was requested but is not available.
    ServiceUnavailable(String),
    Internal(jotter_core::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<jotter_core::Error> for ApiError {
    fn from(err: jotter_core::Error) -> Self {
        use jotter_core::Error;
        match err {
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::NoteNotFound(id) => ApiError::NotFound(format!("Note {} not found", id)),
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::EnrichmentDisabled(msg) => {
                ApiError::ServiceUnavailable(format!("Enrichment unavailable: {}", msg))
            }
            e if e.is_enrichment() => ApiError::BadGateway(e.to_string()),
            e => ApiError::Internal(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::BadGateway(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
            ApiError::Internal(err) => {
                error!(subsystem = "api", error = %err, "Internal error");
                // Storage details stay in the log.
                "Internal server error".to_string()
            }
        };

        if status == StatusCode::BAD_GATEWAY || status == StatusCode::SERVICE_UNAVAILABLE {
            warn!(subsystem = "api", status = status.as_u16(), error = %message, "Enrichment request failed");
        }

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jotter_core::Error;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Error::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (Error::NoteNotFound(1), StatusCode::NOT_FOUND),
            (Error::NotFound("x".into()), StatusCode::NOT_FOUND),
            (Error::Inference("x".into()), StatusCode::BAD_GATEWAY),
            (Error::Embedding("x".into()), StatusCode::BAD_GATEWAY),
            (Error::Request("x".into()), StatusCode::BAD_GATEWAY),
            (
                Error::EnrichmentDisabled("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (Error::Config("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (Error::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status(), expected, "{:?}", api);
        }
    }

    #[test]
    fn test_not_found_message_names_note() {
        let api: ApiError = Error::NoteNotFound(999).into();
        assert!(matches!(api, ApiError::NotFound(ref m) if m == "Note 999 not found"));
    }

    #[test]
    fn test_internal_error_body_is_generic() {
        let response = ApiError::from(Error::Internal("pool exhausted".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
