// rest/error.rs — API error taxonomy mapped onto HTTP status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// A failed request. Every variant renders as `{"error": <message>}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed, missing, or out-of-range input. Always the client's fault.
    #[error("{0}")]
    Validation(String),
    /// No record behind the requested id.
    #[error("{0}")]
    NotFound(&'static str),
    /// Store or connectivity failure. The cause is logged server-side; the
    /// client only sees the generic public message.
    #[error("{message}")]
    Persistence {
        message: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn persistence(message: &'static str, source: anyhow::Error) -> Self {
        Self::Persistence { message, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Persistence { message, source } => {
                error!("{message}: {source:#}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        let cases = [
            (ApiError::validation("bad input"), StatusCode::BAD_REQUEST),
            (ApiError::NotFound("Task not found"), StatusCode::NOT_FOUND),
            (
                ApiError::persistence("Failed to fetch task", anyhow::anyhow!("disk on fire")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn persistence_message_hides_the_cause() {
        let err = ApiError::persistence("Failed to update task", anyhow::anyhow!("UNIQUE violation"));
        assert_eq!(err.to_string(), "Failed to update task");
    }
}
