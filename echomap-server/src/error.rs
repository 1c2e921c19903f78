//! Error types for the EchoMap HTTP boundary.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response}
};
use echomap_core::NoteStoreError;
use serde::Serialize;
use thiserror::Error;

/// Result type alias for the server.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors that can occur while serving note requests.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request body parsed but failed note validation.
    #[error("Invalid note: {0}")]
    Validation(String),

    /// The request body is not a JSON note object.
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// The note collection could not be read or appended to.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Server startup error.
    #[error("Server error: {0}")]
    Server(String)
}

/// Error response body for HTTP endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: String
}

impl ApiError {
    /// Label used for the rejection counter.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::MalformedBody(_) => "malformed_body",
            Self::Storage(_) => "storage",
            Self::Configuration(_) => "configuration",
            Self::Server(_) => "server"
        }
    }
}

impl From<NoteStoreError> for ApiError {
    fn from(err: NoteStoreError) -> Self {
        match err {
            NoteStoreError::Validation(_) => Self::Validation(err.to_string()),
            NoteStoreError::Storage { reason } => Self::Storage(reason)
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            Self::MalformedBody(msg) => {
                (StatusCode::BAD_REQUEST, "MALFORMED_BODY", msg.clone())
            }
            Self::Storage(reason) => {
                tracing::error!(reason = %reason, "Note storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "Error creating or reading notes".to_string()
                )
            }
            Self::Configuration(msg) | Self::Server(msg) => {
                tracing::error!(message = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string()
                )
            }
        };

        let body = ErrorResponse {
            message,
            code: code.to_string()
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use echomap_core::{InMemoryNoteStore, NewNote, NoteStore};

    async fn validation_error(note: NewNote) -> NoteStoreError {
        InMemoryNoteStore::new().create(note).await.unwrap_err()
    }

    #[tokio::test]
    async fn test_validation_maps_to_bad_request() {
        let err: ApiError = validation_error(NewNote::new(200.0, 0.0, "x")).await.into();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_maps_to_internal_error() {
        let err: ApiError = NoteStoreError::storage("backing medium unavailable").into();
        assert_eq!(err.kind(), "storage");
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::MalformedBody("expected value".to_string());
        assert_eq!(err.to_string(), "Malformed request body: expected value");
    }

    #[test]
    fn test_error_response_serialization() {
        let resp = ErrorResponse {
            message: "Error creating note".to_string(),
            code: "STORAGE_ERROR".to_string()
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["message"], "Error creating note");
        assert_eq!(json["code"], "STORAGE_ERROR");
    }
}
