//! # Ingress API Error Types
//!
//! Error types for the webhook ingress HTTP surface and their status-code
//! conversions. Response bodies are stable for sender interoperability:
//! upstream providers key their retry behavior off these exact codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors that affect the HTTP response of the ingress endpoints.
///
/// Handler failures are deliberately absent: by the time a handler runs, the
/// sender already has its `200`, so those failures are contained at the
/// dispatch boundary and only surface in logs.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or incorrect `X-Webhook-Secret` header.
    #[error("Invalid webhook secret")]
    Unauthorized,

    /// No handler registered for the requested source.
    ///
    /// The field holds the source path segment, not an underlying error, so
    /// it deliberately avoids the name `source` that thiserror reserves.
    #[error("Unknown webhook source: {source_name}")]
    UnknownSource { source_name: String },

    /// Request body did not parse as JSON.
    #[error("Invalid JSON payload for source: {source_name}")]
    InvalidJson { source_name: String },
}

impl ApiError {
    /// Create an UnknownSource error for the given path segment.
    pub fn unknown_source(source_name: impl Into<String>) -> Self {
        Self::UnknownSource {
            source_name: source_name.into(),
        }
    }

    /// Create an InvalidJson error for the given path segment.
    pub fn invalid_json(source_name: impl Into<String>) -> Self {
        Self::InvalidJson {
            source_name: source_name.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({"error": "unauthorized"}),
            ),
            ApiError::UnknownSource { .. } => (
                StatusCode::NOT_FOUND,
                json!({"error": "unknown source"}),
            ),
            ApiError::InvalidJson { .. } => (
                StatusCode::BAD_REQUEST,
                json!({"error": "invalid JSON"}),
            ),
        };

        (status, Json(body)).into_response()
    }
}
