//! Proxy error type mapping to HTTP status codes and the
//! `{"error": {"message": ...}}` envelope.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use healthsync_types::error::ResponderError;
use healthsync_types::wire::ErrorEnvelope;

pub const INVALID_REQUEST_MESSAGE: &str = "Invalid request: messages array is required.";
pub const INTERNAL_ERROR_MESSAGE: &str = "An error occurred while processing your request.";

#[derive(Debug)]
pub enum ApiError {
    /// Body missing, unparsable, or without a `messages` array.
    InvalidRequest(String),
    /// Upstream model API failure, status passed through.
    Upstream { status: u16, message: String },
    /// Anything else.
    Internal(String),
}

impl From<ResponderError> for ApiError {
    fn from(e: ResponderError) -> Self {
        match e {
            ResponderError::Upstream { status, message } => ApiError::Upstream { status, message },
            ResponderError::Internal(message) => ApiError::Internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidRequest(detail) => {
                tracing::debug!("rejected chat request: {detail}");
                (StatusCode::BAD_REQUEST, INVALID_REQUEST_MESSAGE.to_string())
            }
            ApiError::Upstream { status, message } => {
                tracing::warn!(status, "upstream error: {message}");
                let status = StatusCode::from_u16(status)
                    .ok()
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                (status, message)
            }
            ApiError::Internal(detail) => {
                tracing::error!("chat error: {detail}");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE.to_string())
            }
        };

        (status, Json(ErrorEnvelope::new(message))).into_response()
    }
}
