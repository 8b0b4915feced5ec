//! HTTP implementations of the chat ports.
//!
//! - [`transport::HttpChatTransport`]: `ChatTransport` over reqwest
//! - [`probe::HttpHealthProbe`]: `HealthProbe` hitting `GET /health`
//! - [`upstream::UpstreamResponder`]: `Responder` forwarding to an
//!   OpenAI-compatible chat-completions API

pub mod probe;
pub mod transport;
pub mod upstream;

use healthsync_types::wire::ErrorEnvelope;

/// Pull the human-readable message out of an error body.
///
/// Uses `error.message` when the body is a JSON error envelope, otherwise
/// the raw body (or a placeholder when empty).
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.error.message;
    }
    let body = body.trim();
    if body.is_empty() {
        "empty response body".to_string()
    } else {
        body.to_string()
    }
}
