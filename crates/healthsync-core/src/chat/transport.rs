//! ChatTransport trait definition.
//!
//! The port the chat client sends completion requests through. The HTTP
//! implementation lives in healthsync-infra; tests use scripted transports.

use healthsync_types::error::TransportError;
use healthsync_types::wire::{ChatCompletionRequest, ChatCompletionResponse};

/// Trait for chat completion endpoints (local proxy or OpenAI-compatible API).
///
/// Implementations report raw failures as [`TransportError`]; the client
/// owns classification, retry and the request timeout.
pub trait ChatTransport: Send + Sync {
    /// Send one request and return the parsed response body.
    fn send(
        &self,
        request: &ChatCompletionRequest,
    ) -> impl std::future::Future<Output = Result<ChatCompletionResponse, TransportError>> + Send;
}
