use std::future::Future;

use healthsync_types::error::ResponderError;
use healthsync_types::wire::{ChatCompletionRequest, ChatCompletionResponse};

/// Produces a reply for a chat-completions request.
///
/// Implementations are stateless with respect to the caller: every request
/// carries its full history.
pub trait Responder: Send + Sync {
    /// Short name used in logs and the startup banner.
    fn name(&self) -> &str;

    fn respond(
        &self,
        request: &ChatCompletionRequest,
    ) -> impl Future<Output = Result<ChatCompletionResponse, ResponderError>> + Send;
}
