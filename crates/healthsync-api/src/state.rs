//! Shared state for the chat proxy server.
//!
//! The proxy answers from exactly one responder, chosen at startup: the
//! keyword knowledge base by default, or an OpenAI-compatible upstream when
//! an API key is configured.

use std::sync::Arc;

use healthsync_core::knowledge::{KnowledgeBase, Responder};
use healthsync_infra::chat::upstream::UpstreamResponder;
use healthsync_types::error::ResponderError;
use healthsync_types::wire::{ChatCompletionRequest, ChatCompletionResponse};

/// The responder behind `/api/chat`.
pub enum ChatResponder {
    Knowledge(KnowledgeBase),
    Upstream(UpstreamResponder),
}

impl Responder for ChatResponder {
    fn name(&self) -> &str {
        match self {
            ChatResponder::Knowledge(kb) => kb.name(),
            ChatResponder::Upstream(upstream) => upstream.name(),
        }
    }

    async fn respond(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse, ResponderError> {
        match self {
            ChatResponder::Knowledge(kb) => kb.respond(request).await,
            ChatResponder::Upstream(upstream) => upstream.respond(request).await,
        }
    }
}

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub responder: Arc<ChatResponder>,
}

impl AppState {
    pub fn new(responder: ChatResponder) -> Self {
        Self {
            responder: Arc::new(responder),
        }
    }

    pub fn knowledge_base() -> Self {
        Self::new(ChatResponder::Knowledge(KnowledgeBase::new()))
    }
}
