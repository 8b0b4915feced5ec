//! Request handlers for the chat proxy.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use healthsync_core::knowledge::Responder;
use healthsync_types::wire::{
    ChatCompletionRequest, ChatCompletionResponse, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
    WireMessage, WireRole,
};

use super::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    tracing::info!("[GET /health]");
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "HealthSync API is running".to_string(),
    })
}

/// Body accepted by `POST /api/chat`.
///
/// Only `messages` being an array is enforced. Entries are read loosely: a
/// missing or unknown role counts as `user`, and a missing or non-string
/// `content` is empty.
#[derive(Debug, Deserialize)]
pub struct ProxyChatRequest {
    pub messages: Vec<serde_json::Value>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl ProxyChatRequest {
    pub fn into_completion_request(self) -> ChatCompletionRequest {
        let messages = self
            .messages
            .iter()
            .map(|entry| WireMessage {
                role: entry
                    .get("role")
                    .cloned()
                    .and_then(|role| serde_json::from_value::<WireRole>(role).ok())
                    .unwrap_or(WireRole::User),
                content: entry
                    .get("content")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            })
            .collect();

        ChatCompletionRequest {
            messages,
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        }
    }
}

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ProxyChatRequest>, JsonRejection>,
) -> Result<Json<ChatCompletionResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    let request = body.into_completion_request();

    tracing::info!(
        responder = state.responder.name(),
        user = request.last_content(),
        "[POST /api/chat]"
    );

    let response = state.responder.respond(&request).await?;
    Ok(Json(response))
}
