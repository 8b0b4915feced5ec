//! HttpChatTransport -- concrete [`ChatTransport`] over reqwest.
//!
//! Posts the chat-completions payload to a single endpoint (the local proxy
//! by default, or an OpenAI-compatible API when a key is configured) and
//! reports the raw outcome. Classification into user-facing errors happens
//! in the chat client, not here.
//!
//! The optional API key is wrapped in [`secrecy::SecretString`] and is only
//! exposed when building the `Authorization` header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use healthsync_core::chat::transport::ChatTransport;
use healthsync_types::error::TransportError;
use healthsync_types::wire::{ChatCompletionRequest, ChatCompletionResponse};

use super::error_message;

/// Does not derive Debug, so the API key cannot end up in logs.
pub struct HttpChatTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<SecretString>,
    timeout: Duration,
}

impl HttpChatTransport {
    /// Create a transport posting to `endpoint`, with a client-side timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: None,
            timeout,
        })
    }

    /// Send `Authorization: Bearer <key>` with every request.
    pub fn with_api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ChatTransport for HttpChatTransport {
    async fn send(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse, TransportError> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        tracing::debug!(
            endpoint = %self.endpoint,
            messages = request.messages.len(),
            "sending chat request"
        );

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(self.timeout)
            } else {
                TransportError::Connection(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| TransportError::MalformedResponse(e.to_string()))
    }
}
