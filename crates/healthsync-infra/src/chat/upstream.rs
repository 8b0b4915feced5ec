//! UpstreamResponder -- forwards proxy requests to an OpenAI-compatible API.
//!
//! Used by the server instead of the knowledge base when an upstream API key
//! is configured. An upstream error status is passed through unchanged so the
//! chat client classifies it exactly as if it had called the API directly.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use healthsync_core::knowledge::Responder;
use healthsync_types::error::ResponderError;
use healthsync_types::wire::{ChatCompletionRequest, ChatCompletionResponse};

use super::error_message;

/// Does not derive Debug, so the API key cannot end up in logs.
pub struct UpstreamResponder {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl UpstreamResponder {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// `base_url` is the API root, e.g. `https://api.openai.com/v1`.
    pub fn new(base_url: impl Into<String>, api_key: SecretString) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl Responder for UpstreamResponder {
    fn name(&self) -> &str {
        "upstream"
    }

    async fn respond(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse, ResponderError> {
        tracing::info!(model = %request.model, messages = request.messages.len(), "forwarding to upstream");

        let response = self
            .client
            .post(self.url())
            .bearer_auth(self.api_key.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|e| ResponderError::Internal(format!("upstream request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ResponderError::Upstream {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| ResponderError::Internal(format!("failed to parse upstream response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthsync_types::wire::WireMessage;
    use mockito::Server;

    fn request() -> ChatCompletionRequest {
        ChatCompletionRequest {
            messages: vec![WireMessage::user("I feel tired all the time")],
            model: "gpt-4o-mini".into(),
            temperature: 0.7,
            max_tokens: 500,
        }
    }

    #[tokio::test]
    async fn test_forwards_with_bearer_key() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-upstream")
            .with_status(200)
            .with_body(r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Get some rest."}}]}"#)
            .create_async()
            .await;

        let responder =
            UpstreamResponder::new(format!("{}/v1/", server.url()), SecretString::from("sk-upstream")).unwrap();
        let response = responder.respond(&request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.reply_text(), Some("Get some rest."));
    }

    #[tokio::test]
    async fn test_upstream_status_passed_through() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
            .create_async()
            .await;

        let responder =
            UpstreamResponder::new(format!("{}/v1", server.url()), SecretString::from("bad")).unwrap();
        match responder.respond(&request()).await {
            Err(ResponderError::Upstream { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }
}
