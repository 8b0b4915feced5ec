//! The chat client: owns the conversation and drives each submission to
//! exactly one terminal outcome.
//!
//! A submission is validated, gated on connectivity, appended to the
//! conversation and sent. Failures are classified into an [`AppError`];
//! retryable ones are retried per [`RetryPolicy`] in a bounded loop, with a
//! transient "retrying" notice in the conversation while waiting. The
//! outcome is either an assistant reply or a single `error`-status entry.
//!
//! Every mutating operation takes `&mut self`, so a second submission can
//! never overlap one that is still in flight.

use std::time::Duration;

use healthsync_types::config::ChatConfig;
use healthsync_types::error::{AppError, StorageError, TransportError};
use healthsync_types::facility::FacilitySearchRequest;
use healthsync_types::message::{Message, Preferences};
use healthsync_types::wire::{ChatCompletionRequest, WireMessage};
use tokio::sync::{mpsc, watch};

use super::connectivity::Connectivity;
use super::conversation::Conversation;
use super::facility_trigger::FacilityTrigger;
use super::retry::RetryPolicy;
use super::transport::ChatTransport;
use super::validation::{InputNotice, validate_input};
use crate::storage::kv_store::KvStore;
use crate::storage::persistence::ConversationPersistence;

/// Fixed instruction sent ahead of every conversation.
pub const SYSTEM_PROMPT: &str = "You are HealthSync AI, a compassionate virtual medical assistant. Follow these rules:
• Greet users warmly and gather initial symptoms.
• Ask one targeted follow-up question at a time (duration, severity, associated symptoms, history, medication, lifestyle).
• Offer balanced, empathetic language. Acknowledge concerns.
• NEVER provide a definitive diagnosis or prescribe medication.
• Provide general health education and possible considerations.
• Always advise seeking professional care for urgent or serious symptoms.
• Include gentle reminders that you are not a substitute for a doctor.
• Encourage healthy lifestyle habits where appropriate.
• Keep responses concise (under 120 words) yet informative and friendly.";

/// Why a submission did not produce a reply.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Input failed validation; nothing was sent or recorded.
    #[error("input rejected: {}", .0.text)]
    Rejected(InputNotice),

    /// The request failed terminally (or was refused while offline).
    #[error(transparent)]
    Failed(#[from] AppError),

    /// Manual retry found no user message to re-send.
    #[error("no user message to retry")]
    NothingToRetry,
}

impl SubmitError {
    /// The classified error, when the failure came from the endpoint.
    pub fn app_error(&self) -> Option<&AppError> {
        match self {
            SubmitError::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Payload settings taken from [`ChatConfig`].
#[derive(Debug, Clone)]
struct RequestOptions {
    model: String,
    temperature: f64,
    max_tokens: u32,
    timeout: Duration,
}

pub struct ChatClient<T: ChatTransport, S: KvStore, D: KvStore> {
    transport: T,
    persistence: ConversationPersistence<S, D>,
    conversation: Conversation,
    preferences: Preferences,
    policy: RetryPolicy,
    options: RequestOptions,
    connectivity: Option<watch::Receiver<Connectivity>>,
    facility_trigger: Option<FacilityTrigger>,
    facility_delay: Duration,
    facility_radius_m: u32,
}

impl<T: ChatTransport, S: KvStore, D: KvStore> ChatClient<T, S, D> {
    /// Create a client, restoring preferences and (if remembered) history.
    ///
    /// History left behind by an earlier session is removed when the user
    /// has not asked to remember it.
    pub async fn new(transport: T, persistence: ConversationPersistence<S, D>, config: &ChatConfig) -> Self {
        let preferences = persistence.load_preferences().await;
        let history = persistence.load_history(&preferences).await;
        if !preferences.remember_conversation {
            if let Err(e) = persistence.clear_history().await {
                tracing::warn!("failed to clear previous session history: {e}");
            }
        }
        let conversation = Conversation::restore(history);

        tracing::debug!(
            restored = conversation.len(),
            remember = preferences.remember_conversation,
            "chat client initialized"
        );

        Self {
            transport,
            persistence,
            conversation,
            preferences,
            policy: RetryPolicy::from_config(config),
            options: RequestOptions {
                model: config.model.clone(),
                temperature: config.temperature,
                max_tokens: config.max_tokens,
                timeout: config.request_timeout(),
            },
            connectivity: None,
            facility_trigger: None,
            facility_delay: config.facility_trigger_delay(),
            facility_radius_m: config.facility_radius_m,
        }
    }

    /// Gate sends on the flag published by a [`super::connectivity::ConnectivityMonitor`].
    pub fn with_connectivity(mut self, connectivity: watch::Receiver<Connectivity>) -> Self {
        self.connectivity = Some(connectivity);
        self
    }

    /// Deliver facility search requests on `sender` after relevant replies.
    pub fn with_facility_channel(mut self, sender: mpsc::Sender<FacilitySearchRequest>) -> Self {
        self.facility_trigger = Some(FacilityTrigger::new(
            sender,
            self.facility_delay,
            self.facility_radius_m,
        ));
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn is_online(&self) -> bool {
        self.connectivity
            .as_ref()
            .is_none_or(|rx| rx.borrow().is_online())
    }

    /// Validate and send a new user message.
    pub async fn submit(&mut self, input: &str) -> Result<Message, SubmitError> {
        let text = validate_input(input).map_err(SubmitError::Rejected)?.to_string();
        self.ensure_online()?;

        let history = self.conversation.wire_history();
        let user = Message::user(text);
        let request = self.build_request(history, &user);

        self.conversation.push(user);
        self.persist().await;

        self.run(request).await
    }

    /// Re-send the most recent user message after discarding error entries.
    pub async fn retry_last(&mut self) -> Result<Message, SubmitError> {
        self.ensure_online()?;

        let removed = self.conversation.remove_errors();
        let Some(user) = self.conversation.last_user().cloned() else {
            self.persist().await;
            return Err(SubmitError::NothingToRetry);
        };
        tracing::debug!(removed, "manual retry of last user message");

        let history = self.conversation.wire_history_before(user.id);
        let request = self.build_request(history, &user);
        self.persist().await;

        self.run(request).await
    }

    /// Change whether the conversation is kept in session storage.
    pub async fn set_remember_conversation(&mut self, remember: bool) -> Result<(), StorageError> {
        self.preferences.remember_conversation = remember;
        self.persistence.save_preferences(&self.preferences).await?;
        self.persistence
            .save_history(self.conversation.messages(), &self.preferences)
            .await
    }

    /// Start over with just the greeting and forget stored history.
    pub async fn clear(&mut self) -> Result<(), StorageError> {
        self.conversation = Conversation::with_greeting();
        self.persistence.clear_history().await
    }

    fn ensure_online(&self) -> Result<(), SubmitError> {
        if self.is_online() {
            return Ok(());
        }
        tracing::warn!("chat backend offline, refusing to send");
        Err(AppError::network("chat backend is offline").into())
    }

    fn build_request(&self, history: Vec<WireMessage>, user: &Message) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(WireMessage::system(SYSTEM_PROMPT));
        messages.extend(history);
        messages.push(WireMessage::user(user.text.clone()));

        ChatCompletionRequest {
            messages,
            model: self.options.model.clone(),
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
        }
    }

    /// Drive `request` to a terminal outcome.
    async fn run(&mut self, request: ChatCompletionRequest) -> Result<Message, SubmitError> {
        let mut attempt = 1;
        let outcome = loop {
            match self.attempt(&request).await {
                Ok(text) => break Ok(text),
                Err(err) if self.policy.should_retry(attempt, &err) => {
                    attempt += 1;
                    let delay = self.policy.delay_before(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        kind = %err.kind,
                        delay_ms = delay.as_millis() as u64,
                        "chat request failed, retrying"
                    );
                    self.conversation.push(Message::pending(format!(
                        "Having trouble reaching the assistant. Retrying ({attempt}/{})...",
                        self.policy.max_attempts
                    )));
                    self.persist().await;
                    tokio::time::sleep(delay).await;
                }
                Err(err) => break Err(err),
            }
        };

        self.conversation.remove_pending();

        match outcome {
            Ok(text) => {
                let reply = Message::assistant(text);
                self.conversation.push(reply.clone());
                self.persist().await;
                if let Some(trigger) = &self.facility_trigger {
                    trigger.notify_if_relevant(&reply.text);
                }
                Ok(reply)
            }
            Err(err) => {
                tracing::error!(
                    attempt,
                    kind = %err.kind,
                    status = ?err.status_code,
                    details = ?err.details,
                    "chat request failed"
                );
                self.conversation.push(Message::error(err.message.clone()));
                self.persist().await;
                Err(err.into())
            }
        }
    }

    /// One bounded call to the transport, classified.
    async fn attempt(&self, request: &ChatCompletionRequest) -> Result<String, AppError> {
        let timeout = self.options.timeout;
        match tokio::time::timeout(timeout, self.transport.send(request)).await {
            Err(_) => Err(TransportError::Timeout(timeout).into()),
            Ok(Err(e)) => Err(e.into()),
            Ok(Ok(response)) => response
                .reply_text()
                .map(str::to_string)
                .ok_or_else(|| AppError::unknown("reply contained no message content")),
        }
    }

    async fn persist(&self) {
        if let Err(e) = self
            .persistence
            .save_history(self.conversation.messages(), &self.preferences)
            .await
        {
            tracing::warn!("failed to persist conversation: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::conversation::GREETING;
    use crate::storage::kv_store::StorageTier;
    use crate::storage::persistence::{HISTORY_KEY, PREFERENCES_KEY};
    use crate::testing::{MemoryStore, ScriptedTransport};
    use healthsync_types::error::ErrorKind;
    use healthsync_types::message::{MessageRole, MessageStatus};
    use healthsync_types::wire::WireRole;
    use std::future::Future;

    struct Harness {
        transport: ScriptedTransport,
        session: MemoryStore,
        durable: MemoryStore,
    }

    impl Harness {
        fn new(transport: ScriptedTransport) -> Self {
            Self {
                transport,
                session: MemoryStore::new(StorageTier::Session),
                durable: MemoryStore::new(StorageTier::Durable),
            }
        }

        async fn client(&self) -> ChatClient<ScriptedTransport, MemoryStore, MemoryStore> {
            let persistence =
                ConversationPersistence::new(self.session.clone(), self.durable.clone(), 20);
            ChatClient::new(self.transport.clone(), persistence, &ChatConfig::default()).await
        }

        fn stored_history(&self) -> Vec<Message> {
            self.session
                .value(HISTORY_KEY)
                .map(|v| serde_json::from_value(v).unwrap())
                .unwrap_or_default()
        }
    }

    fn error_messages(client: &ChatClient<ScriptedTransport, MemoryStore, MemoryStore>) -> Vec<&Message> {
        client.messages().iter().filter(|m| m.is_error()).collect()
    }

    #[tokio::test]
    async fn test_new_client_starts_with_greeting() {
        let harness = Harness::new(ScriptedTransport::always(ScriptedTransport::reply("hi")));
        let client = harness.client().await;
        assert_eq!(client.messages().len(), 1);
        assert_eq!(client.messages()[0].text, GREETING);
        assert!(!client.preferences().remember_conversation);
    }

    #[tokio::test]
    async fn test_invalid_input_makes_no_call_and_no_change() {
        let harness = Harness::new(ScriptedTransport::always(ScriptedTransport::reply("hi")));
        let mut client = harness.client().await;
        let before = client.messages().len();

        for input in ["", " x ", &"y".repeat(1001)] {
            let err = client.submit(input).await.unwrap_err();
            assert!(matches!(err, SubmitError::Rejected(_)));
        }

        assert_eq!(harness.transport.call_count(), 0);
        assert_eq!(client.messages().len(), before);
    }

    #[tokio::test]
    async fn test_successful_submit_builds_ordered_payload() {
        let harness = Harness::new(ScriptedTransport::always(ScriptedTransport::reply(
            "  Rest and drink fluids.  ",
        )));
        let mut client = harness.client().await;

        let reply = client.submit("  I have a fever  ").await.unwrap();
        assert_eq!(reply.text, "Rest and drink fluids.");
        assert_eq!(reply.status, MessageStatus::Sent);

        let requests = harness.transport.requests();
        assert_eq!(requests.len(), 1);
        let roles: Vec<WireRole> = requests[0].messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![WireRole::System, WireRole::Assistant, WireRole::User]
        );
        assert_eq!(requests[0].messages[0].content, SYSTEM_PROMPT);
        assert_eq!(requests[0].last_content(), "I have a fever");
        assert_eq!(requests[0].model, "gpt-4o-mini");
        assert_eq!(requests[0].max_tokens, 500);

        let texts: Vec<&str> = client.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec![GREETING, "I have a fever", "Rest and drink fluids."]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_twice_then_success() {
        let transport = ScriptedTransport::new(vec![
            ScriptedTransport::status(429),
            ScriptedTransport::status(429),
            ScriptedTransport::reply("Try a warm compress."),
        ]);
        let harness = Harness::new(transport);
        let mut client = harness.client().await;

        let reply = client.submit("My head hurts").await.unwrap();
        assert_eq!(reply.text, "Try a warm compress.");

        let times = harness.transport.call_times();
        assert_eq!(times.len(), 3);
        let first_gap = times[1] - times[0];
        let second_gap = times[2] - times[1];
        assert!(first_gap >= Duration::from_millis(1000) && first_gap < Duration::from_millis(1100));
        assert!(second_gap >= Duration::from_millis(2000) && second_gap < Duration::from_millis(2100));

        assert!(error_messages(&client).is_empty());
        assert!(!client.messages().iter().any(|m| m.is_pending()));
        assert_eq!(client.messages().last().unwrap().text, "Try a warm compress.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_notices_visible_while_waiting() {
        let transport = ScriptedTransport::new(vec![
            ScriptedTransport::status(429),
            ScriptedTransport::status(503),
            ScriptedTransport::reply("Rest and hydrate."),
        ]);
        let harness = Harness::new(transport);
        harness.transport.snapshot_store(harness.session.clone(), HISTORY_KEY);
        let mut client = harness.client().await;
        client.set_remember_conversation(true).await.unwrap();

        client.submit("I feel dizzy").await.unwrap();

        let pending_at_call: Vec<Vec<Message>> = harness
            .transport
            .snapshots()
            .into_iter()
            .map(|snapshot| {
                let history: Vec<Message> = snapshot
                    .map(|v| serde_json::from_value(v).unwrap())
                    .unwrap_or_default();
                history.into_iter().filter(|m| m.is_pending()).collect()
            })
            .collect();

        assert_eq!(pending_at_call.len(), 3);
        assert!(pending_at_call[0].is_empty());
        assert_eq!(pending_at_call[1].len(), 1);
        assert_eq!(pending_at_call[1][0].role, MessageRole::Assistant);
        assert_eq!(pending_at_call[1][0].status, MessageStatus::Pending);
        assert!(pending_at_call[1][0].text.contains("Retrying (2/3)"));
        assert_eq!(pending_at_call[2].len(), 2);
        assert!(pending_at_call[2][1].text.contains("Retrying (3/3)"));

        assert!(!harness.stored_history().iter().any(|m| m.is_pending()));
        assert!(!client.messages().iter().any(|m| m.is_pending()));
    }

    #[tokio::test]
    async fn test_forbidden_is_not_retried() {
        let harness = Harness::new(ScriptedTransport::always(ScriptedTransport::status(403)));
        let mut client = harness.client().await;

        let err = client.submit("Is this serious?").await.unwrap_err();
        let app = err.app_error().unwrap();
        assert_eq!(app.kind, ErrorKind::Auth);
        assert!(!app.retryable);
        assert_eq!(app.status_code, Some(403));

        assert_eq!(harness.transport.call_count(), 1);
        let errors = error_messages(&client);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].text, ErrorKind::Auth.user_message());
        assert_eq!(errors[0].role, MessageRole::Assistant);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_append_one_error() {
        let harness = Harness::new(ScriptedTransport::always(ScriptedTransport::status(503)));
        let mut client = harness.client().await;

        let err = client.submit("Hello there").await.unwrap_err();
        assert_eq!(err.app_error().unwrap().kind, ErrorKind::ServerError);
        assert_eq!(harness.transport.call_count(), 3);
        assert_eq!(error_messages(&client).len(), 1);
        assert!(!client.messages().iter().any(|m| m.is_pending()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_reply_is_unknown_and_retried() {
        let harness = Harness::new(ScriptedTransport::new(vec![
            Ok(Default::default()),
            ScriptedTransport::reply("Recovered."),
        ]));
        let mut client = harness.client().await;

        let reply = client.submit("Hello there").await.unwrap();
        assert_eq!(reply.text, "Recovered.");
        assert_eq!(harness.transport.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connection_failure_is_network_and_retried() {
        let harness = Harness::new(ScriptedTransport::always(Err(TransportError::Connection(
            "refused".into(),
        ))));
        let mut client = harness.client().await;

        let err = client.submit("Hello there").await.unwrap_err();
        assert_eq!(err.app_error().unwrap().kind, ErrorKind::Network);
        assert_eq!(harness.transport.call_count(), 3);
    }

    struct SlowTransport;

    impl ChatTransport for SlowTransport {
        fn send(
            &self,
            _request: &ChatCompletionRequest,
        ) -> impl Future<Output = Result<healthsync_types::wire::ChatCompletionResponse, TransportError>> + Send
        {
            std::future::pending()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_network_error() {
        let persistence = ConversationPersistence::new(
            MemoryStore::new(StorageTier::Session),
            MemoryStore::new(StorageTier::Durable),
            20,
        );
        let mut client = ChatClient::new(SlowTransport, persistence, &ChatConfig::default())
            .await
            .with_retry_policy(RetryPolicy {
                max_attempts: 1,
                ..Default::default()
            });

        let started = tokio::time::Instant::now();
        let err = client.submit("Hello there").await.unwrap_err();
        let app = err.app_error().unwrap();
        assert_eq!(app.kind, ErrorKind::Network);
        assert!(app.retryable);
        assert!(started.elapsed() >= Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_manual_retry_resends_last_user_message() {
        let harness = Harness::new(ScriptedTransport::new(vec![
            ScriptedTransport::status(400),
            ScriptedTransport::reply("Here is some advice."),
        ]));
        let mut client = harness.client().await;

        let err = client.submit("I feel dizzy").await.unwrap_err();
        assert_eq!(err.app_error().unwrap().kind, ErrorKind::BadRequest);
        assert_eq!(error_messages(&client).len(), 1);

        let reply = client.retry_last().await.unwrap();
        assert_eq!(reply.text, "Here is some advice.");
        assert!(error_messages(&client).is_empty());

        let requests = harness.transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], requests[1]);

        let users: Vec<&Message> = client
            .messages()
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .collect();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].text, "I feel dizzy");
    }

    #[tokio::test]
    async fn test_manual_retry_without_user_message() {
        let harness = Harness::new(ScriptedTransport::always(ScriptedTransport::reply("hi")));
        let mut client = harness.client().await;
        assert!(matches!(
            client.retry_last().await,
            Err(SubmitError::NothingToRetry)
        ));
        assert_eq!(harness.transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_history_excludes_prior_errors() {
        let harness = Harness::new(ScriptedTransport::new(vec![
            ScriptedTransport::status(401),
            ScriptedTransport::reply("ok"),
        ]));
        let mut client = harness.client().await;

        client.submit("first question").await.unwrap_err();
        client.submit("second question").await.unwrap();

        let second = &harness.transport.requests()[1];
        assert!(second.messages.iter().all(|m| m.content != ErrorKind::Auth.user_message()));
        // system, greeting, first question, second question
        assert_eq!(second.messages.len(), 4);
    }

    #[tokio::test]
    async fn test_no_history_stored_without_preference() {
        let harness = Harness::new(ScriptedTransport::always(ScriptedTransport::reply("ok")));
        let mut client = harness.client().await;
        for i in 0..5 {
            client.submit(&format!("question {i}")).await.unwrap();
        }
        assert!(!harness.session.contains(HISTORY_KEY));
    }

    #[tokio::test]
    async fn test_stored_history_capped_and_matches_tail() {
        let harness = Harness::new(ScriptedTransport::always(ScriptedTransport::reply("ok")));
        let mut client = harness.client().await;
        client.set_remember_conversation(true).await.unwrap();

        for i in 0..15 {
            client.submit(&format!("question {i}")).await.unwrap();
            let stored = harness.stored_history();
            assert!(stored.len() <= 20);
            let tail_start = client.messages().len().saturating_sub(20);
            assert_eq!(stored, client.messages()[tail_start..].to_vec());
        }
        assert!(harness.durable.contains(PREFERENCES_KEY));
    }

    #[tokio::test]
    async fn test_remembered_history_restored_by_next_client() {
        let harness = Harness::new(ScriptedTransport::always(ScriptedTransport::reply("ok")));
        {
            let mut client = harness.client().await;
            client.set_remember_conversation(true).await.unwrap();
            client.submit("remember this").await.unwrap();
        }
        let client = harness.client().await;
        assert!(client.preferences().remember_conversation);
        assert!(client.messages().iter().any(|m| m.text == "remember this"));
    }

    #[tokio::test]
    async fn test_leftover_history_cleared_when_not_remembered() {
        let harness = Harness::new(ScriptedTransport::always(ScriptedTransport::reply("ok")));
        let stale = serde_json::to_value(vec![Message::user("from last time")]).unwrap();
        harness.session.set(HISTORY_KEY, &stale).await.unwrap();

        let client = harness.client().await;
        assert!(!client.messages().iter().any(|m| m.text == "from last time"));
        assert!(!harness.session.contains(HISTORY_KEY));
    }

    #[tokio::test]
    async fn test_turning_off_remember_clears_storage() {
        let harness = Harness::new(ScriptedTransport::always(ScriptedTransport::reply("ok")));
        let mut client = harness.client().await;
        client.set_remember_conversation(true).await.unwrap();
        client.submit("hello there").await.unwrap();
        assert!(harness.session.contains(HISTORY_KEY));

        client.set_remember_conversation(false).await.unwrap();
        assert!(!harness.session.contains(HISTORY_KEY));
    }

    #[tokio::test]
    async fn test_offline_refuses_without_attempt() {
        let harness = Harness::new(ScriptedTransport::always(ScriptedTransport::reply("ok")));
        let (_tx, rx) = watch::channel(Connectivity::Offline);
        let mut client = harness.client().await.with_connectivity(rx);
        let before = client.messages().len();

        let err = client.submit("Can you help me?").await.unwrap_err();
        let app = err.app_error().unwrap();
        assert_eq!(app.kind, ErrorKind::Network);
        assert!(app.retryable);
        assert_eq!(harness.transport.call_count(), 0);
        assert_eq!(client.messages().len(), before);

        assert!(client.retry_last().await.is_err());
        assert_eq!(harness.transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_back_online_sends_again() {
        let harness = Harness::new(ScriptedTransport::always(ScriptedTransport::reply("ok")));
        let (tx, rx) = watch::channel(Connectivity::Offline);
        let mut client = harness.client().await.with_connectivity(rx);

        assert!(client.submit("hello there").await.is_err());
        tx.send(Connectivity::Online).unwrap();
        assert!(client.submit("hello there").await.is_ok());
        assert_eq!(harness.transport.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_relevant_reply_triggers_facility_search() {
        let harness = Harness::new(ScriptedTransport::always(ScriptedTransport::reply(
            "Please visit an urgent care clinic nearby.",
        )));
        let (tx, mut rx) = mpsc::channel(4);
        let mut client = harness.client().await.with_facility_channel(tx);

        client.submit("I cut my hand badly").await.unwrap();
        let request = rx.recv().await.unwrap();
        assert_eq!(request.radius_m, 5000);
    }

    #[tokio::test]
    async fn test_missing_facility_collaborator_is_harmless() {
        let harness = Harness::new(ScriptedTransport::always(ScriptedTransport::reply(
            "See a doctor.",
        )));
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let mut client = harness.client().await.with_facility_channel(tx);
        assert!(client.submit("I have a rash").await.is_ok());
    }

    #[tokio::test]
    async fn test_clear_restores_greeting() {
        let harness = Harness::new(ScriptedTransport::always(ScriptedTransport::reply("ok")));
        let mut client = harness.client().await;
        client.set_remember_conversation(true).await.unwrap();
        client.submit("hello there").await.unwrap();

        client.clear().await.unwrap();
        assert_eq!(client.messages().len(), 1);
        assert_eq!(client.messages()[0].text, GREETING);
        assert!(!harness.session.contains(HISTORY_KEY));
    }
}
