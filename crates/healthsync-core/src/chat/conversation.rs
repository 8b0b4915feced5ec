//! In-memory conversation: an append-ordered list of messages with unique ids.

use healthsync_types::message::{Message, MessageRole};
use healthsync_types::wire::WireMessage;
use uuid::Uuid;

/// Greeting shown at the top of a fresh conversation.
pub const GREETING: &str = "How can I help you with your health concerns today?";

#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// A conversation containing only the greeting.
    pub fn with_greeting() -> Self {
        let mut conversation = Self::new();
        conversation.push(Message::assistant(GREETING));
        conversation
    }

    /// Rebuild from restored messages, dropping pending notices and
    /// duplicate ids. Falls back to the greeting when nothing survives.
    pub fn restore(messages: Vec<Message>) -> Self {
        let mut conversation = Self::new();
        for message in messages.into_iter().filter(|m| !m.is_pending()) {
            if !conversation.push(message) {
                tracing::debug!("dropping duplicate message id from restored history");
            }
        }
        if conversation.is_empty() {
            return Self::with_greeting();
        }
        conversation
    }

    /// Append a message. Returns false (and leaves the list unchanged) if a
    /// message with the same id is already present.
    pub fn push(&mut self, message: Message) -> bool {
        if self.contains(message.id) {
            return false;
        }
        self.messages.push(message);
        true
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.messages.iter().any(|m| m.id == id)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Payload history: every message except error entries and transient notices.
    pub fn wire_history(&self) -> Vec<WireMessage> {
        self.messages
            .iter()
            .filter(|m| !m.is_error() && !m.is_pending())
            .map(WireMessage::from)
            .collect()
    }

    /// Payload history of the messages that precede `id`.
    pub fn wire_history_before(&self, id: Uuid) -> Vec<WireMessage> {
        self.messages
            .iter()
            .take_while(|m| m.id != id)
            .filter(|m| !m.is_error() && !m.is_pending())
            .map(WireMessage::from)
            .collect()
    }

    /// Most recent user-authored message.
    pub fn last_user(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role == MessageRole::User)
    }

    /// Drop every error entry. Returns how many were removed.
    pub fn remove_errors(&mut self) -> usize {
        let before = self.messages.len();
        self.messages.retain(|m| !m.is_error());
        before - self.messages.len()
    }

    /// Drop every transient notice. Returns how many were removed.
    pub fn remove_pending(&mut self) -> usize {
        let before = self.messages.len();
        self.messages.retain(|m| !m.is_pending());
        before - self.messages.len()
    }
}
