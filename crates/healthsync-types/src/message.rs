//! Chat message and preference types.
//!
//! A [`Message`] is one entry in the conversation shown to the user. Its
//! status only ever moves forward: `pending` to `sent` or `error`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Who authored a conversation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// Delivery status of a conversation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sent,
    Pending,
    Error,
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageStatus::Sent => write!(f, "sent"),
            MessageStatus::Pending => write!(f, "pending"),
            MessageStatus::Error => write!(f, "error"),
        }
    }
}

impl FromStr for MessageStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sent" => Ok(MessageStatus::Sent),
            "pending" => Ok(MessageStatus::Pending),
            "error" => Ok(MessageStatus::Error),
            other => Err(format!("invalid message status: '{other}'")),
        }
    }
}

/// A single entry in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: MessageRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub status: MessageStatus,
}

impl Message {
    /// Create a message stamped with a fresh time-sortable id and the current time.
    pub fn new(role: MessageRole, text: impl Into<String>, status: MessageStatus) -> Self {
        Self {
            id: Uuid::now_v7(),
            role,
            text: text.into(),
            timestamp: Utc::now(),
            status,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text, MessageStatus::Sent)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, text, MessageStatus::Sent)
    }

    /// An assistant-side entry describing a failed submission.
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, text, MessageStatus::Error)
    }

    /// A transient assistant-side notice (e.g. "retrying").
    pub fn pending(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, text, MessageStatus::Pending)
    }

    pub fn is_error(&self) -> bool {
        self.status == MessageStatus::Error
    }

    pub fn is_pending(&self) -> bool {
        self.status == MessageStatus::Pending
    }
}

/// User preferences that outlive a single session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Keep the conversation in session storage between page loads.
    #[serde(default)]
    pub remember_conversation: bool,
}
