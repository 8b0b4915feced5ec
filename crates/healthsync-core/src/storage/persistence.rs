//! Conversation and preference persistence over two [`KvStore`] tiers.
//!
//! History goes to the session tier, and only while the user has asked to
//! remember the conversation; otherwise the history key is kept absent.
//! Preferences go to the durable tier. Unavailable stores are skipped.

use healthsync_types::error::StorageError;
use healthsync_types::message::{Message, Preferences};

use super::kv_store::KvStore;

/// Session-tier key holding the most recent messages.
pub const HISTORY_KEY: &str = "healthsync_ai_chat_history";

/// Durable-tier key holding the [`Preferences`] object.
pub const PREFERENCES_KEY: &str = "healthsync_chat_preferences";

/// Default number of messages kept in session storage.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Reads and writes chat state through a session store `S` and a durable store `D`.
pub struct ConversationPersistence<S: KvStore, D: KvStore> {
    session: S,
    durable: D,
    history_limit: usize,
}

impl<S: KvStore, D: KvStore> ConversationPersistence<S, D> {
    pub fn new(session: S, durable: D, history_limit: usize) -> Self {
        Self {
            session,
            durable,
            history_limit,
        }
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    pub fn session_store(&self) -> &S {
        &self.session
    }

    pub fn durable_store(&self) -> &D {
        &self.durable
    }

    /// Load preferences, falling back to defaults when missing, malformed or
    /// when the durable store is unavailable.
    pub async fn load_preferences(&self) -> Preferences {
        if !self.durable.is_available() {
            tracing::debug!(tier = %self.durable.tier(), "preference store unavailable, using defaults");
            return Preferences::default();
        }

        match self.durable.get(PREFERENCES_KEY).await {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::warn!("ignoring malformed preferences: {e}");
                Preferences::default()
            }),
            Ok(None) => Preferences::default(),
            Err(e) => {
                tracing::warn!("failed to read preferences: {e}");
                Preferences::default()
            }
        }
    }

    pub async fn save_preferences(&self, preferences: &Preferences) -> Result<(), StorageError> {
        if !self.durable.is_available() {
            return Ok(());
        }
        let value = serde_json::to_value(preferences)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.durable.set(PREFERENCES_KEY, &value).await
    }

    /// Load stored history if the user asked to remember it.
    ///
    /// Malformed entries discard the whole stored history.
    pub async fn load_history(&self, preferences: &Preferences) -> Vec<Message> {
        if !preferences.remember_conversation || !self.session.is_available() {
            return Vec::new();
        }

        match self.session.get(HISTORY_KEY).await {
            Ok(Some(value)) => serde_json::from_value::<Vec<Message>>(value).unwrap_or_else(|e| {
                tracing::warn!("ignoring malformed chat history: {e}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("failed to read chat history: {e}");
                Vec::new()
            }
        }
    }

    /// Store the tail of `messages`, or remove stored history when the
    /// user has not asked to remember it.
    pub async fn save_history(
        &self,
        messages: &[Message],
        preferences: &Preferences,
    ) -> Result<(), StorageError> {
        if !self.session.is_available() {
            return Ok(());
        }
        if !preferences.remember_conversation {
            return self.session.remove(HISTORY_KEY).await;
        }

        let start = messages.len().saturating_sub(self.history_limit);
        let value = serde_json::to_value(&messages[start..])
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.session.set(HISTORY_KEY, &value).await
    }

    pub async fn clear_history(&self) -> Result<(), StorageError> {
        if !self.session.is_available() {
            return Ok(());
        }
        self.session.remove(HISTORY_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv_store::StorageTier;
    use crate::testing::MemoryStore;

    fn persistence() -> ConversationPersistence<MemoryStore, MemoryStore> {
        ConversationPersistence::new(
            MemoryStore::new(StorageTier::Session),
            MemoryStore::new(StorageTier::Durable),
            DEFAULT_HISTORY_LIMIT,
        )
    }

    fn remember() -> Preferences {
        Preferences {
            remember_conversation: true,
        }
    }

    #[tokio::test]
    async fn test_preferences_default_when_missing() {
        let p = persistence();
        assert_eq!(p.load_preferences().await, Preferences::default());
    }

    #[tokio::test]
    async fn test_preferences_round_trip_in_durable_tier() {
        let p = persistence();
        p.save_preferences(&remember()).await.unwrap();
        assert_eq!(p.load_preferences().await, remember());
        assert!(p.durable_store().contains(PREFERENCES_KEY));
        assert!(!p.session_store().contains(PREFERENCES_KEY));
    }

    #[tokio::test]
    async fn test_malformed_preferences_fall_back_to_default() {
        let p = persistence();
        p.durable_store()
            .set(PREFERENCES_KEY, &serde_json::json!("not an object"))
            .await
            .unwrap();
        assert_eq!(p.load_preferences().await, Preferences::default());
    }

    #[tokio::test]
    async fn test_history_not_stored_without_preference() {
        let p = persistence();
        let messages = vec![Message::user("hello there")];
        p.save_history(&messages, &Preferences::default()).await.unwrap();
        assert!(!p.session_store().contains(HISTORY_KEY));
        assert!(p.load_history(&Preferences::default()).await.is_empty());
    }

    #[tokio::test]
    async fn test_history_truncated_to_limit() {
        let p = persistence();
        let messages: Vec<Message> = (0..25).map(|i| Message::user(format!("m{i}"))).collect();
        p.save_history(&messages, &remember()).await.unwrap();

        let loaded = p.load_history(&remember()).await;
        assert_eq!(loaded.len(), 20);
        assert_eq!(loaded.first().unwrap().text, "m5");
        assert_eq!(loaded, messages[5..].to_vec());
    }

    #[tokio::test]
    async fn test_turning_off_removes_stored_history() {
        let p = persistence();
        let messages = vec![Message::user("remember me")];
        p.save_history(&messages, &remember()).await.unwrap();
        assert!(p.session_store().contains(HISTORY_KEY));

        p.save_history(&messages, &Preferences::default()).await.unwrap();
        assert!(!p.session_store().contains(HISTORY_KEY));
    }

    #[tokio::test]
    async fn test_unavailable_stores_are_skipped() {
        let p = ConversationPersistence::new(
            MemoryStore::unavailable(StorageTier::Session),
            MemoryStore::unavailable(StorageTier::Durable),
            DEFAULT_HISTORY_LIMIT,
        );
        p.save_preferences(&remember()).await.unwrap();
        p.save_history(&[Message::user("hi there")], &remember())
            .await
            .unwrap();
        assert_eq!(p.load_preferences().await, Preferences::default());
        assert!(p.load_history(&remember()).await.is_empty());
    }
}
