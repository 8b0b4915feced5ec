//! Key-value store trait.
//!
//! Defines the interface for tiered key-value persistence. The chat client
//! keeps its conversation in a `Session` tier store (gone when the session
//! ends) and its preferences in a `Durable` tier store (kept across
//! sessions). Implementations live in healthsync-infra.

use std::fmt;

use healthsync_types::error::StorageError;

/// Lifetime of the values held by a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageTier {
    /// Cleared when the session ends.
    Session,
    /// Survives across sessions.
    Durable,
}

impl fmt::Display for StorageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageTier::Session => write!(f, "session"),
            StorageTier::Durable => write!(f, "durable"),
        }
    }
}

/// Trait for JSON key-value persistence with a capability probe.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Callers check [`KvStore::is_available`] before relying on a store;
/// an unavailable store is skipped rather than treated as an error.
pub trait KvStore: Send + Sync {
    /// Which lifetime tier this store provides.
    fn tier(&self) -> StorageTier;

    /// Whether the store can currently be used.
    fn is_available(&self) -> bool;

    /// Get a value by key. Returns None if the key does not exist.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<serde_json::Value>, StorageError>> + Send;

    /// Set a value for a key (upsert).
    fn set(
        &self,
        key: &str,
        value: &serde_json::Value,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;

    /// Delete a key. No-op if the key does not exist.
    fn remove(&self, key: &str) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;
}
