//! Session-tier stores.
//!
//! [`MemorySessionStore`] keeps values in a `DashMap` for the life of the
//! process; clones share the same map. [`SessionStore`] is what the terminal
//! chat uses: a JSON file in the data directory, or the in-memory map when
//! that directory cannot be used.

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;

use healthsync_core::storage::kv_store::{KvStore, StorageTier};
use healthsync_types::error::StorageError;

use super::file::JsonFileStore;

#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    values: Arc<DashMap<String, serde_json::Value>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KvStore for MemorySessionStore {
    fn tier(&self) -> StorageTier {
        StorageTier::Session
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        Ok(self.values.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: &serde_json::Value) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Session tier for the terminal chat.
pub enum SessionStore {
    File(JsonFileStore),
    Memory(MemorySessionStore),
}

impl SessionStore {
    /// Open a file-backed session store at `path`, falling back to memory
    /// when the file's directory is unusable.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let file = JsonFileStore::open(path).await.with_tier(StorageTier::Session);
        if file.is_available() {
            SessionStore::File(file)
        } else {
            tracing::warn!("session history kept in memory only: {} unusable", file.path().display());
            SessionStore::Memory(MemorySessionStore::new())
        }
    }
}

impl KvStore for SessionStore {
    fn tier(&self) -> StorageTier {
        StorageTier::Session
    }

    fn is_available(&self) -> bool {
        match self {
            SessionStore::File(store) => store.is_available(),
            SessionStore::Memory(store) => store.is_available(),
        }
    }

    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        match self {
            SessionStore::File(store) => store.get(key).await,
            SessionStore::Memory(store) => store.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &serde_json::Value) -> Result<(), StorageError> {
        match self {
            SessionStore::File(store) => store.set(key, value).await,
            SessionStore::Memory(store) => store.set(key, value).await,
        }
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self {
            SessionStore::File(store) => store.remove(key).await,
            SessionStore::Memory(store) => store.remove(key).await,
        }
    }
}
