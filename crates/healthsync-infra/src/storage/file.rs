//! Key-value store persisted as a single JSON object file.
//!
//! Durable tier by default. The terminal chat also uses one as its session
//! tier, so remembered history survives between runs.
//!
//! The whole object is read and rewritten on every mutation; the store only
//! ever holds a handful of small keys. Writes go to a sibling temp file and
//! are renamed into place. A mutex serializes read-modify-write cycles
//! within the process.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tokio::sync::Mutex;

use healthsync_core::storage::kv_store::{KvStore, StorageTier};
use healthsync_types::error::StorageError;

pub struct JsonFileStore {
    path: PathBuf,
    tier: StorageTier,
    available: bool,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (or prepare) the store at `path`.
    ///
    /// The parent directory is created if needed. If that fails the store
    /// is still returned but reports itself unavailable.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let available = match path.parent() {
            Some(dir) => match tokio::fs::create_dir_all(dir).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("store directory {} unusable: {e}", dir.display());
                    false
                }
            },
            None => true,
        };
        Self {
            path,
            tier: StorageTier::Durable,
            available,
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_tier(mut self, tier: StorageTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Map<String, Value>, StorageError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(StorageError::Io(e.to_string())),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(StorageError::Serialization(format!(
                "{} does not contain a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(StorageError::Serialization(e.to_string())),
        }
    }

    async fn write_all(&self, map: &Map<String, Value>) -> Result<(), StorageError> {
        let content =
            serde_json::to_string_pretty(map).map_err(|e| StorageError::Serialization(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))
    }

    fn ensure_available(&self) -> Result<(), StorageError> {
        if self.available {
            Ok(())
        } else {
            Err(StorageError::Unavailable)
        }
    }
}

impl KvStore for JsonFileStore {
    fn tier(&self) -> StorageTier {
        self.tier
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        self.ensure_available()?;
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        self.ensure_available()?;
        let _guard = self.write_lock.lock().await;
        let mut map = match self.read_all().await {
            Ok(map) => map,
            Err(StorageError::Serialization(e)) => {
                tracing::warn!(tier = %self.tier, "replacing corrupt store {}: {e}", self.path.display());
                Map::new()
            }
            Err(e) => return Err(e),
        };
        map.insert(key.to_string(), value.clone());
        self.write_all(&map).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.ensure_available()?;
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_all().await?;
        if map.remove(key).is_some() {
            self.write_all(&map).await?;
        }
        Ok(())
    }
}
