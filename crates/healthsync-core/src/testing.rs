//! In-memory port implementations shared by the unit tests.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex};

use healthsync_types::error::{StorageError, TransportError};
use healthsync_types::wire::{ChatCompletionRequest, ChatCompletionResponse};

use crate::chat::transport::ChatTransport;
use crate::storage::kv_store::{KvStore, StorageTier};

/// HashMap-backed store. Clones share the same map.
#[derive(Clone)]
pub struct MemoryStore {
    tier: StorageTier,
    available: bool,
    values: Arc<Mutex<HashMap<String, serde_json::Value>>>,
}

impl MemoryStore {
    pub fn new(tier: StorageTier) -> Self {
        Self {
            tier,
            available: true,
            values: Arc::default(),
        }
    }

    pub fn unavailable(tier: StorageTier) -> Self {
        Self {
            available: false,
            ..Self::new(tier)
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.lock().unwrap().contains_key(key)
    }

    pub fn value(&self, key: &str) -> Option<serde_json::Value> {
        self.values.lock().unwrap().get(key).cloned()
    }
}

impl KvStore for MemoryStore {
    fn tier(&self) -> StorageTier {
        self.tier
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<serde_json::Value>, StorageError>> + Send {
        let value = self.values.lock().unwrap().get(key).cloned();
        async move { Ok(value) }
    }

    fn set(
        &self,
        key: &str,
        value: &serde_json::Value,
    ) -> impl Future<Output = Result<(), StorageError>> + Send {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.clone());
        async { Ok(()) }
    }

    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send {
        self.values.lock().unwrap().remove(key);
        async { Ok(()) }
    }
}

type Scripted = Result<ChatCompletionResponse, TransportError>;

#[derive(Default)]
struct TransportState {
    script: VecDeque<Scripted>,
    fallback: Option<Scripted>,
    calls: Vec<(tokio::time::Instant, ChatCompletionRequest)>,
    observed: Option<(MemoryStore, String)>,
    snapshots: Vec<Option<serde_json::Value>>,
}

/// Transport that replays scripted outcomes and records every call.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    state: Arc<Mutex<TransportState>>,
}

impl ScriptedTransport {
    /// Replays `script` in order, then keeps returning the last entry.
    pub fn new(script: Vec<Scripted>) -> Self {
        let fallback = script.last().cloned();
        Self {
            state: Arc::new(Mutex::new(TransportState {
                script: script.into(),
                fallback,
                ..TransportState::default()
            })),
        }
    }

    pub fn always(outcome: Scripted) -> Self {
        Self::new(vec![outcome])
    }

    pub fn reply(text: &str) -> Scripted {
        Ok(ChatCompletionResponse::from_text(text))
    }

    pub fn status(status: u16) -> Scripted {
        Err(TransportError::Status {
            status,
            message: format!("status {status}"),
        })
    }

    /// Record the value of `key` in `store` at the moment of every call.
    pub fn snapshot_store(&self, store: MemoryStore, key: &str) {
        self.state.lock().unwrap().observed = Some((store, key.to_string()));
    }

    pub fn snapshots(&self) -> Vec<Option<serde_json::Value>> {
        self.state.lock().unwrap().snapshots.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    pub fn call_times(&self) -> Vec<tokio::time::Instant> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .map(|(at, _)| *at)
            .collect()
    }

    pub fn requests(&self) -> Vec<ChatCompletionRequest> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .map(|(_, req)| req.clone())
            .collect()
    }
}

impl ChatTransport for ScriptedTransport {
    fn send(
        &self,
        request: &ChatCompletionRequest,
    ) -> impl Future<Output = Result<ChatCompletionResponse, TransportError>> + Send {
        let mut state = self.state.lock().unwrap();
        state.calls.push((tokio::time::Instant::now(), request.clone()));
        let snapshot = state.observed.as_ref().map(|(store, key)| store.value(key));
        if let Some(snapshot) = snapshot {
            state.snapshots.push(snapshot);
        }
        let outcome = match state.script.pop_front() {
            Some(next) => next,
            None => state
                .fallback
                .clone()
                .unwrap_or_else(|| Err(TransportError::Connection("no script".into()))),
        };
        async move { outcome }
    }
}
