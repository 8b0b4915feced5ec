//! Key-value store implementations.
//!
//! - [`session::MemorySessionStore`]: `Session` tier, lives as long as the process
//! - [`session::SessionStore`]: `Session` tier for the terminal chat, file-backed
//! - [`file::JsonFileStore`]: one JSON object on disk, `Durable` tier by default

pub mod file;
pub mod session;

use std::path::Path;

use healthsync_core::storage::persistence::ConversationPersistence;

use crate::config::{durable_store_path, session_store_path};

pub use file::JsonFileStore;
pub use session::{MemorySessionStore, SessionStore};

/// Chat persistence over the stores in `data_dir`.
pub async fn open_conversation_persistence(
    data_dir: &Path,
    history_limit: usize,
) -> ConversationPersistence<SessionStore, JsonFileStore> {
    let session = SessionStore::open(session_store_path(data_dir)).await;
    let durable = JsonFileStore::open(durable_store_path(data_dir)).await;
    ConversationPersistence::new(session, durable, history_limit)
}
