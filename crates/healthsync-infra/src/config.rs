//! Data directory layout and `config.toml` loading.
//!
//! The data directory (`~/.healthsync/` unless overridden) holds
//! `config.toml`, the durable preference store and the terminal chat's
//! session history.

use std::path::{Path, PathBuf};

use healthsync_types::config::GlobalConfig;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "HEALTHSYNC_DATA_DIR";

pub const CONFIG_FILE: &str = "config.toml";

/// File name of the durable store inside the data directory.
pub const DURABLE_STORE_FILE: &str = "store.json";

/// File name of the terminal chat's session store inside the data directory.
pub const SESSION_STORE_FILE: &str = "session.json";

/// Resolve the data directory: `$HEALTHSYNC_DATA_DIR`, else `~/.healthsync`,
/// else `.healthsync` in the working directory.
pub fn resolve_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".healthsync"),
        None => {
            tracing::warn!("no home directory found, using ./.healthsync");
            PathBuf::from(".healthsync")
        }
    }
}

/// Path of the durable key-value store for `data_dir`.
pub fn durable_store_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DURABLE_STORE_FILE)
}

pub fn session_store_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SESSION_STORE_FILE)
}

/// Read `config.toml` from `data_dir`.
///
/// Every field has a default, so a missing file is normal. An unreadable or
/// invalid file is logged and ignored rather than aborting startup.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let path = data_dir.join(CONFIG_FILE);
    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return GlobalConfig::default();
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "config file unreadable, using defaults");
            return GlobalConfig::default();
        }
    };

    toml::from_str(&content).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
        GlobalConfig::default()
    })
}
