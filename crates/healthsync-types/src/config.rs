//! Global configuration types for HealthSync.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls the
//! chat client, the proxy server and the facility locator. Every field has a
//! default so an empty or partial file is valid.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::facility::{Coordinates, DEFAULT_SEARCH_RADIUS_M};
use crate::wire::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE};

/// Top-level configuration, loaded from `~/.healthsync/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub places: PlacesConfig,
}

/// Chat client behaviour: endpoint, payload defaults, retry and probe timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Chat completions endpoint (local proxy or OpenAI-compatible API).
    pub endpoint: String,
    /// Liveness probe endpoint.
    pub health_url: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub request_timeout_secs: u64,
    /// Total attempts per submission, including the first.
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub health_interval_secs: u64,
    pub probe_timeout_secs: u64,
    /// Number of messages kept in session storage.
    pub history_limit: usize,
    pub facility_trigger_delay_ms: u64,
    pub facility_radius_m: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:3001/api/chat".to_string(),
            health_url: "http://127.0.0.1:3001/health".to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            request_timeout_secs: 30,
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 10_000,
            health_interval_secs: 30,
            probe_timeout_secs: 5,
            history_limit: 20,
            facility_trigger_delay_ms: 500,
            facility_radius_m: DEFAULT_SEARCH_RADIUS_M,
        }
    }
}

impl ChatConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn health_interval(&self) -> Duration {
        Duration::from_secs(self.health_interval_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn facility_trigger_delay(&self) -> Duration {
        Duration::from_millis(self.facility_trigger_delay_ms)
    }
}

/// Proxy server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origin allowed by CORS.
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
    /// OpenAI-compatible base URL used when an upstream API key is set.
    #[serde(default = "default_upstream_base_url")]
    pub upstream_base_url: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_frontend_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_upstream_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            frontend_url: default_frontend_url(),
            upstream_base_url: default_upstream_base_url(),
        }
    }
}

/// Facility locator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesConfig {
    #[serde(default = "default_places_base_url")]
    pub base_url: String,
    #[serde(default = "default_geolocation_timeout_secs")]
    pub geolocation_timeout_secs: u64,
    /// Location used when no better source is available.
    #[serde(default)]
    pub default_location: Option<Coordinates>,
}

fn default_places_base_url() -> String {
    "https://maps.googleapis.com/maps/api/place".to_string()
}

fn default_geolocation_timeout_secs() -> u64 {
    10
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            base_url: default_places_base_url(),
            geolocation_timeout_secs: default_geolocation_timeout_secs(),
            default_location: None,
        }
    }
}

impl PlacesConfig {
    pub fn geolocation_timeout(&self) -> Duration {
        Duration::from_secs(self.geolocation_timeout_secs)
    }
}
