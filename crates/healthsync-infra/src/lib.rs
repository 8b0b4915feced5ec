//! Infrastructure layer for HealthSync.
//!
//! Contains implementations of the port traits defined in `healthsync-core`:
//! reqwest clients for the chat endpoint, an OpenAI-compatible upstream and
//! the Google Places API, session and file-backed key-value stores, and the
//! config loader.

pub mod chat;
pub mod config;
pub mod location;
pub mod places;
pub mod storage;
