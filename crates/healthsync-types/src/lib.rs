//! Shared domain types for HealthSync.
//!
//! This crate contains the types used across the HealthSync workspace:
//! chat messages and preferences, the chat-completions wire format,
//! healthcare facilities, configuration, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod facility;
pub mod message;
pub mod wire;
