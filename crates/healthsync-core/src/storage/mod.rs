//! Storage abstractions for HealthSync.
//!
//! - [`kv_store::KvStore`]: tiered key-value port with a capability probe
//! - [`persistence::ConversationPersistence`]: history and preference
//!   persistence on top of two stores

pub mod kv_store;
pub mod persistence;
