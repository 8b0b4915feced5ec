//! Business logic and port trait definitions for HealthSync.
//!
//! This crate defines the "ports" (transport, probe, storage, location and
//! places traits) that the infrastructure layer implements, plus the chat
//! client state machine that drives them. It depends only on
//! `healthsync-types` -- never on `healthsync-infra` or any HTTP/IO crate.

pub mod chat;
pub mod facility;
pub mod knowledge;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;
