//! HTTP layer for the HealthSync chat proxy.
//!
//! Axum server exposing the health probe and the chat-completions proxy
//! endpoint, with CORS for the configured frontend origin.

pub mod error;
pub mod handlers;
pub mod router;
