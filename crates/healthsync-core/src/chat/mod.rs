//! Chat client for HealthSync.
//!
//! - [`client::ChatClient`]: conversation owner; validates input, sends,
//!   classifies failures and retries
//! - [`transport::ChatTransport`]: port to the chat endpoint
//! - [`retry::RetryPolicy`]: capped exponential backoff schedule
//! - [`connectivity::ConnectivityMonitor`]: periodic liveness probe gating sends
//! - [`facility_trigger::FacilityTrigger`]: keyword scan that asks the
//!   facility locator for a nearby search

pub mod client;
pub mod connectivity;
pub mod conversation;
pub mod facility_trigger;
pub mod retry;
pub mod transport;
pub mod validation;
