//! Observability setup for HealthSync binaries.

pub mod tracing_setup;
