//! Observability utilities for agents.
//!
//! Installs a `tracing` subscriber configured from [`TelemetrySettings`].

#![warn(missing_docs, clippy::pedantic)]

pub mod tracing_support;

pub use agent_config::{LogFormat, TelemetrySettings};
pub use tracing_support::{build_filter, init};
