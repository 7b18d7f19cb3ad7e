//! Agent collaboration runtime facade.
//!
//! Depend on this crate via `cargo add ave-agents`. It bundles the runtime
//! crates behind feature flags so downstream users can enable only the
//! components their agents need.

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared primitives for convenience.
pub use agent_primitives as primitives;

/// Social graph and peer discovery (enabled by `social` feature).
#[cfg(feature = "social")]
pub use agent_social as social;

/// Notebook-style code execution (enabled by `executor` feature).
#[cfg(feature = "executor")]
pub use agent_executor as executor;

/// Configuration management (enabled by `config` feature).
#[cfg(feature = "config")]
pub use agent_config as config;

/// Structured logging setup (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use agent_telemetry as telemetry;
