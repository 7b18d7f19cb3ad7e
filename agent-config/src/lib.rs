//! Configuration management for the agents runtime.
//!
//! Settings come from an optional TOML file, then environment overrides, and
//! are validated before use.

#![warn(missing_docs, clippy::pedantic)]

pub mod loader;
pub mod schema;

pub use loader::{ENV_LOG, ENV_PYTHON, ENV_SEARCH_DEPTH, apply_env_with, from_toml_str, load};
pub use schema::{AveConfig, ExecutorSettings, LogFormat, SocialSettings, TelemetrySettings};
