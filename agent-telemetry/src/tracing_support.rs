//! Structured tracing helpers.

use agent_config::{LogFormat, TelemetrySettings};
use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Builds the event filter.
///
/// A `rust_log` directive, usually the value of `RUST_LOG`, takes precedence
/// over the configured filter.
///
/// # Errors
///
/// Fails when the chosen directive does not parse.
pub fn build_filter(settings: &TelemetrySettings, rust_log: Option<&str>) -> Result<EnvFilter> {
    match rust_log.map(str::trim).filter(|value| !value.is_empty()) {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid {} directive `{directive}`", EnvFilter::DEFAULT_ENV)),
        None => EnvFilter::try_new(&settings.filter)
            .with_context(|| format!("invalid telemetry filter `{}`", settings.filter)),
    }
}

/// Installs the global subscriber, writing to stderr.
///
/// # Errors
///
/// Fails when the filter is invalid or a global subscriber is already set.
pub fn init(settings: &TelemetrySettings) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(settings, rust_log.as_deref())?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(settings.with_target)
        .with_writer(std::io::stderr);

    match settings.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    }
    .map_err(|err| anyhow!(err))
    .context("failed to install tracing subscriber")
}
