//! Strongly typed configuration schemas.

use std::path::PathBuf;

use agent_executor::PythonSessionConfig;
use agent_social::{DEFAULT_NEIGHBOR_DEPTH, DEFAULT_SEARCH_DEPTH};
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Root configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AveConfig {
    /// Code execution settings.
    pub executor: ExecutorSettings,
    /// Social graph query settings.
    pub social: SocialSettings,
    /// Logging settings.
    pub telemetry: TelemetrySettings,
}

impl AveConfig {
    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Fails when the interpreter path or the log filter is empty.
    pub fn validate(&self) -> Result<()> {
        if self.executor.interpreter.as_os_str().is_empty() {
            bail!("executor.interpreter cannot be empty");
        }
        if self.telemetry.filter.trim().is_empty() {
            bail!("telemetry.filter cannot be empty");
        }
        Ok(())
    }
}

/// How code blocks are executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutorSettings {
    /// Interpreter command, resolved through `PATH` when relative.
    pub interpreter: PathBuf,
    /// Extra interpreter flags.
    pub interpreter_args: Vec<String>,
}

impl ExecutorSettings {
    /// Converts the settings into a Python session launch configuration.
    #[must_use]
    pub fn session_config(&self) -> PythonSessionConfig {
        PythonSessionConfig::new(self.interpreter.clone())
            .with_args(self.interpreter_args.iter().cloned())
    }
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            interpreter: PathBuf::from("python3"),
            interpreter_args: Vec::new(),
        }
    }
}

/// Hop limits for social graph queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SocialSettings {
    /// Depth used for plain neighbor queries.
    pub neighbor_depth: usize,
    /// Depth used when searching for peers.
    pub search_depth: usize,
}

impl Default for SocialSettings {
    fn default() -> Self {
        Self {
            neighbor_depth: DEFAULT_NEIGHBOR_DEPTH,
            search_depth: DEFAULT_SEARCH_DEPTH,
        }
    }
}

/// Log line layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line records.
    #[default]
    Compact,
    /// Multi-line, human oriented records.
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TelemetrySettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Output layout.
    pub format: LogFormat,
    /// Whether records include their target module.
    pub with_target: bool,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
            format: LogFormat::Compact,
            with_target: false,
        }
    }
}
