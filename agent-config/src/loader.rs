//! Configuration loader implementations.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::schema::AveConfig;

/// Overrides `executor.interpreter`.
pub const ENV_PYTHON: &str = "AVE_PYTHON";
/// Overrides `social.search_depth`.
pub const ENV_SEARCH_DEPTH: &str = "AVE_SEARCH_DEPTH";
/// Overrides `telemetry.filter`.
pub const ENV_LOG: &str = "AVE_LOG";

/// Loads configuration from `path` (or defaults) plus process environment.
///
/// # Errors
///
/// Fails when the file cannot be read or parsed, an override is malformed,
/// or the result does not validate.
pub fn load(path: Option<&Path>) -> Result<AveConfig> {
    let mut config = match path {
        Some(path) => from_file(path)?,
        None => AveConfig::default(),
    };
    apply_env_with(&mut config, |key| std::env::var(key).ok())?;
    config.validate().context("invalid configuration")?;
    debug!(?config, "configuration loaded");
    Ok(config)
}

/// Reads and parses a TOML configuration file.
///
/// # Errors
///
/// Fails when the file cannot be read or parsed.
pub fn from_file(path: &Path) -> Result<AveConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    from_toml_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

/// Parses a TOML configuration document.
///
/// # Errors
///
/// Fails on malformed TOML or unknown keys.
pub fn from_toml_str(text: &str) -> Result<AveConfig> {
    toml::from_str(text).context("malformed configuration document")
}

/// Applies environment overrides obtained through `lookup`.
///
/// # Errors
///
/// Fails when [`ENV_SEARCH_DEPTH`] is not a non-negative integer.
pub fn apply_env_with<F>(config: &mut AveConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(python) = lookup(ENV_PYTHON).filter(|value| !value.is_empty()) {
        config.executor.interpreter = PathBuf::from(python);
    }
    if let Some(depth) = lookup(ENV_SEARCH_DEPTH) {
        config.social.search_depth = depth
            .trim()
            .parse()
            .with_context(|| format!("{ENV_SEARCH_DEPTH} must be a non-negative integer"))?;
    }
    if let Some(filter) = lookup(ENV_LOG).filter(|value| !value.is_empty()) {
        config.telemetry.filter = filter;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;
    use crate::schema::LogFormat;

    #[test]
    fn parses_partial_document() {
        let config = from_toml_str(
            r#"
            [social]
            search_depth = 3

            [telemetry]
            format = "pretty"
            "#,
        )
        .expect("config");
        assert_eq!(config.social.search_depth, 3);
        assert_eq!(config.social.neighbor_depth, 1);
        assert_eq!(config.telemetry.format, LogFormat::Pretty);
        assert_eq!(config.executor.interpreter, PathBuf::from("python3"));
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(from_toml_str("[social]\nradius = 4\n").is_err());
    }

    #[test]
    fn env_overrides_apply() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_PYTHON, "/opt/python/bin/python3"),
            (ENV_SEARCH_DEPTH, " 4 "),
            (ENV_LOG, "agent_social=debug"),
        ]);
        let mut config = AveConfig::default();
        apply_env_with(&mut config, |key| env.get(key).map(|v| (*v).to_owned())).unwrap();

        assert_eq!(
            config.executor.interpreter,
            PathBuf::from("/opt/python/bin/python3")
        );
        assert_eq!(config.social.search_depth, 4);
        assert_eq!(config.telemetry.filter, "agent_social=debug");
    }

    #[test]
    fn malformed_depth_override_fails() {
        let mut config = AveConfig::default();
        let err = apply_env_with(&mut config, |key| {
            (key == ENV_SEARCH_DEPTH).then(|| "deep".to_owned())
        })
        .expect_err("bad depth");
        assert!(err.to_string().contains(ENV_SEARCH_DEPTH));
    }

    #[test]
    fn reads_config_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[executor]\ninterpreter = \"python3.12\"").expect("write");

        let config = from_file(file.path()).expect("config");
        assert_eq!(config.executor.interpreter, PathBuf::from("python3.12"));

        let missing = from_file(Path::new("/nonexistent/ave.toml")).expect_err("missing");
        assert!(missing.to_string().contains("failed to read config file"));
    }
}
