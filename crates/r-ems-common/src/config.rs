//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Shared primitives and utilities for the outage toolkit."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::logging::LogFormat;

fn default_log_format() -> LogFormat {
    LogFormat::StructuredJson
}

/// Structural checks run after a configuration document has been parsed.
pub trait ValidateConfig {
    fn validate(&self) -> Result<()>;
}

/// Metadata describing where a configuration was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedConfig<T> {
    pub config: T,
    pub source: PathBuf,
}

/// Load a TOML configuration together with the effective source path.
///
/// A non-empty `env_var` pointing at a file wins over the candidate list; otherwise
/// the first candidate that exists on disk is used.
pub fn load_with_source<T, P>(env_var: &str, candidates: &[P]) -> Result<LoadedConfig<T>>
where
    T: DeserializeOwned + ValidateConfig,
    P: AsRef<Path>,
{
    if let Ok(env_path) = std::env::var(env_var) {
        if !env_path.trim().is_empty() {
            let path = PathBuf::from(env_path);
            let config = from_path(&path)?;
            return Ok(LoadedConfig {
                config,
                source: path,
            });
        }
    }

    for candidate in candidates {
        if candidate.as_ref().exists() {
            let path = candidate.as_ref().to_path_buf();
            let config = from_path(&path)?;
            return Ok(LoadedConfig {
                config,
                source: path,
            });
        }
    }

    Err(anyhow!(
        "no configuration files found. inspected: {}",
        candidates
            .iter()
            .map(|p| p.as_ref().display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    ))
}

/// Read, parse, and validate a configuration file.
pub fn from_path<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + ValidateConfig,
{
    debug!(config_path = %path.display(), "loading configuration");
    let contents = fs::read_to_string(path)
        .with_context(|| format!("unable to read config file {}", path.display()))?;
    let config = toml::from_str::<T>(&contents)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// Parse and validate an in-memory TOML document.
pub fn parse_str<T>(content: &str) -> Result<T>
where
    T: DeserializeOwned + ValidateConfig,
{
    let config: T = toml::from_str(content).with_context(|| "failed to parse configuration")?;
    config.validate()?;
    Ok(config)
}

/// Logging section shared by every configuration document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Directory for rolling JSON log files. Stdout only when unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            format: default_log_format(),
            file_prefix: None,
        }
    }
}
