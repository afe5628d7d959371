//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::profile::NetworkProfile;
use crate::config::schema::HarnessConfig;
use crate::config::validation::{validate_config, validate_profile, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// On-disk encodings understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
    Toml,
}

impl Format {
    /// Pick a format from the file extension; TOML when unknown.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml") | Some("yml") => Format::Yaml,
            Some("json") => Format::Json,
            _ => Format::Toml,
        }
    }
}

fn parse<T: DeserializeOwned>(path: &Path, content: &str) -> Result<T, ConfigError> {
    let parsed = match Format::from_path(path) {
        Format::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        Format::Toml => toml::from_str(content).map_err(|e| e.to_string()),
    };
    parsed.map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and validate a connection profile (YAML, JSON or TOML).
pub fn load_profile(path: &Path) -> Result<NetworkProfile, ConfigError> {
    let content = read(path)?;
    let profile: NetworkProfile = parse(path, &content)?;

    validate_profile(&profile).map_err(ConfigError::Validation)?;

    tracing::debug!(
        path = %path.display(),
        organizations = profile.organizations.len(),
        orderers = profile.orderers.len(),
        channels = profile.channels.len(),
        "Connection profile loaded"
    );
    Ok(profile)
}

/// Load and validate harness settings from a TOML file.
pub fn load_config(path: &Path) -> Result<HarnessConfig, ConfigError> {
    let content = read(path)?;
    let config: HarnessConfig = parse(path, &content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
