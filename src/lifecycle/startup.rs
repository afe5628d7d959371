//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate harness settings, then apply command-line overrides
//! - Build the client handle in dependency order
//!
//! # Design Decisions
//! - Fail fast: any startup error is returned to the binary, which exits
//! - Without a settings file, built-in defaults are the starting point

use std::path::{Path, PathBuf};

use crate::client::{Client, ClientResult};
use crate::config::validation::validate_config;
use crate::config::{load_config, ConfigError, HarnessConfig};

/// Values supplied on the command line; each replaces its settings field.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub profile_path: Option<PathBuf>,
    pub org: Option<String>,
    pub admin: Option<String>,
    pub user: Option<String>,
}

impl Overrides {
    fn apply(self, config: &mut HarnessConfig) {
        if let Some(path) = self.profile_path {
            config.network.profile_path = path;
        }
        if let Some(org) = self.org {
            config.network.org = org;
        }
        if let Some(admin) = self.admin {
            config.network.admin = admin;
        }
        if let Some(user) = self.user {
            config.network.user = user;
        }
    }
}

/// Load settings from `path` (or defaults) and apply `overrides`.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: Overrides,
) -> Result<HarnessConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => HarnessConfig::default(),
    };
    overrides.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Build the client handle described by `config`.
pub fn start(config: &HarnessConfig) -> ClientResult<Client> {
    tracing::info!(
        profile = %config.network.profile_path.display(),
        org = %config.network.org,
        channel = %config.network.channel_id,
        "Starting client harness"
    );
    let client = Client::from_config(config)?;
    tracing::info!(
        chaincode = client.chaincode_id(),
        chaincode_path = client.chaincode_path(),
        "Client harness ready"
    );
    Ok(client)
}
