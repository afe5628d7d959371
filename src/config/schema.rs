//! Harness configuration schema.
//!
//! This module defines the settings of the harness itself: which profile to
//! load, which identities to act as, and which channel and chaincode to use.
//! All types derive Serde traits for deserialization from a TOML file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default chaincode id.
pub const DEFAULT_CHAINCODE_ID: &str = "example2";

/// Default chaincode source path, relative to `$GOPATH/src`.
pub const DEFAULT_CHAINCODE_PATH: &str =
    "github.com/hyperledger/fabric-samples/chaincode/chaincode_example02/go/";

/// Default channel id.
pub const DEFAULT_CHANNEL_ID: &str = "mychannel";

/// Environment variable holding the chaincode source root.
pub const CHAINCODE_ROOT_ENV: &str = "GOPATH";

/// Root configuration for the harness.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HarnessConfig {
    /// Network profile location and identities.
    pub network: NetworkSettings,

    /// Chaincode the harness targets.
    pub chaincode: ChaincodeSettings,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Network profile location and identities.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkSettings {
    /// Path to the connection profile.
    pub profile_path: PathBuf,

    /// Organization name (e.g. "Org1").
    pub org: String,

    /// Administrative user of the organization.
    pub admin: String,

    /// Regular user for channel operations.
    pub user: String,

    /// Channel the handle is bound to.
    pub channel_id: String,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            profile_path: PathBuf::from("config.yaml"),
            org: "Org1".to_string(),
            admin: "Admin".to_string(),
            user: "User1".to_string(),
            channel_id: DEFAULT_CHANNEL_ID.to_string(),
        }
    }
}

/// Chaincode the harness targets.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChaincodeSettings {
    /// Chaincode id (its name on the channel).
    pub id: String,

    /// Source path relative to the chaincode root.
    pub path: String,

    /// Chaincode source root. Falls back to `$GOPATH` when unset.
    pub root: Option<PathBuf>,
}

impl Default for ChaincodeSettings {
    fn default() -> Self {
        Self {
            id: DEFAULT_CHAINCODE_ID.to_string(),
            path: DEFAULT_CHAINCODE_PATH.to_string(),
            root: None,
        }
    }
}

impl ChaincodeSettings {
    /// Chaincode source root: explicit setting, else `$GOPATH`, else none.
    pub fn resolved_root(&self) -> Option<PathBuf> {
        self.root.clone().or_else(|| {
            std::env::var_os(CHAINCODE_ROOT_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        })
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the pretty format.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}
