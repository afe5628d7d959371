//! SDK value types and error definitions.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::config::ConfigError;
use crate::resilience::TimeoutType;

/// Identity a context acts as, fully resolved against the profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    /// Organization name.
    pub org: String,
    /// MSP id of the organization.
    pub msp_id: String,
    /// User name within the organization.
    pub user: String,
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.user, self.org)
    }
}

/// Identity selection for a new context: a user, optionally an organization.
///
/// Without an organization the profile's client organization is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextOptions {
    pub user: String,
    pub org: Option<String>,
}

impl ContextOptions {
    /// Act as the given user.
    pub fn user(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            org: None,
        }
    }

    /// Scope the context to an organization.
    pub fn with_org(mut self, org: impl Into<String>) -> Self {
        self.org = Some(org.into());
        self
    }
}

/// Snapshot of a channel's configuration as returned by a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelCfg {
    /// Channel id.
    pub channel_id: String,
    /// MSP ids of member organizations.
    pub msps: Vec<String>,
    /// Orderer addresses (`host:port`).
    pub orderers: Vec<String>,
}

impl ChannelCfg {
    pub fn orderers(&self) -> &[String] {
        &self.orderers
    }
}

/// An event emitted by chaincode during a committed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChaincodeEvent {
    pub tx_id: String,
    pub channel_id: String,
    pub chaincode_id: String,
    pub event_name: String,
    pub payload: Vec<u8>,
    pub block_number: u64,
    /// Peer the event was received from.
    pub source_url: String,
}

/// Handle for a chaincode event subscription.
///
/// Pass it back to the channel client to release the subscription.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Registration {
    id: Uuid,
}

impl Registration {
    pub(crate) fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

/// Errors raised at the SDK boundary.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Connection profile could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Context named no organization and the profile has no default.
    #[error("no organization given and the profile defines no client organization")]
    NoOrganization,

    #[error("organization '{0}' not found in profile")]
    UnknownOrganization(String),

    #[error("user '{user}' not enrolled in organization '{org}'")]
    UnknownUser { user: String, org: String },

    #[error("channel '{0}' not found in profile")]
    UnknownChannel(String),

    #[error("chaincode id must not be empty")]
    EmptyChaincodeId,

    #[error("invalid event filter '{filter}': {source}")]
    InvalidEventFilter {
        filter: String,
        #[source]
        source: regex::Error,
    },

    /// Request exceeded the deadline of its timeout category.
    #[error("{timeout_type} request timed out after {after:?}")]
    Timeout {
        timeout_type: TimeoutType,
        after: Duration,
    },

    #[error("request cancelled")]
    Cancelled,

    /// SDK handle has been closed.
    #[error("sdk is closed")]
    Closed,
}

/// Result type for SDK operations.
pub type SdkResult<T> = Result<T, SdkError>;
