//! Timeout categories for network requests.
//!
//! # Responsibilities
//! - Name each class of network wait (connect, response, event registration)
//! - Map a category to a concrete deadline from the connection profile
//!
//! # Design Decisions
//! - Every request context is opened against exactly one category
//! - Defaults apply when the profile omits a value
//! - Values are whole seconds under flat camelCase keys in `client.timeouts`
//!   (`ordererResponseSecs`), not nested duration strings
//! - Each value is capped by `config::validation::MAX_TIMEOUT_SECS`

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Category of a network wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeoutType {
    /// Establishing a connection to a peer.
    PeerConnection,
    /// Waiting for a peer to answer a request.
    PeerResponse,
    /// Establishing a connection to an orderer.
    OrdererConnection,
    /// Waiting for an orderer to answer a request.
    OrdererResponse,
    /// Registering with the event service.
    EventReg,
    /// Chaincode query round trip.
    Query,
    /// Chaincode execute round trip.
    Execute,
}

impl fmt::Display for TimeoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeoutType::PeerConnection => "peer_connection",
            TimeoutType::PeerResponse => "peer_response",
            TimeoutType::OrdererConnection => "orderer_connection",
            TimeoutType::OrdererResponse => "orderer_response",
            TimeoutType::EventReg => "event_reg",
            TimeoutType::Query => "query",
            TimeoutType::Execute => "execute",
        };
        f.write_str(name)
    }
}

/// Timeout values in seconds, one per [`TimeoutType`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeoutConfig {
    pub peer_connection_secs: u64,
    pub peer_response_secs: u64,
    pub orderer_connection_secs: u64,
    pub orderer_response_secs: u64,
    pub event_reg_secs: u64,
    pub query_secs: u64,
    pub execute_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            peer_connection_secs: 10,
            peer_response_secs: 180,
            orderer_connection_secs: 15,
            orderer_response_secs: 15,
            event_reg_secs: 15,
            query_secs: 180,
            execute_secs: 180,
        }
    }
}

impl TimeoutConfig {
    /// Resolve the deadline length for a timeout category.
    pub fn get(&self, timeout_type: TimeoutType) -> Duration {
        let secs = match timeout_type {
            TimeoutType::PeerConnection => self.peer_connection_secs,
            TimeoutType::PeerResponse => self.peer_response_secs,
            TimeoutType::OrdererConnection => self.orderer_connection_secs,
            TimeoutType::OrdererResponse => self.orderer_response_secs,
            TimeoutType::EventReg => self.event_reg_secs,
            TimeoutType::Query => self.query_secs,
            TimeoutType::Execute => self.execute_secs,
        };
        Duration::from_secs(secs)
    }

    /// All categories paired with their configured value, for validation.
    pub fn entries(&self) -> [(TimeoutType, u64); 7] {
        [
            (TimeoutType::PeerConnection, self.peer_connection_secs),
            (TimeoutType::PeerResponse, self.peer_response_secs),
            (TimeoutType::OrdererConnection, self.orderer_connection_secs),
            (TimeoutType::OrdererResponse, self.orderer_response_secs),
            (TimeoutType::EventReg, self.event_reg_secs),
            (TimeoutType::Query, self.query_secs),
            (TimeoutType::Execute, self.execute_secs),
        ]
    }
}
