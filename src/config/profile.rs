//! Network connection profile schema.
//!
//! Describes the network topology the SDK talks to: the client's default
//! organization, organizations with their peers and enrolled users, orderers,
//! peers and channels. Field names follow the common connection profile
//! layout (camelCase, `grpcOptions`, `mspid`).
//!
//! Timeouts are the exception: they live in one flat `client.timeouts` map of
//! whole seconds (`ordererResponseSecs: 15`), not the nested
//! `client.peer.timeout.response: 180s` style with duration strings.
//! Nested timeout keys are ignored.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::resilience::TimeoutConfig;

/// Root of a connection profile.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct NetworkProfile {
    /// Human-readable network name.
    pub name: String,

    /// Profile schema version.
    pub version: String,

    /// Settings for this client process.
    pub client: ClientSection,

    /// Organizations keyed by name (e.g. "Org1").
    pub organizations: BTreeMap<String, OrganizationConfig>,

    /// Orderers keyed by name (e.g. "orderer.example.com").
    pub orderers: BTreeMap<String, EndpointConfig>,

    /// Peers keyed by name (e.g. "peer0.org1.example.com").
    pub peers: BTreeMap<String, EndpointConfig>,

    /// Channels keyed by channel id.
    pub channels: BTreeMap<String, ChannelProfile>,
}

/// Client section of the profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientSection {
    /// Organization used when a context names only a user.
    pub organization: Option<String>,

    /// Request timeouts per category.
    pub timeouts: TimeoutConfig,

    /// Per-registration buffer for chaincode events.
    pub event_service_buffer_size: usize,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            organization: None,
            timeouts: TimeoutConfig::default(),
            event_service_buffer_size: 100,
        }
    }
}

/// A member organization.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct OrganizationConfig {
    /// MSP identifier of the organization.
    pub mspid: String,

    /// Names of peers owned by this organization.
    pub peers: Vec<String>,

    /// Enrolled users keyed by name (e.g. "Admin", "User1").
    pub users: BTreeMap<String, UserConfig>,
}

/// Enrollment material for a user.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UserConfig {
    pub cert: Option<PathBuf>,
    pub key: Option<PathBuf>,
}

/// A network endpoint (orderer or peer).
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct EndpointConfig {
    /// Endpoint URL, e.g. "grpcs://localhost:7050".
    pub url: String,

    /// gRPC dial options.
    pub grpc_options: GrpcOptions,
}

/// Subset of gRPC options relevant to address resolution.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GrpcOptions {
    /// TLS server name; also the address the network advertises.
    #[serde(rename = "ssl-target-name-override")]
    pub ssl_target_name_override: Option<String>,
}

impl EndpointConfig {
    /// The `host:port` address the network advertises for this endpoint.
    ///
    /// Uses the TLS name override as host when set, otherwise the URL host.
    /// Returns `None` when the URL lacks a host or port.
    pub fn advertised_address(&self) -> Option<String> {
        let (host, port) = parse_host_port(&self.url)?;
        let host = self
            .grpc_options
            .ssl_target_name_override
            .clone()
            .unwrap_or(host);
        Some(format!("{}:{}", host, port))
    }
}

/// Parse `scheme://host:port` or bare `host:port`.
pub fn parse_host_port(raw: &str) -> Option<(String, u16)> {
    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("grpc://{}", raw)
    };
    let url = Url::parse(&with_scheme).ok()?;
    let host = url.host_str()?.to_string();
    let port = url.port()?;
    Some((host, port))
}

/// Channel membership.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ChannelProfile {
    /// Orderer names serving this channel. Empty means every orderer.
    pub orderers: Vec<String>,

    /// Peers joined to this channel, with their roles.
    pub peers: BTreeMap<String, ChannelPeer>,
}

/// Roles a peer plays on a channel.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChannelPeer {
    pub endorsing_peer: bool,
    pub chaincode_query: bool,
    pub ledger_query: bool,
    pub event_source: bool,
}

impl Default for ChannelPeer {
    fn default() -> Self {
        Self {
            endorsing_peer: true,
            chaincode_query: true,
            ledger_query: true,
            event_source: true,
        }
    }
}

impl NetworkProfile {
    /// Organization owning the named peer, if any.
    pub fn peer_owner(&self, peer: &str) -> Option<(&str, &OrganizationConfig)> {
        self.organizations
            .iter()
            .find(|(_, org)| org.peers.iter().any(|p| p == peer))
            .map(|(name, org)| (name.as_str(), org))
    }

    /// Advertised addresses of the orderers serving a channel.
    ///
    /// A channel without an explicit orderer list is served by every orderer.
    pub fn channel_orderer_addresses(&self, channel: &ChannelProfile) -> Vec<String> {
        if channel.orderers.is_empty() {
            return self
                .orderers
                .values()
                .filter_map(EndpointConfig::advertised_address)
                .collect();
        }
        channel
            .orderers
            .iter()
            .filter_map(|name| self.orderers.get(name))
            .filter_map(EndpointConfig::advertised_address)
            .collect()
    }

    /// MSP ids of organizations with at least one peer on the channel.
    pub fn channel_msp_ids(&self, channel: &ChannelProfile) -> Vec<String> {
        let mut ids: Vec<String> = channel
            .peers
            .keys()
            .filter_map(|peer| self.peer_owner(peer))
            .map(|(_, org)| org.mspid.clone())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }
}
