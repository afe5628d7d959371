//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (organizations and channels reference
//!   existing peers and orderers)
//! - Validate value ranges (timeouts in 1..=MAX_TIMEOUT_SECS, endpoints carry a port)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function over the parsed value

use thiserror::Error;

use crate::config::profile::{parse_host_port, NetworkProfile};
use crate::config::schema::HarnessConfig;

/// Largest accepted timeout for any category (one day).
pub const MAX_TIMEOUT_SECS: u64 = 86_400;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("client organization '{0}' is not defined")]
    UnknownClientOrganization(String),

    #[error("organization '{org}' references undefined peer '{peer}'")]
    UnknownOrgPeer { org: String, peer: String },

    #[error("organization '{0}' has an empty mspid")]
    MissingMspId(String),

    #[error("channel '{channel}' references undefined orderer '{orderer}'")]
    UnknownChannelOrderer { channel: String, orderer: String },

    #[error("channel '{channel}' references undefined peer '{peer}'")]
    UnknownChannelPeer { channel: String, peer: String },

    #[error("endpoint '{name}' has invalid url '{url}' (expected host:port)")]
    InvalidEndpoint { name: String, url: String },

    #[error("timeout '{0}' must be greater than zero")]
    ZeroTimeout(String),

    #[error("timeout '{name}' of {secs}s exceeds the {max}s limit")]
    TimeoutTooLarge { name: String, secs: u64, max: u64 },

    #[error("event buffer size must be greater than zero")]
    ZeroEventBuffer,

    #[error("setting '{0}' must not be empty")]
    EmptySetting(&'static str),
}

/// Validate a connection profile.
pub fn validate_profile(profile: &NetworkProfile) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(org) = &profile.client.organization {
        if !profile.organizations.contains_key(org) {
            errors.push(ValidationError::UnknownClientOrganization(org.clone()));
        }
    }

    for (name, org) in &profile.organizations {
        if org.mspid.is_empty() {
            errors.push(ValidationError::MissingMspId(name.clone()));
        }
        for peer in &org.peers {
            if !profile.peers.contains_key(peer) {
                errors.push(ValidationError::UnknownOrgPeer {
                    org: name.clone(),
                    peer: peer.clone(),
                });
            }
        }
    }

    for (name, endpoint) in profile.orderers.iter().chain(profile.peers.iter()) {
        if parse_host_port(&endpoint.url).is_none() {
            errors.push(ValidationError::InvalidEndpoint {
                name: name.clone(),
                url: endpoint.url.clone(),
            });
        }
    }

    for (channel_id, channel) in &profile.channels {
        for orderer in &channel.orderers {
            if !profile.orderers.contains_key(orderer) {
                errors.push(ValidationError::UnknownChannelOrderer {
                    channel: channel_id.clone(),
                    orderer: orderer.clone(),
                });
            }
        }
        for peer in channel.peers.keys() {
            if !profile.peers.contains_key(peer) {
                errors.push(ValidationError::UnknownChannelPeer {
                    channel: channel_id.clone(),
                    peer: peer.clone(),
                });
            }
        }
    }

    for (timeout_type, secs) in profile.client.timeouts.entries() {
        if secs == 0 {
            errors.push(ValidationError::ZeroTimeout(timeout_type.to_string()));
        } else if secs > MAX_TIMEOUT_SECS {
            errors.push(ValidationError::TimeoutTooLarge {
                name: timeout_type.to_string(),
                secs,
                max: MAX_TIMEOUT_SECS,
            });
        }
    }

    if profile.client.event_service_buffer_size == 0 {
        errors.push(ValidationError::ZeroEventBuffer);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate harness settings.
pub fn validate_config(config: &HarnessConfig) -> Result<(), Vec<ValidationError>> {
    let checks = [
        ("network.org", config.network.org.is_empty()),
        ("network.admin", config.network.admin.is_empty()),
        ("network.user", config.network.user.is_empty()),
        ("network.channel_id", config.network.channel_id.is_empty()),
        ("chaincode.id", config.chaincode.id.is_empty()),
    ];

    let errors: Vec<ValidationError> = checks
        .into_iter()
        .filter(|(_, empty)| *empty)
        .map(|(name, _)| ValidationError::EmptySetting(name))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
