//! Client harness for a permissioned blockchain network.
//!
//! Loads a connection profile, derives an administrative resource client and
//! a channel client, forwards chaincode event subscriptions, and verifies a
//! channel's orderer configuration.

pub mod client;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod sdk;

pub use client::{Client, ClientError, ClientResult};
pub use config::HarnessConfig;
pub use sdk::{FabricSdk, Sdk, SdkError};
