//! Profile-backed SDK implementation.
//!
//! # Responsibilities
//! - Load the connection profile and resolve identities against it
//! - Hand out resource, channel and channel-context clients
//! - Answer channel configuration queries from the channel's profile entry
//! - Own the event hub that feeds chaincode event subscriptions

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::loader::load_profile;
use crate::config::profile::{ChannelProfile, NetworkProfile};
use crate::resilience::TimeoutType;
use crate::sdk::context::RequestContext;
use crate::sdk::events::{EventHub, EventStream};
use crate::sdk::types::{ChannelCfg, ContextOptions, Identity, Registration, SdkError, SdkResult};
use crate::sdk::{ChannelClient, ChannelConfig, ChannelContext, ChannelService, ResourceClient, Sdk};

/// SDK root handle built from a connection profile.
pub struct FabricSdk {
    profile: Arc<NetworkProfile>,
    events: EventHub,
    closed: AtomicBool,
}

impl FabricSdk {
    /// Create a handle over an already validated profile.
    pub fn new(profile: NetworkProfile) -> Self {
        let events = EventHub::new(profile.client.event_service_buffer_size);
        Self {
            profile: Arc::new(profile),
            events,
            closed: AtomicBool::new(false),
        }
    }

    /// Load the connection profile at `path` and create a handle over it.
    pub fn from_file(path: &Path) -> SdkResult<Self> {
        let profile = load_profile(path)?;
        Ok(Self::new(profile))
    }

    pub fn profile(&self) -> &NetworkProfile {
        &self.profile
    }

    /// Ingress for chaincode events received from the network.
    pub fn event_hub(&self) -> &EventHub {
        &self.events
    }

    fn ensure_open(&self) -> SdkResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(SdkError::Closed);
        }
        Ok(())
    }

    /// Resolve a user (and optional organization) to a full identity.
    fn resolve_identity(&self, opts: &ContextOptions) -> SdkResult<Identity> {
        let org_name = opts
            .org
            .clone()
            .or_else(|| self.profile.client.organization.clone())
            .ok_or(SdkError::NoOrganization)?;

        let org = self
            .profile
            .organizations
            .get(&org_name)
            .ok_or_else(|| SdkError::UnknownOrganization(org_name.clone()))?;

        if !org.users.contains_key(&opts.user) {
            return Err(SdkError::UnknownUser {
                user: opts.user.clone(),
                org: org_name,
            });
        }

        Ok(Identity {
            org: org_name,
            msp_id: org.mspid.clone(),
            user: opts.user.clone(),
        })
    }

    fn ensure_channel(&self, channel_id: &str) -> SdkResult<()> {
        if self.profile.channels.contains_key(channel_id) {
            Ok(())
        } else {
            Err(SdkError::UnknownChannel(channel_id.to_string()))
        }
    }
}

impl Sdk for FabricSdk {
    fn resource_client(&self, opts: ContextOptions) -> SdkResult<Arc<dyn ResourceClient>> {
        self.ensure_open()?;
        let identity = self.resolve_identity(&opts)?;
        tracing::debug!(identity = %identity, "Created resource client context");
        Ok(Arc::new(ProfileResourceClient {
            identity,
            profile: Arc::clone(&self.profile),
        }))
    }

    fn channel_client(
        &self,
        channel_id: &str,
        opts: ContextOptions,
    ) -> SdkResult<Arc<dyn ChannelClient>> {
        self.ensure_open()?;
        self.ensure_channel(channel_id)?;
        let identity = self.resolve_identity(&opts)?;
        tracing::debug!(identity = %identity, channel = channel_id, "Created channel client context");
        Ok(Arc::new(ProfileChannelClient {
            channel_id: channel_id.to_string(),
            identity,
            events: self.events.clone(),
        }))
    }

    fn channel_context(
        &self,
        channel_id: &str,
        opts: ContextOptions,
    ) -> SdkResult<Arc<dyn ChannelContext>> {
        self.ensure_open()?;
        self.ensure_channel(channel_id)?;
        let identity = self.resolve_identity(&opts)?;
        Ok(Arc::new(ProfileChannelContext {
            channel_id: channel_id.to_string(),
            identity,
            profile: Arc::clone(&self.profile),
        }))
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.events.close();
            tracing::info!("Closed fabric sdk");
        }
    }
}

impl std::fmt::Debug for FabricSdk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FabricSdk")
            .field("network", &self.profile.name)
            .field("organizations", &self.profile.organizations.len())
            .field("channels", &self.profile.channels.len())
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish()
    }
}

/// Administrative client scoped to (organization, admin).
#[derive(Debug)]
pub struct ProfileResourceClient {
    identity: Identity,
    profile: Arc<NetworkProfile>,
}

impl ResourceClient for ProfileResourceClient {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn joined_channels(&self) -> Vec<String> {
        let Some(org) = self.profile.organizations.get(&self.identity.org) else {
            return Vec::new();
        };
        self.profile
            .channels
            .iter()
            .filter(|(_, channel)| org.peers.iter().any(|p| channel.peers.contains_key(p)))
            .map(|(id, _)| id.clone())
            .collect()
    }
}

/// Channel client scoped to (channel, user).
#[derive(Debug)]
pub struct ProfileChannelClient {
    channel_id: String,
    identity: Identity,
    events: EventHub,
}

impl ChannelClient for ProfileChannelClient {
    fn channel_id(&self) -> &str {
        &self.channel_id
    }

    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn register_chaincode_event(
        &self,
        chaincode_id: &str,
        event_filter: &str,
    ) -> SdkResult<(Registration, EventStream)> {
        self.events.register(&self.channel_id, chaincode_id, event_filter)
    }

    fn unregister_chaincode_event(&self, registration: Registration) {
        self.events.unregister(registration);
    }
}

/// Channel context scoped to (channel, user, organization).
#[derive(Debug)]
pub struct ProfileChannelContext {
    channel_id: String,
    identity: Identity,
    profile: Arc<NetworkProfile>,
}

impl ChannelContext for ProfileChannelContext {
    fn channel_id(&self) -> &str {
        &self.channel_id
    }

    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn timeout(&self, timeout_type: TimeoutType) -> Duration {
        self.profile.client.timeouts.get(timeout_type)
    }

    fn channel_service(&self) -> SdkResult<Arc<dyn ChannelService>> {
        Ok(Arc::new(ProfileChannelService {
            channel_id: self.channel_id.clone(),
            profile: Arc::clone(&self.profile),
        }))
    }
}

#[derive(Debug)]
struct ProfileChannelService {
    channel_id: String,
    profile: Arc<NetworkProfile>,
}

impl ChannelService for ProfileChannelService {
    fn config(&self) -> SdkResult<Arc<dyn ChannelConfig>> {
        Ok(Arc::new(ProfileChannelConfig {
            channel_id: self.channel_id.clone(),
            profile: Arc::clone(&self.profile),
        }))
    }
}

/// Channel configuration resolved from the channel's profile entry.
#[derive(Debug)]
struct ProfileChannelConfig {
    channel_id: String,
    profile: Arc<NetworkProfile>,
}

impl ProfileChannelConfig {
    fn snapshot(&self, channel: &ChannelProfile) -> ChannelCfg {
        ChannelCfg {
            channel_id: self.channel_id.clone(),
            msps: self.profile.channel_msp_ids(channel),
            orderers: self.profile.channel_orderer_addresses(channel),
        }
    }
}

#[async_trait]
impl ChannelConfig for ProfileChannelConfig {
    async fn query(&self, reqctx: &RequestContext) -> SdkResult<ChannelCfg> {
        reqctx
            .run(async {
                let channel = self
                    .profile
                    .channels
                    .get(&self.channel_id)
                    .ok_or_else(|| SdkError::UnknownChannel(self.channel_id.clone()))?;
                Ok(self.snapshot(channel))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::profile::{ChannelPeer, EndpointConfig, GrpcOptions, OrganizationConfig, UserConfig};
    use crate::sdk::new_request;

    fn profile() -> NetworkProfile {
        let mut profile = NetworkProfile {
            name: "first-network".into(),
            ..Default::default()
        };
        profile.client.organization = Some("Org1".into());

        let mut org1 = OrganizationConfig {
            mspid: "Org1MSP".into(),
            peers: vec!["peer0.org1.example.com".into()],
            ..Default::default()
        };
        org1.users.insert("Admin".into(), UserConfig::default());
        org1.users.insert("User1".into(), UserConfig::default());
        profile.organizations.insert("Org1".into(), org1);

        let mut org2 = OrganizationConfig {
            mspid: "Org2MSP".into(),
            peers: vec!["peer0.org2.example.com".into()],
            ..Default::default()
        };
        org2.users.insert("Admin".into(), UserConfig::default());
        profile.organizations.insert("Org2".into(), org2);

        for (name, port) in [("peer0.org1.example.com", 7051), ("peer0.org2.example.com", 9051)] {
            profile.peers.insert(
                name.into(),
                EndpointConfig {
                    url: format!("grpcs://localhost:{}", port),
                    grpc_options: GrpcOptions {
                        ssl_target_name_override: Some(name.into()),
                    },
                },
            );
        }
        profile.orderers.insert(
            "orderer.example.com".into(),
            EndpointConfig {
                url: "grpcs://localhost:7050".into(),
                grpc_options: GrpcOptions {
                    ssl_target_name_override: Some("orderer.example.com".into()),
                },
            },
        );

        let mut channel = ChannelProfile {
            orderers: vec!["orderer.example.com".into()],
            ..Default::default()
        };
        channel.peers.insert("peer0.org1.example.com".into(), ChannelPeer::default());
        profile.channels.insert("mychannel".into(), channel);
        profile
    }

    #[test]
    fn test_identity_uses_client_org_by_default() {
        let sdk = FabricSdk::new(profile());
        let identity = sdk.resolve_identity(&ContextOptions::user("User1")).unwrap();
        assert_eq!(identity.org, "Org1");
        assert_eq!(identity.msp_id, "Org1MSP");
    }

    #[test]
    fn test_unknown_user_rejected() {
        let sdk = FabricSdk::new(profile());
        let err = sdk
            .resource_client(ContextOptions::user("User1").with_org("Org2"))
            .err()
            .unwrap();
        assert!(matches!(err, SdkError::UnknownUser { .. }));
    }

    #[test]
    fn test_unknown_org_rejected() {
        let sdk = FabricSdk::new(profile());
        let err = sdk
            .resource_client(ContextOptions::user("Admin").with_org("Org7"))
            .err()
            .unwrap();
        assert!(matches!(err, SdkError::UnknownOrganization(org) if org == "Org7"));
    }

    #[test]
    fn test_no_default_org() {
        let mut p = profile();
        p.client.organization = None;
        let sdk = FabricSdk::new(p);
        assert!(matches!(
            sdk.channel_client("mychannel", ContextOptions::user("User1")).err(),
            Some(SdkError::NoOrganization)
        ));
    }

    #[test]
    fn test_unknown_channel_rejected() {
        let sdk = FabricSdk::new(profile());
        assert!(matches!(
            sdk.channel_client("otherchannel", ContextOptions::user("User1")).err(),
            Some(SdkError::UnknownChannel(_))
        ));
    }

    #[test]
    fn test_joined_channels() {
        let sdk = FabricSdk::new(profile());
        let rc1 = sdk
            .resource_client(ContextOptions::user("Admin").with_org("Org1"))
            .unwrap();
        assert_eq!(rc1.joined_channels(), vec!["mychannel".to_string()]);
        let rc2 = sdk
            .resource_client(ContextOptions::user("Admin").with_org("Org2"))
            .unwrap();
        assert!(rc2.joined_channels().is_empty());
    }

    #[tokio::test]
    async fn test_channel_config_query() {
        let sdk = FabricSdk::new(profile());
        let ctx = sdk
            .channel_context("mychannel", ContextOptions::user("Admin").with_org("Org1"))
            .unwrap();
        let cfg = ctx.channel_service().unwrap().config().unwrap();
        let (reqctx, _cancel) = new_request(ctx.as_ref(), TimeoutType::OrdererResponse);

        let snapshot = cfg.query(&reqctx).await.unwrap();
        assert_eq!(snapshot.channel_id, "mychannel");
        assert_eq!(snapshot.orderers(), ["orderer.example.com:7050".to_string()]);
        assert_eq!(snapshot.msps, vec!["Org1MSP".to_string()]);
    }

    #[tokio::test]
    async fn test_events_flow_through_channel_client() {
        let sdk = FabricSdk::new(profile());
        let cc = sdk
            .channel_client("mychannel", ContextOptions::user("User1"))
            .unwrap();
        let (_reg, mut rx) = cc.register_chaincode_event("example2", "move").unwrap();

        let delivery = sdk.event_hub().publish(&crate::sdk::ChaincodeEvent {
            tx_id: "abc".into(),
            channel_id: "mychannel".into(),
            chaincode_id: "example2".into(),
            event_name: "move".into(),
            payload: vec![1, 2, 3],
            block_number: 9,
            source_url: "peer0.org1.example.com:7051".into(),
        });
        assert_eq!(delivery.delivered, 1);
        assert_eq!(rx.recv().await.unwrap().tx_id, "abc");
    }

    #[test]
    fn test_closed_sdk_refuses_clients() {
        let sdk = FabricSdk::new(profile());
        sdk.close();
        assert!(matches!(
            sdk.resource_client(ContextOptions::user("Admin")).err(),
            Some(SdkError::Closed)
        ));
    }
}
