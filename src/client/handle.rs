//! Client handle: one network context, one admin, one user, one channel.
//!
//! # Responsibilities
//! - Build the SDK handle from a connection profile
//! - Derive the resource client (org + admin) and channel client (channel + user)
//! - Forward chaincode event registration to the channel client
//! - Query the channel configuration and check the expected orderer

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::client::orderer::{ensure_orderer, EXPECTED_ORDERER};
use crate::client::types::{ClientError, ClientResult};
use crate::config::schema::{HarnessConfig, DEFAULT_CHANNEL_ID};
use crate::config::ChaincodeSettings;
use crate::observability::metrics;
use crate::resilience::TimeoutType;
use crate::sdk::{
    new_request, ChannelCfg, ChannelClient, ChannelConfig, ChannelContext, ContextOptions,
    EventStream, FabricSdk, Registration, ResourceClient, Sdk, SdkResult,
};

/// Handle bundling the SDK root and the two derived clients.
///
/// Organization, identities and channel are fixed at construction.
pub struct Client {
    config_path: PathBuf,
    org_name: String,
    org_admin: String,
    org_user: String,

    channel_id: String,
    chaincode_id: String,
    chaincode_path: String,
    chaincode_root: Option<PathBuf>,

    sdk: Arc<dyn Sdk>,
    rc: Arc<dyn ResourceClient>,
    cc: Arc<dyn ChannelClient>,
}

impl Client {
    /// Build a handle from the connection profile at `config_path`, with the
    /// default channel and chaincode.
    pub fn new(
        config_path: impl AsRef<Path>,
        org: &str,
        admin: &str,
        user: &str,
    ) -> ClientResult<Self> {
        let config_path = config_path.as_ref();
        let sdk = FabricSdk::from_file(config_path).map_err(|e| {
            metrics::record_client_init("sdk", false);
            ClientError::SdkInit(e)
        })?;
        metrics::record_client_init("sdk", true);
        tracing::info!(path = %config_path.display(), "Initialized fabric sdk");

        Self::with_sdk(
            config_path,
            Arc::new(sdk),
            org,
            admin,
            user,
            DEFAULT_CHANNEL_ID,
            &ChaincodeSettings::default(),
        )
    }

    /// Build a handle from harness settings.
    pub fn from_config(config: &HarnessConfig) -> ClientResult<Self> {
        let path = &config.network.profile_path;
        let sdk = FabricSdk::from_file(path).map_err(|e| {
            metrics::record_client_init("sdk", false);
            ClientError::SdkInit(e)
        })?;
        metrics::record_client_init("sdk", true);
        tracing::info!(path = %path.display(), "Initialized fabric sdk");

        Self::with_sdk(
            path,
            Arc::new(sdk),
            &config.network.org,
            &config.network.admin,
            &config.network.user,
            &config.network.channel_id,
            &config.chaincode,
        )
    }

    /// Derive both clients from an existing SDK handle.
    pub fn with_sdk(
        config_path: impl AsRef<Path>,
        sdk: Arc<dyn Sdk>,
        org: &str,
        admin: &str,
        user: &str,
        channel_id: &str,
        chaincode: &ChaincodeSettings,
    ) -> ClientResult<Self> {
        let (rc, cc) = new_sdk_clients(sdk.as_ref(), channel_id, org, admin, user)?;

        Ok(Self {
            config_path: config_path.as_ref().to_path_buf(),
            org_name: org.to_string(),
            org_admin: admin.to_string(),
            org_user: user.to_string(),
            channel_id: channel_id.to_string(),
            chaincode_id: chaincode.id.clone(),
            chaincode_path: chaincode.path.clone(),
            chaincode_root: chaincode.resolved_root(),
            sdk,
            rc,
            cc,
        })
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn org_name(&self) -> &str {
        &self.org_name
    }

    pub fn org_admin(&self) -> &str {
        &self.org_admin
    }

    pub fn org_user(&self) -> &str {
        &self.org_user
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn chaincode_id(&self) -> &str {
        &self.chaincode_id
    }

    /// Chaincode source path relative to the chaincode root.
    pub fn chaincode_path(&self) -> &str {
        &self.chaincode_path
    }

    /// Chaincode source root (`$GOPATH` unless configured).
    pub fn chaincode_root(&self) -> Option<&Path> {
        self.chaincode_root.as_deref()
    }

    pub fn resource_client(&self) -> &Arc<dyn ResourceClient> {
        &self.rc
    }

    pub fn channel_client(&self) -> &Arc<dyn ChannelClient> {
        &self.cc
    }

    /// Subscribe to chaincode events through the channel client.
    pub fn register_chaincode_event(
        &self,
        chaincode_id: &str,
        event_name: &str,
    ) -> SdkResult<(Registration, EventStream)> {
        self.cc.register_chaincode_event(chaincode_id, event_name)
    }

    /// Release a subscription made with [`Client::register_chaincode_event`].
    pub fn unregister_chaincode_event(&self, registration: Registration) {
        self.cc.unregister_chaincode_event(registration)
    }

    /// Query the channel configuration as the admin and check that the
    /// expected orderer serves the channel.
    ///
    /// `peer` is accepted but not used.
    pub async fn get_channel_config(&self, channel_id: &str, peer: &str) -> ClientResult<ChannelCfg> {
        tracing::debug!(channel = channel_id, peer, "Querying channel config");

        if channel_id != self.channel_id {
            return Err(ClientError::ChannelMismatch {
                bound: self.channel_id.clone(),
                requested: channel_id.to_string(),
            });
        }

        let opts = ContextOptions::user(&self.org_admin).with_org(&self.org_name);
        let channel_ctx = self
            .sdk
            .channel_context(&self.channel_id, opts)
            .map_err(ClientError::ChannelContext)?;

        let cfg = channel_ctx
            .channel_service()
            .and_then(|cs| cs.config())
            .map_err(ClientError::ChannelConfig)?;

        query_channel_config(channel_ctx.as_ref(), cfg.as_ref()).await
    }

    /// Release the SDK handle and every subscription it feeds.
    pub fn close(&self) {
        self.sdk.close();
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config_path", &self.config_path)
            .field("org", &self.org_name)
            .field("admin", &self.org_admin)
            .field("user", &self.org_user)
            .field("channel_id", &self.channel_id)
            .field("chaincode_id", &self.chaincode_id)
            .finish()
    }
}

/// Create the resource client (org + admin) and channel client (channel + user).
pub fn new_sdk_clients(
    sdk: &dyn Sdk,
    channel_id: &str,
    org: &str,
    admin: &str,
    user: &str,
) -> ClientResult<(Arc<dyn ResourceClient>, Arc<dyn ChannelClient>)> {
    let rc = sdk
        .resource_client(ContextOptions::user(admin).with_org(org))
        .map_err(|e| {
            metrics::record_client_init("resource_client", false);
            ClientError::ResourceClient(e)
        })?;
    metrics::record_client_init("resource_client", true);
    tracing::info!(org, admin, "Initialized resource client");

    let cc = sdk
        .channel_client(channel_id, ContextOptions::user(user))
        .map_err(|e| {
            metrics::record_client_init("channel_client", false);
            ClientError::ChannelClient(e)
        })?;
    metrics::record_client_init("channel_client", true);
    tracing::info!(channel = channel_id, user, "Initialized channel client");

    Ok((rc, cc))
}

/// Query `cfg` under an orderer-response deadline and check the result for
/// [`EXPECTED_ORDERER`].
pub async fn query_channel_config(
    channel_ctx: &dyn ChannelContext,
    cfg: &dyn ChannelConfig,
) -> ClientResult<ChannelCfg> {
    let started = Instant::now();
    let (reqctx, cancel) = new_request(channel_ctx, TimeoutType::OrdererResponse);

    let result = cfg.query(&reqctx).await;
    cancel.cancel();

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            metrics::record_config_query(false, started.elapsed());
            tracing::error!(channel = channel_ctx.channel_id(), error = %e, "Channel config query failed");
            return Err(ClientError::Query(e));
        }
    };

    let checked = ensure_orderer(response.orderers(), EXPECTED_ORDERER);
    metrics::record_config_query(checked.is_ok(), started.elapsed());
    if let Err(e) = checked {
        tracing::error!(channel = channel_ctx.channel_id(), error = %e, "Expected orderer missing");
        return Err(e);
    }

    tracing::info!(
        channel = channel_ctx.channel_id(),
        orderers = ?response.orderers(),
        "Channel config verified"
    );
    Ok(response)
}
