//! Network SDK boundary.
//!
//! # Data Flow
//! ```text
//! NetworkProfile
//!     → Sdk (root handle, fabric.rs)
//!         → ResourceClient   (org + admin)
//!         → ChannelClient    (channel + user) → events.rs (EventHub)
//!         → ChannelContext   (channel + user + org)
//!             → ChannelService → ChannelConfig::query(RequestContext)
//! ```
//!
//! # Design Decisions
//! - Every client is created from a context naming one identity; the
//!   identity never changes for the life of the client
//! - Clients are shared behind `Arc<dyn Trait>` so callers can swap the
//!   backing implementation (tests use recording fakes)
//! - Every network request runs inside a [`RequestContext`]

pub mod context;
pub mod events;
pub mod fabric;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::resilience::TimeoutType;

pub use context::{CancelHandle, RequestContext};
pub use events::{Delivery, EventHub, EventStream};
pub use fabric::FabricSdk;
pub use types::{
    ChaincodeEvent, ChannelCfg, ContextOptions, Identity, Registration, SdkError, SdkResult,
};

/// Root handle to the network.
pub trait Sdk: Send + Sync {
    /// Administrative client for an organization's identity.
    fn resource_client(&self, opts: ContextOptions) -> SdkResult<Arc<dyn ResourceClient>>;

    /// Client for invoking and listening on one channel.
    fn channel_client(
        &self,
        channel_id: &str,
        opts: ContextOptions,
    ) -> SdkResult<Arc<dyn ChannelClient>>;

    /// Lower-level channel context, used for configuration queries.
    fn channel_context(
        &self,
        channel_id: &str,
        opts: ContextOptions,
    ) -> SdkResult<Arc<dyn ChannelContext>>;

    /// Release every resource held by the handle.
    fn close(&self);
}

/// Channel and chaincode administration.
pub trait ResourceClient: Send + Sync {
    fn identity(&self) -> &Identity;

    /// Channels the client's organization participates in.
    fn joined_channels(&self) -> Vec<String>;
}

/// Chaincode invocation and event subscription on one channel.
pub trait ChannelClient: Send + Sync {
    fn channel_id(&self) -> &str;

    fn identity(&self) -> &Identity;

    /// Subscribe to events of `chaincode_id` whose name matches `event_filter`.
    fn register_chaincode_event(
        &self,
        chaincode_id: &str,
        event_filter: &str,
    ) -> SdkResult<(Registration, EventStream)>;

    fn unregister_chaincode_event(&self, registration: Registration);
}

/// A channel scoped to an identity, with access to channel services.
pub trait ChannelContext: Send + Sync {
    fn channel_id(&self) -> &str;

    fn identity(&self) -> &Identity;

    /// Deadline length for a timeout category.
    fn timeout(&self, timeout_type: TimeoutType) -> Duration;

    fn channel_service(&self) -> SdkResult<Arc<dyn ChannelService>>;
}

/// Channel-level services.
pub trait ChannelService: Send + Sync {
    /// The channel's configuration object.
    fn config(&self) -> SdkResult<Arc<dyn ChannelConfig>>;
}

/// Queryable channel configuration.
#[async_trait]
pub trait ChannelConfig: Send + Sync {
    async fn query(&self, reqctx: &RequestContext) -> SdkResult<ChannelCfg>;
}

/// Open a request context on `ctx` for the given timeout category.
pub fn new_request(ctx: &dyn ChannelContext, timeout_type: TimeoutType) -> (RequestContext, CancelHandle) {
    RequestContext::new(timeout_type, ctx.timeout(timeout_type))
}
