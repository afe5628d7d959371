//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use fabric_harness::resilience::TimeoutType;
use fabric_harness::sdk::{
    ChannelCfg, ChannelClient, ChannelConfig, ChannelContext, ChannelService, ContextOptions,
    EventHub, EventStream, Identity, Registration, RequestContext, ResourceClient, Sdk, SdkError,
    SdkResult,
};

/// Connection profile for a one-org sample network.
pub const SAMPLE_PROFILE: &str = r#"
name: first-network
version: "1.0.0"
client:
  organization: Org1
  timeouts:
    ordererResponseSecs: 5
organizations:
  Org1:
    mspid: Org1MSP
    peers:
      - peer0.org1.example.com
    users:
      Admin:
        cert: crypto/org1/admin/cert.pem
      User1: {}
orderers:
  orderer.example.com:
    url: grpcs://localhost:7050
    grpcOptions:
      ssl-target-name-override: orderer.example.com
peers:
  peer0.org1.example.com:
    url: grpcs://localhost:7051
    grpcOptions:
      ssl-target-name-override: peer0.org1.example.com
channels:
  mychannel:
    orderers:
      - orderer.example.com
    peers:
      peer0.org1.example.com:
        endorsingPeer: true
        eventSource: true
"#;

/// Write `content` to a temporary file with the given suffix.
pub fn write_profile(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

/// Calls observed by [`RecordingSdk`].
#[derive(Debug, Default, Clone)]
pub struct Calls {
    pub resource: Vec<ContextOptions>,
    pub channel: Vec<(String, ContextOptions)>,
    pub context: Vec<(String, ContextOptions)>,
    pub closed: bool,
}

/// Fake SDK that records how clients are requested.
#[derive(Clone)]
pub struct RecordingSdk {
    pub calls: Arc<Mutex<Calls>>,
    pub orderers: Vec<String>,
    pub fail_resource: bool,
    pub fail_channel: bool,
    pub query_delay: Option<Duration>,
    pub events: EventHub,
    /// Every request context handed to a config query.
    pub requests: Arc<Mutex<Vec<RequestContext>>>,
}

impl RecordingSdk {
    pub fn new(orderers: &[&str]) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Calls::default())),
            orderers: orderers.iter().map(|o| o.to_string()).collect(),
            fail_resource: false,
            fail_channel: false,
            query_delay: None,
            events: EventHub::new(8),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Calls {
        self.calls.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<RequestContext> {
        self.requests.lock().unwrap().clone()
    }
}

fn identity(opts: &ContextOptions) -> Identity {
    let org = opts.org.clone().unwrap_or_else(|| "Org1".to_string());
    Identity {
        msp_id: format!("{}MSP", org),
        org,
        user: opts.user.clone(),
    }
}

impl Sdk for RecordingSdk {
    fn resource_client(&self, opts: ContextOptions) -> SdkResult<Arc<dyn ResourceClient>> {
        self.calls.lock().unwrap().resource.push(opts.clone());
        if self.fail_resource {
            return Err(SdkError::UnknownOrganization(opts.org.unwrap_or_default()));
        }
        Ok(Arc::new(FakeResourceClient {
            identity: identity(&opts),
        }))
    }

    fn channel_client(
        &self,
        channel_id: &str,
        opts: ContextOptions,
    ) -> SdkResult<Arc<dyn ChannelClient>> {
        self.calls
            .lock()
            .unwrap()
            .channel
            .push((channel_id.to_string(), opts.clone()));
        if self.fail_channel {
            return Err(SdkError::UnknownChannel(channel_id.to_string()));
        }
        Ok(Arc::new(FakeChannelClient {
            channel_id: channel_id.to_string(),
            identity: identity(&opts),
            events: self.events.clone(),
        }))
    }

    fn channel_context(
        &self,
        channel_id: &str,
        opts: ContextOptions,
    ) -> SdkResult<Arc<dyn ChannelContext>> {
        self.calls
            .lock()
            .unwrap()
            .context
            .push((channel_id.to_string(), opts.clone()));
        Ok(Arc::new(FakeChannelContext {
            channel_id: channel_id.to_string(),
            identity: identity(&opts),
            orderers: self.orderers.clone(),
            query_delay: self.query_delay,
            requests: self.requests.clone(),
        }))
    }

    fn close(&self) {
        self.calls.lock().unwrap().closed = true;
        self.events.close();
    }
}

struct FakeResourceClient {
    identity: Identity,
}

impl ResourceClient for FakeResourceClient {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn joined_channels(&self) -> Vec<String> {
        Vec::new()
    }
}

struct FakeChannelClient {
    channel_id: String,
    identity: Identity,
    events: EventHub,
}

impl ChannelClient for FakeChannelClient {
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
        self.events.unregister(registration)
    }
}

#[derive(Clone)]
struct FakeChannelContext {
    channel_id: String,
    identity: Identity,
    orderers: Vec<String>,
    query_delay: Option<Duration>,
    requests: Arc<Mutex<Vec<RequestContext>>>,
}

impl ChannelContext for FakeChannelContext {
    fn channel_id(&self) -> &str {
        &self.channel_id
    }

    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn timeout(&self, _timeout_type: TimeoutType) -> Duration {
        Duration::from_millis(50)
    }

    fn channel_service(&self) -> SdkResult<Arc<dyn ChannelService>> {
        Ok(Arc::new(self.clone()))
    }
}

impl ChannelService for FakeChannelContext {
    fn config(&self) -> SdkResult<Arc<dyn ChannelConfig>> {
        Ok(Arc::new(self.clone()))
    }
}

#[async_trait]
impl ChannelConfig for FakeChannelContext {
    async fn query(&self, reqctx: &RequestContext) -> SdkResult<ChannelCfg> {
        self.requests.lock().unwrap().push(reqctx.clone());
        let delay = self.query_delay;
        reqctx
            .run(async move {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(ChannelCfg {
                    channel_id: self.channel_id.clone(),
                    msps: vec![self.identity.msp_id.clone()],
                    orderers: self.orderers.clone(),
                })
            })
            .await
    }
}
