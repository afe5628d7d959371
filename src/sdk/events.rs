//! Chaincode event dispatch.
//!
//! # Responsibilities
//! - Track subscriptions keyed by registration id
//! - Route each incoming event to subscriptions whose channel, chaincode id
//!   and event-name filter match
//! - Release subscriptions on unregister or when the consumer goes away
//!
//! # Design Decisions
//! - Event names must match the filter in full; a filter that does not parse
//!   on its own is rejected before anchoring
//! - Each subscription has a bounded buffer; a full buffer drops the event
//!   for that consumer only
//! - Unregistering drops the sender, which ends the consumer's stream

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use regex::Regex;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::observability::metrics;
use crate::sdk::types::{ChaincodeEvent, Registration, SdkError, SdkResult};

/// Receiving side of a chaincode event subscription.
pub type EventStream = mpsc::Receiver<ChaincodeEvent>;

#[derive(Debug)]
struct Subscription {
    channel_id: String,
    chaincode_id: String,
    filter: Regex,
    tx: mpsc::Sender<ChaincodeEvent>,
}

impl Subscription {
    fn matches(&self, event: &ChaincodeEvent) -> bool {
        self.channel_id == event.channel_id
            && self.chaincode_id == event.chaincode_id
            && self.filter.is_match(&event.event_name)
    }
}

/// Compile `event_filter` so it only matches whole event names.
///
/// The raw filter is parsed first so that it cannot close the wrapping group
/// (`a)|(b`) and escape the anchors.
fn anchored_filter(event_filter: &str) -> SdkResult<Regex> {
    let invalid = |source: regex::Error| SdkError::InvalidEventFilter {
        filter: event_filter.to_string(),
        source,
    };
    Regex::new(event_filter).map_err(invalid)?;
    Regex::new(&format!(r"\A(?:{})\z", event_filter)).map_err(invalid)
}

/// Outcome of publishing one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Subscriptions that received the event.
    pub delivered: usize,
    /// Subscriptions whose buffer was full.
    pub dropped: usize,
}

/// Thread-safe registry of chaincode event subscriptions.
#[derive(Debug, Clone)]
pub struct EventHub {
    subscriptions: Arc<DashMap<Uuid, Subscription>>,
    buffer_size: usize,
    closed: Arc<AtomicBool>,
}

impl EventHub {
    /// Create a hub whose subscriptions buffer up to `buffer_size` events.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            subscriptions: Arc::new(DashMap::new()),
            buffer_size: buffer_size.max(1),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Subscribe to events of `chaincode_id` on `channel_id` whose name
    /// matches `event_filter` in full.
    pub fn register(
        &self,
        channel_id: &str,
        chaincode_id: &str,
        event_filter: &str,
    ) -> SdkResult<(Registration, EventStream)> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(SdkError::Closed);
        }
        if chaincode_id.is_empty() {
            return Err(SdkError::EmptyChaincodeId);
        }
        let filter = anchored_filter(event_filter)?;

        let (tx, rx) = mpsc::channel(self.buffer_size);
        let registration = Registration::new();
        self.subscriptions.insert(
            registration.id(),
            Subscription {
                channel_id: channel_id.to_string(),
                chaincode_id: chaincode_id.to_string(),
                filter,
                tx,
            },
        );
        // A close that raced the check above has already cleared the map.
        if self.closed.load(Ordering::SeqCst) {
            self.subscriptions.remove(&registration.id());
            return Err(SdkError::Closed);
        }
        metrics::record_active_registrations(self.subscriptions.len());

        tracing::debug!(
            registration = %registration.id(),
            channel = channel_id,
            chaincode = chaincode_id,
            filter = event_filter,
            "Registered chaincode event"
        );
        Ok((registration, rx))
    }

    /// Release a subscription. Its stream ends once buffered events drain.
    pub fn unregister(&self, registration: Registration) {
        if self.subscriptions.remove(&registration.id()).is_some() {
            tracing::debug!(registration = %registration.id(), "Unregistered chaincode event");
        }
        metrics::record_active_registrations(self.subscriptions.len());
    }

    /// Deliver an event to every matching subscription.
    pub fn publish(&self, event: &ChaincodeEvent) -> Delivery {
        let mut delivery = Delivery::default();
        let mut gone = Vec::new();

        for entry in self.subscriptions.iter() {
            if !entry.matches(event) {
                continue;
            }
            match entry.tx.try_send(event.clone()) {
                Ok(()) => delivery.delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(
                        registration = %entry.key(),
                        event = %event.event_name,
                        tx_id = %event.tx_id,
                        "Event buffer full, dropping event for consumer"
                    );
                    delivery.dropped += 1;
                }
                Err(mpsc::error::TrySendError::Closed(_)) => gone.push(*entry.key()),
            }
        }

        // Shards stay read-locked while iterating; remove afterwards.
        for id in gone {
            self.subscriptions.remove(&id);
            tracing::debug!(registration = %id, "Consumer gone, subscription removed");
        }

        metrics::record_event_delivery(delivery.delivered, delivery.dropped);
        delivery
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Drop every subscription and refuse new ones.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.subscriptions.clear();
        metrics::record_active_registrations(0);
    }
}
