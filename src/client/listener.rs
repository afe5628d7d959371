//! Chaincode event consumption loop.

use crate::lifecycle::ShutdownSignal;
use crate::sdk::{ChaincodeEvent, EventStream};

/// Why a consumption loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Shutdown was signalled.
    Shutdown,
    /// The subscription was released and its buffer drained.
    StreamClosed,
}

/// Hand every event from `stream` to `on_event` until the stream ends or
/// `shutdown` fires. Returns the number of events handled.
pub async fn consume_events<F>(
    mut stream: EventStream,
    mut shutdown: ShutdownSignal,
    mut on_event: F,
) -> (usize, StopReason)
where
    F: FnMut(&ChaincodeEvent),
{
    let mut handled = 0;
    loop {
        tokio::select! {
            maybe_event = stream.recv() => match maybe_event {
                Some(event) => {
                    tracing::debug!(
                        tx_id = %event.tx_id,
                        event = %event.event_name,
                        block = event.block_number,
                        "Chaincode event received"
                    );
                    on_event(&event);
                    handled += 1;
                }
                None => return (handled, StopReason::StreamClosed),
            },
            _ = shutdown.wait() => return (handled, StopReason::Shutdown),
        }
    }
}
