//! Shutdown coordination.
//!
//! The flag is latched: a [`ShutdownSignal`] taken after the trigger still
//! observes it, so an event listener started late stops immediately.

use tokio::sync::watch;

/// Latching shutdown flag shared by the signal handler and event listeners.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

/// Listener side of a [`Shutdown`].
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Latch the flag. Repeated calls are no-ops.
    pub fn trigger(&self) {
        if !self.tx.send_replace(true) {
            tracing::info!(listeners = self.tx.receiver_count(), "Shutdown triggered");
        }
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once shutdown has been triggered.
    pub async fn wait(&mut self) {
        // The sender lives as long as any `Shutdown` clone; if every clone is
        // gone nobody can trigger, so stay pending.
        let sender_gone = self.rx.wait_for(|triggered| *triggered).await.is_err();
        if sender_gone {
            std::future::pending::<()>().await;
        }
    }
}
