//! Request contexts: a deadline plus a cancellation signal.
//!
//! A request context is opened for one timeout category. Its paired
//! [`CancelHandle`] cancels the request explicitly or when dropped, so the
//! context is always released when the caller's scope ends.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::resilience::TimeoutType;
use crate::sdk::types::{SdkError, SdkResult};

/// Deadline used when `now + timeout` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Deadline and cancellation state for a single request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    timeout_type: TimeoutType,
    timeout: Duration,
    deadline: Instant,
    cancelled: watch::Receiver<bool>,
}

/// Releases a [`RequestContext`]. Cancels on drop.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Cancel the paired request.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Drop for CancelHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl RequestContext {
    /// Open a context whose deadline is `timeout` from now, capped at
    /// roughly thirty years.
    pub fn new(timeout_type: TimeoutType, timeout: Duration) -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let now = Instant::now();
        let deadline = now
            .checked_add(timeout.min(FAR_FUTURE))
            .unwrap_or(now);
        let ctx = Self {
            timeout_type,
            timeout,
            deadline,
            cancelled: rx,
        };
        (ctx, CancelHandle { tx })
    }

    pub fn timeout_type(&self) -> TimeoutType {
        self.timeout_type
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left before the deadline.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }

    /// Drive `fut` to completion within this context.
    ///
    /// Fails with [`SdkError::Timeout`] once the deadline passes and with
    /// [`SdkError::Cancelled`] when the cancel handle fires first.
    pub async fn run<F, T>(&self, fut: F) -> SdkResult<T>
    where
        F: Future<Output = SdkResult<T>>,
    {
        if self.is_cancelled() {
            return Err(SdkError::Cancelled);
        }

        let mut cancelled = self.cancelled.clone();
        tokio::select! {
            res = tokio::time::timeout_at(self.deadline, fut) => match res {
                Ok(inner) => inner,
                Err(_) => Err(SdkError::Timeout {
                    timeout_type: self.timeout_type,
                    after: self.timeout,
                }),
            },
            _ = cancelled.wait_for(|c| *c) => Err(SdkError::Cancelled),
        }
    }
}
