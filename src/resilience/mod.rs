//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request against the network:
//!     → timeouts.rs (pick deadline for the timeout category)
//!     → sdk::context (request context enforces deadline + cancellation)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every network call has a deadline
//! - No retries: a failed step is reported to the caller as-is

pub mod timeouts;

pub use timeouts::{TimeoutConfig, TimeoutType};
