//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load settings → Apply overrides → Validate → Build client handle
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Flag latched → Event consumers stop → Client closed → Exit
//!
//! Signals (signals.rs):
//!     SIGINT → Trigger shutdown
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownSignal};
