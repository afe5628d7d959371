//! Network client harness.
//!
//! # Data Flow
//! ```text
//! connection profile path + org/admin/user
//!     → handle.rs (FabricSdk → resource client + channel client)
//!     → register_chaincode_event (channel client → EventStream)
//!     → get_channel_config (channel context → config query → orderer.rs check)
//! ```
//!
//! # Error Handling
//! - Every stage returns a `ClientError` naming the failed stage
//! - The caller decides whether a failure is fatal

pub mod handle;
pub mod listener;
pub mod orderer;
pub mod types;

pub use handle::{new_sdk_clients, query_channel_config, Client};
pub use listener::{consume_events, StopReason};
pub use orderer::{contains_orderer, ensure_orderer, EXPECTED_ORDERER};
pub use types::{ClientError, ClientResult};
