//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! connection profile (YAML/JSON/TOML)       harness settings (TOML)
//!     → loader.rs (parse & deserialize)         → loader.rs
//!     → validation.rs (semantic checks)         → validation.rs
//!     → NetworkProfile (immutable)              → HarnessConfig
//!     → sdk::FabricSdk                          → client::Client
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod profile;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_profile, ConfigError};
pub use profile::NetworkProfile;
pub use schema::{ChaincodeSettings, HarnessConfig, NetworkSettings, ObservabilityConfig};
pub use validation::ValidationError;
