//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! TOML file → loader.rs (read + parse)
//!     → validation.rs (semantic checks, all errors collected)
//!     → ClientConfig accepted by Client::new
//! ```
//!
//! # Design Decisions
//! - Serde handles syntax; validation.rs handles semantics
//! - Every section has its own struct with serde defaults, so partial
//!   config files work
//! - Validation returns all violations, not just the first

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AuthConfig, BasicAuth, ClientConfig, DecoderConfig, HealthCheckConfig, RetryConfig,
    SnifferConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
