//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check seed URLs parse and use an http(s) scheme
//! - Validate value ranges (intervals > 0, attempts >= 1)
//! - Reject ambiguous auth (basic and api_key together)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before the config is accepted into the client

use thiserror::Error;
use url::Url;

use crate::config::schema::ClientConfig;

/// A single semantic violation in a [`ClientConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no seed nodes configured")]
    NoSeedNodes,

    #[error("seed node {0:?} is not a valid URL")]
    InvalidNodeUrl(String),

    #[error("seed node {0:?} must use the http or https scheme")]
    UnsupportedScheme(String),

    #[error("retries.max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("sniff.interval_secs must be nonzero when sniffing is enabled")]
    ZeroSniffInterval,

    #[error("health_check.interval_secs must be nonzero when health checking is enabled")]
    ZeroHealthInterval,

    #[error("timeouts.connect_secs must be nonzero")]
    ZeroConnectTimeout,

    #[error("auth.basic and auth.api_key are mutually exclusive")]
    AmbiguousAuth,
}

/// Validate a configuration, collecting every violation.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.nodes.is_empty() {
        errors.push(ValidationError::NoSeedNodes);
    }
    for node in &config.nodes {
        match Url::parse(node) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(_) => errors.push(ValidationError::UnsupportedScheme(node.clone())),
            Err(_) => errors.push(ValidationError::InvalidNodeUrl(node.clone())),
        }
    }

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::ZeroAttempts);
    }
    if config.sniff.enabled && config.sniff.interval_secs == 0 {
        errors.push(ValidationError::ZeroSniffInterval);
    }
    if config.health_check.enabled && config.health_check.interval_secs == 0 {
        errors.push(ValidationError::ZeroHealthInterval);
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroConnectTimeout);
    }
    if config.auth.basic.is_some() && config.auth.api_key.is_some() {
        errors.push(ValidationError::AmbiguousAuth);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
