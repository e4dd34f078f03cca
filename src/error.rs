//! Error taxonomy for the transport.
//!
//! # Design Decisions
//! - Connection-level failures and server error statuses are distinct
//!   variants so the retry policy can treat them differently
//! - Server errors carry the raw response payload; callers branch on
//!   status (404 vs 409 vs 400) without re-fetching
//! - Exhaustion wraps the last underlying cause and the attempt count
//! - Decode failures are never conflated with transport failures

use bytes::Bytes;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by [`crate::Client::perform_request`] and client
/// construction.
#[derive(Debug, Error)]
pub enum Error {
    /// The HTTP exchange could not be established or completed (DNS,
    /// refused, reset, timeout). Always retryable; marks the node dead.
    #[error("connection to {url} failed: {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The node answered with a status outside the success range and
    /// outside the caller's ignore set.
    #[error("node {url} returned HTTP {status}")]
    Server { status: u16, url: String, body: Bytes },

    /// A response body was received but could not be deserialized.
    #[error("failed to decode response body: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },

    /// Every retry attempt was consumed without success.
    #[error("giving up after {attempts} attempt(s): {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<Error>,
    },

    /// The pool holds no connections at all.
    #[error("connection pool is empty")]
    NoConnections,

    /// The caller's deadline elapsed before the request (including
    /// backoff delays) completed.
    #[error("request deadline exceeded")]
    DeadlineExceeded,

    /// A request URL could not be built from the node base and path.
    #[error("invalid request URL: {source}")]
    Url {
        #[from]
        source: url::ParseError,
    },

    /// Invalid or unusable configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status attached to this error, looking through exhaustion
    /// wrappers.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Server { status, .. } => Some(*status),
            Error::RetriesExhausted { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Server-supplied error payload, if any.
    pub fn body(&self) -> Option<&Bytes> {
        match self {
            Error::Server { body, .. } => Some(body),
            Error::RetriesExhausted { source, .. } => source.body(),
            _ => None,
        }
    }

    /// True for failures of the HTTP exchange itself, as opposed to an
    /// error status from a reachable node.
    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection { .. })
    }

    /// Attempt count for exhausted requests.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Error::RetriesExhausted { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }
}
