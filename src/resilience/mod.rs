//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request attempt fails:
//!     → retry.rs (is the failure retryable? is there attempt budget left?)
//!     → backoff.rs (compute jittered exponential delay)
//!     → transport sleeps (bounded by the caller's deadline) and retries
//! ```
//!
//! # Design Decisions
//! - Connection-level failures are always retryable; error statuses
//!   only when configured transient; 4xx never
//! - Jittered backoff prevents synchronized retry storms
//! - The policy is a trait so callers can swap it per request

pub mod backoff;
pub mod retry;

pub use backoff::backoff_delay;
pub use retry::{BackoffRetrier, Retrier};
