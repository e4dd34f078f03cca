//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! perform_request(options):
//!     → pool.select (round-robin, alive preferred)
//!     → dispatch.rs (build URL + query + headers + auth + body, send)
//!     → Classify outcome:
//!         connection failure → mark dead → resilience policy → retry or give up
//!         ignored/success status → response.rs (decode on demand)
//!         error status → structured error, retried only when transient
//!     → mark alive on any completed HTTP exchange
//!     → observability hooks (request/response events, deprecation warnings)
//! ```
//!
//! # Design Decisions
//! - One deadline spans all attempts and backoff sleeps
//! - Decode failures are surfaced distinctly; retrying cannot fix a
//!   schema mismatch
//! - The body is buffered per call so retries can resend it

pub mod decode;
pub mod dispatch;
pub mod request;
pub mod response;

pub use decode::{Decoder, LenientJson, StrictJson};
pub use dispatch::Transport;
pub use request::{Body, RequestOptions};
pub use response::Response;
