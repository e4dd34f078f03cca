//! Topology discovery subsystem.
//!
//! # Data Flow
//! ```text
//! Trigger (interval tick, ad-hoc notify, or client construction):
//!     → sniffer.rs (GET node-info endpoint, first reachable node wins)
//!     → nodes.rs (parse per-node published HTTP addresses)
//!     → pool.replace (atomic swap, liveness carried over by URL)
//! ```
//!
//! # Design Decisions
//! - Sniffing is best-effort: a failed round leaves the pool untouched
//!   and never crashes the background task
//! - Discovered addresses go through configurable scheme/port rewrites
//!   before they become connections
//! - Nodes without a published HTTP address are skipped

pub mod nodes;
pub mod sniffer;

pub use nodes::NodesInfo;
pub use sniffer::Sniffer;
