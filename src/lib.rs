//! shoal: failover-aware HTTP transport for search clusters
//!
//! A client-side transport for Elasticsearch/OpenSearch-compatible
//! clusters: it maintains a pool of node connections, keeps the pool
//! fresh via topology discovery (sniffing) and accurate via periodic
//! health probes, and dispatches every request with automatic failover
//! and retry/backoff. Per-endpoint request builders live outside this
//! crate; they consume exactly one capability:
//! [`Client::perform_request`].
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌──────────────────────────────────────────────────┐
//!                   │                     CLIENT                       │
//!                   │                                                  │
//!   perform_request │  ┌───────────┐     ┌────────────┐   ┌──────────┐ │
//!   ────────────────┼─▶│ transport │────▶│    pool    │──▶│connection│─┼──▶ Node
//!                   │  │ dispatch  │     │ round-robin│   │ liveness │ │
//!                   │  └─────┬─────┘     └─────▲──────┘   └──────────┘ │
//!                   │        │                 │                       │
//!                   │        │ retry/backoff   │ replace / mark        │
//!                   │  ┌─────▼─────┐     ┌─────┴─────┐   ┌──────────┐  │
//!                   │  │resilience │     │   sniff   │   │  health  │  │
//!                   │  │  policy   │     │ discovery │   │  probes  │  │
//!                   │  └───────────┘     └───────────┘   └──────────┘  │
//!                   │                                                  │
//!                   │  ┌────────────────────────────────────────────┐  │
//!                   │  │           Cross-Cutting Concerns           │  │
//!                   │  │  ┌────────┐ ┌─────────────┐ ┌───────────┐  │  │
//!                   │  │  │ config │ │observability│ │ lifecycle │  │  │
//!                   │  │  └────────┘ └─────────────┘ └───────────┘  │  │
//!                   │  └────────────────────────────────────────────┘  │
//!                   └──────────────────────────────────────────────────┘
//! ```
//!
//! The sniffer and health checker run as background tasks spawned at
//! client construction and joined on [`Client::close`]. The connection
//! list is the only shared mutable structure; it is swapped atomically
//! and never mutated in place, so request dispatch never observes a
//! torn node list.

// Core subsystems
pub mod config;
pub mod error;
pub mod pool;
pub mod sniff;
pub mod transport;

// Traffic management
pub mod health;
pub mod resilience;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

mod client;

pub use client::{Client, ClientParts};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use observability::hooks::{RequestEvent, RequestObserver, ResponseEvent};
pub use resilience::retry::{BackoffRetrier, Retrier};
pub use transport::decode::{Decoder, LenientJson, StrictJson};
pub use transport::request::{Body, RequestOptions};
pub use transport::response::Response;

/// Re-exported so callers can name request methods without depending on
/// reqwest directly.
pub use reqwest::Method;
