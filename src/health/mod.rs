//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Active probes (active.rs):
//!     Periodic timer
//!     → Probe every pooled connection concurrently
//!     → pool.mark_alive / pool.mark_dead
//!
//! Passive liveness (transport/dispatch.rs):
//!     Request outcome observed
//!     → Success or any HTTP exchange → mark_alive
//!     → Connection-level failure → mark_dead
//! ```
//!
//! # Design Decisions
//! - A probe asks "can I reach this node at all", so any HTTP response
//!   counts as alive; request-level error statuses are the
//!   dispatcher's business, judged against a stricter bar
//! - Probes fan out concurrently; one slow node never delays marking
//!   the others
//! - With active checks disabled, passive liveness alone keeps the
//!   pool honest

pub mod active;

pub use active::HealthChecker;
