//! Connection pool subsystem.
//!
//! # Data Flow
//! ```text
//! Request dispatch:
//!     → pool.rs (load current list snapshot)
//!     → selector.rs (round-robin over alive connections,
//!       full-list fallback when everything is dead)
//!     → connection.rs (liveness flips from request outcomes)
//!
//! Background updates:
//!     sniff  → pool.replace (atomic whole-list swap)
//!     health → connection.mark_alive / mark_dead
//! ```
//!
//! # Design Decisions
//! - The list is swapped atomically, never mutated element-by-element;
//!   concurrent selection always sees a complete old or new list
//! - Shared URLs survive a replace with their liveness intact because
//!   the existing `Arc<Connection>` is carried over
//! - A pool whose connections are all dead still hands out connections
//!   so a successful request can revive a node

pub mod connection;
pub mod pool;
pub mod selector;

pub use connection::Connection;
pub use pool::ConnectionPool;
pub use selector::{RoundRobin, Selector};
