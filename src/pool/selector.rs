//! Connection selection strategies.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::pool::connection::Connection;

/// Strategy for picking the next connection to try.
pub trait Selector: Send + Sync + fmt::Debug {
    /// Pick a connection from the current list. Returns `None` only
    /// when the list is empty.
    fn next(&self, connections: &[Arc<Connection>]) -> Option<Arc<Connection>>;
}

/// Round-robin selector.
/// Stores an internal counter to rotate through connections.
#[derive(Debug, Default)]
pub struct RoundRobin {
    counter: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Selector for RoundRobin {
    fn next(&self, connections: &[Arc<Connection>]) -> Option<Arc<Connection>> {
        if connections.is_empty() {
            return None;
        }

        let start = self.counter.fetch_add(1, Ordering::Relaxed);
        let len = connections.len();

        for i in 0..len {
            let candidate = &connections[(start + i) % len];
            if candidate.is_alive() {
                return Some(candidate.clone());
            }
        }

        // Everything is dead. Hand out the next connection anyway so a
        // request can still reach the cluster and revive a node.
        Some(connections[start % len].clone())
    }
}
