//! A single cluster node endpoint with liveness state.
//!
//! # Responsibilities
//! - Hold the node's base URL
//! - Track alive/dead state, when the node died, and how often it
//!   has failed
//!
//! State flips come from three places: the health checker's probes,
//! the dispatcher's request outcomes, and nowhere else. Connections
//! are owned by the pool as `Arc<Connection>`; callers hold a clone
//! only for the duration of one request attempt.

use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use url::Url;

const STATE_ALIVE: u8 = 0;
const STATE_DEAD: u8 = 1;

/// One candidate node endpoint.
#[derive(Debug)]
pub struct Connection {
    /// Base URL, normalized to end with a trailing slash so request
    /// paths join cleanly.
    url: Url,
    /// Current liveness (0 = alive, 1 = dead).
    state: AtomicU8,
    /// Epoch milliseconds of the moment the node was marked dead
    /// (0 while alive).
    dead_since_ms: AtomicU64,
    /// Number of times this node has been marked dead since its last
    /// revival.
    failures: AtomicUsize,
}

impl Connection {
    /// Create a new connection, starting alive.
    pub fn new(url: Url) -> Self {
        let mut url = url;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Self {
            url,
            state: AtomicU8::new(STATE_ALIVE),
            dead_since_ms: AtomicU64::new(0),
            failures: AtomicUsize::new(0),
        }
    }

    /// The node's base URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// True when the connection is eligible for selection.
    pub fn is_alive(&self) -> bool {
        self.state.load(Ordering::Relaxed) == STATE_ALIVE
    }

    /// Flip to dead, stamping the time and counting the failure.
    /// Returns true if this call performed the transition; repeated
    /// calls on an already-dead connection are no-ops.
    pub fn mark_dead(&self) -> bool {
        if self
            .state
            .compare_exchange(STATE_ALIVE, STATE_DEAD, Ordering::AcqRel, Ordering::Relaxed)
            .is_err()
        {
            return false;
        }
        self.dead_since_ms.store(epoch_millis(), Ordering::Relaxed);
        self.failures.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Flip to alive, clearing dead state and the failure counter.
    /// Returns true if this call performed the transition.
    pub fn mark_alive(&self) -> bool {
        if self
            .state
            .compare_exchange(STATE_DEAD, STATE_ALIVE, Ordering::AcqRel, Ordering::Relaxed)
            .is_err()
        {
            return false;
        }
        self.dead_since_ms.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
        true
    }

    /// When the node was marked dead, if it currently is.
    pub fn dead_since(&self) -> Option<SystemTime> {
        match self.dead_since_ms.load(Ordering::Relaxed) {
            0 => None,
            ms => Some(UNIX_EPOCH + Duration::from_millis(ms)),
        }
    }

    /// Failures recorded since the last revival.
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
