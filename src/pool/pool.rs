//! Connection pool management.
//!
//! # Responsibilities
//! - Own the current connection list behind an atomic swap
//! - Apply the selection strategy to pick the next connection
//! - Record liveness transitions with logging and metrics
//! - Atomically replace the list on topology changes, carrying
//!   liveness over for URLs present in both lists

use std::sync::Arc;

use arc_swap::ArcSwap;
use url::Url;

use crate::error::Error;
use crate::observability::metrics;
use crate::pool::connection::Connection;
use crate::pool::selector::{RoundRobin, Selector};

/// Thread-safe pool of cluster node connections.
#[derive(Debug)]
pub struct ConnectionPool {
    connections: ArcSwap<Vec<Arc<Connection>>>,
    selector: Box<dyn Selector>,
}

impl ConnectionPool {
    /// Create a pool seeded with the given node URLs, using round-robin
    /// selection.
    pub fn new(urls: Vec<Url>) -> Self {
        Self::with_selector(urls, Box::new(RoundRobin::new()))
    }

    /// Create a pool with a custom selection strategy.
    pub fn with_selector(urls: Vec<Url>, selector: Box<dyn Selector>) -> Self {
        let connections: Vec<Arc<Connection>> = urls
            .into_iter()
            .map(|url| Arc::new(Connection::new(url)))
            .collect();
        Self {
            connections: ArcSwap::from_pointee(connections),
            selector,
        }
    }

    /// Pick the next connection to try, preferring alive ones. Fails
    /// only when the pool is empty.
    pub fn select(&self) -> Result<Arc<Connection>, Error> {
        let snapshot = self.connections.load();
        self.selector.next(&snapshot).ok_or(Error::NoConnections)
    }

    /// Flip a connection to dead. Idempotent; logs only the transition.
    pub fn mark_dead(&self, conn: &Connection) {
        if conn.mark_dead() {
            tracing::warn!(node = %conn.url(), failures = conn.failures(), "node marked dead");
            metrics::record_node_health(conn.url().as_str(), false);
        }
    }

    /// Flip a connection to alive. Idempotent; logs only the transition.
    pub fn mark_alive(&self, conn: &Connection) {
        if conn.mark_alive() {
            tracing::info!(node = %conn.url(), "node marked alive");
            metrics::record_node_health(conn.url().as_str(), true);
        }
    }

    /// Atomically swap the whole connection list. URLs present in both
    /// lists keep their existing connection (and therefore their
    /// liveness state); new URLs start alive; URLs absent from the new
    /// list are dropped.
    pub fn replace(&self, urls: Vec<Url>) {
        let old = self.connections.load();
        let new: Vec<Arc<Connection>> = urls
            .into_iter()
            .map(|url| {
                let normalized = Connection::new(url);
                match old.iter().find(|c| c.url() == normalized.url()) {
                    Some(existing) => existing.clone(),
                    None => Arc::new(normalized),
                }
            })
            .collect();

        tracing::debug!(nodes = new.len(), "connection list replaced");
        metrics::record_pool_size(new.len());
        self.connections.store(Arc::new(new));
    }

    /// Snapshot of the current connection list.
    pub fn connections(&self) -> Vec<Arc<Connection>> {
        self.connections.load().iter().cloned().collect()
    }

    /// Number of connections currently in the pool.
    pub fn len(&self) -> usize {
        self.connections.load().len()
    }

    /// True when the pool holds no connections.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn pool(urls: &[&str]) -> ConnectionPool {
        ConnectionPool::new(urls.iter().map(|u| url(u)).collect())
    }

    #[test]
    fn empty_pool_fails_selection() {
        let pool = pool(&[]);
        assert!(matches!(pool.select(), Err(Error::NoConnections)));
    }

    #[test]
    fn select_excludes_dead_until_revived() {
        let pool = pool(&["http://10.0.0.1:9200", "http://10.0.0.2:9200"]);
        let dead = pool
            .connections()
            .into_iter()
            .find(|c| c.url().host_str() == Some("10.0.0.1"))
            .unwrap();
        pool.mark_dead(&dead);

        for _ in 0..4 {
            let picked = pool.select().unwrap();
            assert_eq!(picked.url().host_str(), Some("10.0.0.2"));
        }

        pool.mark_alive(&dead);
        let hosts: Vec<_> = (0..2)
            .map(|_| pool.select().unwrap().url().host_str().unwrap().to_string())
            .collect();
        assert!(hosts.contains(&"10.0.0.1".to_string()));
    }

    #[test]
    fn replace_carries_liveness_for_shared_urls() {
        let pool = pool(&["http://10.0.0.1:9200", "http://10.0.0.2:9200"]);
        let dead = pool
            .connections()
            .into_iter()
            .find(|c| c.url().host_str() == Some("10.0.0.1"))
            .unwrap();
        pool.mark_dead(&dead);

        pool.replace(vec![
            url("http://10.0.0.1:9200"),
            url("http://10.0.0.3:9200"),
        ]);

        let conns = pool.connections();
        assert_eq!(conns.len(), 2);

        let shared = conns
            .iter()
            .find(|c| c.url().host_str() == Some("10.0.0.1"))
            .unwrap();
        assert!(!shared.is_alive(), "shared URL keeps its dead state");
        assert_eq!(shared.failures(), 1);

        let fresh = conns
            .iter()
            .find(|c| c.url().host_str() == Some("10.0.0.3"))
            .unwrap();
        assert!(fresh.is_alive(), "new URL starts alive");

        assert!(
            !conns.iter().any(|c| c.url().host_str() == Some("10.0.0.2")),
            "URL absent from the new list is dropped"
        );
    }

    #[test]
    fn replace_is_atomic_under_concurrent_selection() {
        use std::sync::atomic::{AtomicBool, Ordering};

        let pool = Arc::new(pool(&["http://10.0.0.1:9200", "http://10.0.0.2:9200"]));
        let stop = Arc::new(AtomicBool::new(false));

        let selector = {
            let pool = pool.clone();
            let stop = stop.clone();
            std::thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    let conn = pool.select().unwrap();
                    let host = conn.url().host_str().unwrap().to_string();
                    assert!(host.starts_with("10.0.0."), "unexpected host {host}");
                }
            })
        };

        for i in 0..500u32 {
            let a = url(&format!("http://10.0.0.{}:9200", (i % 4) + 1));
            let b = url(&format!("http://10.0.0.{}:9200", (i % 4) + 2));
            pool.replace(vec![a, b]);
        }

        stop.store(true, Ordering::Relaxed);
        selector.join().unwrap();
    }
}
