//! Background and on-demand topology discovery.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Notify};
use tokio::time;

use crate::config::schema::SnifferConfig;
use crate::error::Error;
use crate::observability::metrics;
use crate::pool::connection::Connection;
use crate::pool::pool::ConnectionPool;
use crate::sniff::nodes::NodesInfo;

/// Discovers the current set of cluster nodes and feeds it to the pool.
pub struct Sniffer {
    pool: Arc<ConnectionPool>,
    http: reqwest::Client,
    config: SnifferConfig,
    /// Fired by the dispatcher when it runs out of usable connections.
    trigger: Arc<Notify>,
}

impl Sniffer {
    pub fn new(
        pool: Arc<ConnectionPool>,
        http: reqwest::Client,
        config: SnifferConfig,
        trigger: Arc<Notify>,
    ) -> Self {
        Self {
            pool,
            http,
            config,
            trigger,
        }
    }

    /// Run the periodic sniff loop until shutdown. Failures are logged
    /// and the last-known-good pool keeps serving.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval = self.config.interval_secs,
            path = %self.config.nodes_path,
            "sniffer starting"
        );

        let mut ticker = time::interval(Duration::from_secs(self.config.interval_secs));
        // The immediate first tick duplicates the construction-time
        // sniff; consume it up front.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = self.trigger.notified() => {
                    tracing::debug!("ad-hoc sniff requested");
                }
                _ = shutdown.recv() => {
                    tracing::info!("sniffer received shutdown signal, exiting loop");
                    break;
                }
            }

            if let Err(error) = self.sniff().await {
                tracing::warn!(error = %error, "sniff failed; keeping current node list");
            }
        }
    }

    /// One discovery round: ask each known connection (alive first) for
    /// the cluster's node list, and swap the pool to the first answer.
    /// Returns the new node count.
    pub async fn sniff(&self) -> Result<usize, Error> {
        let mut conns = self.pool.connections();
        conns.sort_by_key(|c| !c.is_alive());

        let mut last_error = Error::NoConnections;
        for conn in conns {
            match self.sniff_node(&conn).await {
                Ok(urls) if urls.is_empty() => {
                    tracing::warn!(node = %conn.url(), "discovery returned no usable nodes");
                    last_error = Error::NoConnections;
                }
                Ok(urls) => {
                    let count = urls.len();
                    self.pool.replace(urls);
                    metrics::record_sniff(count);
                    tracing::info!(nodes = count, via = %conn.url(), "topology refreshed");
                    return Ok(count);
                }
                Err(error) => {
                    tracing::debug!(node = %conn.url(), error = %error, "discovery request failed");
                    last_error = error;
                }
            }
        }

        Err(last_error)
    }

    async fn sniff_node(&self, conn: &Connection) -> Result<Vec<url::Url>, Error> {
        let url = conn
            .url()
            .join(self.config.nodes_path.trim_start_matches('/'))?;

        let response = self
            .http
            .get(url.clone())
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .send()
            .await
            .map_err(|source| Error::Connection {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(Error::Server {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        let body = response.bytes().await.map_err(|source| Error::Connection {
            url: url.to_string(),
            source,
        })?;
        let info: NodesInfo =
            serde_json::from_slice(&body).map_err(|source| Error::Decode { source })?;

        Ok(info.node_urls(&self.config))
    }
}
