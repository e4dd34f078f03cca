//! Active health checking.
//!
//! # Responsibilities
//! - Periodically probe every pooled connection
//! - Update connection liveness based on results

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::broadcast;
use tokio::time;

use crate::config::schema::HealthCheckConfig;
use crate::pool::connection::Connection;
use crate::pool::pool::ConnectionPool;

pub struct HealthChecker {
    pool: Arc<ConnectionPool>,
    http: reqwest::Client,
    config: HealthCheckConfig,
}

impl HealthChecker {
    pub fn new(pool: Arc<ConnectionPool>, http: reqwest::Client, config: HealthCheckConfig) -> Self {
        Self { pool, http, config }
    }

    /// Run the probe loop until shutdown.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval = self.config.interval_secs,
            path = %self.config.path,
            "health checker starting"
        );

        let mut ticker = time::interval(Duration::from_secs(self.config.interval_secs));

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.check_all().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("health checker received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Probe every connection concurrently. Probes are independent; a
    /// hung node costs its own timeout, nothing more.
    async fn check_all(&self) {
        let connections = self.pool.connections();
        join_all(connections.iter().map(|conn| self.probe(conn))).await;
    }

    async fn probe(&self, conn: &Arc<Connection>) {
        let url = match conn.url().join(self.config.path.trim_start_matches('/')) {
            Ok(url) => url,
            Err(error) => {
                tracing::error!(node = %conn.url(), error = %error, "failed to build probe URL");
                return;
            }
        };

        let result = self
            .http
            .get(url)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .send()
            .await;

        match result {
            // Any HTTP response proves the node is reachable.
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    tracing::debug!(node = %conn.url(), status = %status, "probe answered with error status");
                }
                self.pool.mark_alive(conn);
            }
            Err(error) => {
                tracing::warn!(node = %conn.url(), error = %error, "health probe failed");
                self.pool.mark_dead(conn);
            }
        }
    }
}
