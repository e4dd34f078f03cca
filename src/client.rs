//! Process-wide client handle.
//!
//! # Responsibilities
//! - Validate configuration and build the shared HTTP stack
//! - Seed the connection pool, run the initial sniff when enabled
//! - Spawn and own the sniffer / health-checker background tasks
//! - Expose `perform_request` to endpoint services
//! - Join background tasks on close

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use url::Url;

use crate::config::schema::ClientConfig;
use crate::config::validation::validate_config;
use crate::error::Error;
use crate::health::active::HealthChecker;
use crate::lifecycle::shutdown::Shutdown;
use crate::observability::hooks::RequestObserver;
use crate::pool::pool::ConnectionPool;
use crate::resilience::retry::{BackoffRetrier, Retrier};
use crate::sniff::sniffer::Sniffer;
use crate::transport::decode::{Decoder, LenientJson, StrictJson};
use crate::transport::dispatch::Transport;
use crate::transport::request::RequestOptions;
use crate::transport::response::Response;

/// Injectable collaborators that have no serde representation. Named
/// fields with `None` meaning "use the configured default".
#[derive(Default)]
pub struct ClientParts {
    /// Default retry policy (per-request overrides still apply).
    pub retrier: Option<Arc<dyn Retrier>>,
    /// Response decoder.
    pub decoder: Option<Arc<dyn Decoder>>,
    /// Request/response/deprecation hook.
    pub observer: Option<Arc<dyn RequestObserver>>,
}

/// Handle to a cluster: connection pool, background discovery and
/// health checking, and the request dispatcher. Cheap to share behind
/// an `Arc`; construction starts the background tasks and
/// [`Client::close`] stops them.
pub struct Client {
    config: ClientConfig,
    pool: Arc<ConnectionPool>,
    transport: Arc<Transport>,
    shutdown: Shutdown,
}

impl Client {
    /// Build a client from configuration with default collaborators.
    pub async fn new(config: ClientConfig) -> Result<Self, Error> {
        Self::with_parts(config, ClientParts::default()).await
    }

    /// Build a client, overriding retrier/decoder/observer.
    pub async fn with_parts(config: ClientConfig, parts: ClientParts) -> Result<Self, Error> {
        validate_config(&config).map_err(|errors| {
            Error::Config(
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            )
        })?;

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        // Validation guarantees the seeds parse.
        let seeds: Vec<Url> = config
            .nodes
            .iter()
            .filter_map(|node| Url::parse(node).ok())
            .collect();
        let pool = Arc::new(ConnectionPool::new(seeds));

        let retrier = parts
            .retrier
            .unwrap_or_else(|| Arc::new(BackoffRetrier::from_config(&config.retries)));
        let decoder = parts.decoder.unwrap_or_else(|| {
            if config.decoder.lenient {
                Arc::new(LenientJson) as Arc<dyn Decoder>
            } else {
                Arc::new(StrictJson)
            }
        });

        let sniff_trigger = config.sniff.enabled.then(|| Arc::new(Notify::new()));
        let transport = Arc::new(Transport::new(
            pool.clone(),
            http.clone(),
            retrier,
            decoder,
            config.auth.clone(),
            Some(Duration::from_secs(config.timeouts.request_secs)),
            parts.observer,
            sniff_trigger.clone(),
        ));

        let shutdown = Shutdown::new();

        if let Some(trigger) = sniff_trigger {
            let sniffer = Sniffer::new(pool.clone(), http.clone(), config.sniff.clone(), trigger);
            // Initial synchronous sniff. The seed list already passed
            // validation, so a discovery failure here degrades to the
            // seeds rather than failing construction.
            match sniffer.sniff().await {
                Ok(count) => tracing::info!(nodes = count, "initial sniff complete"),
                Err(error) => {
                    tracing::warn!(error = %error, "initial sniff failed; continuing with seed nodes");
                }
            }
            shutdown.spawn(sniffer.run(shutdown.subscribe()));
        }

        if config.health_check.enabled {
            let checker = HealthChecker::new(pool.clone(), http.clone(), config.health_check.clone());
            shutdown.spawn(checker.run(shutdown.subscribe()));
        }

        tracing::info!(
            nodes = pool.len(),
            sniffing = config.sniff.enabled,
            health_checking = config.health_check.enabled,
            "client ready"
        );

        Ok(Self {
            config,
            pool,
            transport,
            shutdown,
        })
    }

    /// Load configuration from a TOML file and build a client.
    pub async fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, Error> {
        let config = crate::config::loader::load_config(path.as_ref())
            .map_err(|e| Error::Config(e.to_string()))?;
        Self::new(config).await
    }

    /// The single capability every endpoint service consumes.
    pub async fn perform_request(&self, options: RequestOptions) -> Result<Response, Error> {
        self.transport.perform_request(options).await
    }

    /// Probe the cluster root through the full dispatch path.
    pub async fn ping(&self) -> Result<Response, Error> {
        self.perform_request(RequestOptions::get("/")).await
    }

    /// The connection pool, for introspection (current nodes and their
    /// liveness).
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Stop and join the background tasks. The client remains usable
    /// for dispatch afterwards, but the pool is no longer refreshed.
    pub async fn close(&self) {
        self.shutdown.shutdown().await;
        tracing::info!("client closed");
    }
}
