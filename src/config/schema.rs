//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! client. All types derive Serde traits for deserialization from
//! config files; every section carries its own defaults so a partial
//! file (or an empty one) yields a working local-development setup.

use serde::{Deserialize, Serialize};

/// Root configuration for the cluster client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Seed node URLs (e.g., "http://127.0.0.1:9200").
    pub nodes: Vec<String>,

    /// Credentials attached to every outgoing request.
    pub auth: AuthConfig,

    /// Topology discovery settings.
    pub sniff: SnifferConfig,

    /// Liveness probing settings.
    pub health_check: HealthCheckConfig,

    /// Retry/backoff settings.
    pub retries: RetryConfig,

    /// HTTP timeout settings.
    pub timeouts: TimeoutConfig,

    /// Response decoding settings.
    pub decoder: DecoderConfig,
}

/// Authentication material carried (not validated) by the transport.
///
/// `basic` and `api_key` are mutually exclusive; validation rejects a
/// config that sets both.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// Basic auth credentials.
    pub basic: Option<BasicAuth>,

    /// API key sent as `Authorization: ApiKey <key>`.
    pub api_key: Option<String>,
}

/// Username/password pair for basic auth.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

/// Topology discovery (sniffing) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SnifferConfig {
    /// Enable sniffing. When disabled the pool is seeded once from
    /// `nodes` and its member URLs never change.
    pub enabled: bool,

    /// Interval between background sniffs in seconds.
    pub interval_secs: u64,

    /// Per-node discovery request timeout in seconds.
    pub timeout_secs: u64,

    /// Node-info endpoint path. Elasticsearch and OpenSearch both
    /// serve `_nodes/http`; deployments that diverge override this.
    pub nodes_path: String,

    /// Rewrite discovered node URLs to https.
    pub force_https: bool,

    /// Override the port on discovered node URLs.
    pub port_override: Option<u16>,
}

impl Default for SnifferConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: 300,
            timeout_secs: 2,
            nodes_path: "_nodes/http".to_string(),
            force_https: false,
            port_override: None,
        }
    }
}

/// Health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Enable active health checks. When disabled, liveness is
    /// maintained solely by request outcomes.
    pub enabled: bool,

    /// Probe interval in seconds. Should be shorter than the sniff
    /// interval.
    pub interval_secs: u64,

    /// Per-probe timeout in seconds.
    pub timeout_secs: u64,

    /// Path to probe. Any HTTP response counts as alive.
    pub path: String,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 10,
            timeout_secs: 2,
            path: "/".to_string(),
        }
    }
}

/// Retry configuration for the default retrier.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable retries. When disabled every request gets exactly one
    /// attempt.
    pub enabled: bool,

    /// Maximum number of attempts per request (first try included).
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,

    /// HTTP statuses treated as transient (retryable).
    pub transient_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
            transient_statuses: vec![502, 503, 504],
        }
    }
}

/// Timeout configuration for outgoing requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Default overall deadline per request in seconds, spanning every
    /// attempt and backoff delay. A per-call timeout overrides this.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Response decoder selection.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DecoderConfig {
    /// Tolerate empty bodies and trailing bytes when decoding JSON.
    pub lenient: bool,
}

impl ClientConfig {
    /// A config seeded for a local single-node cluster.
    pub fn local() -> Self {
        Self {
            nodes: vec!["http://127.0.0.1:9200".to_string()],
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = ClientConfig::default();
        assert!(!config.sniff.enabled);
        assert!(config.health_check.enabled);
        assert_eq!(config.retries.max_attempts, 3);
        assert_eq!(config.retries.transient_statuses, vec![502, 503, 504]);
        assert_eq!(config.sniff.nodes_path, "_nodes/http");
        assert_eq!(config.health_check.path, "/");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            nodes = ["http://10.0.0.1:9200"]

            [sniff]
            enabled = true
            interval_secs = 60
            "#,
        )
        .unwrap();
        assert_eq!(config.nodes, vec!["http://10.0.0.1:9200"]);
        assert!(config.sniff.enabled);
        assert_eq!(config.sniff.interval_secs, 60);
        // untouched sections keep their defaults
        assert_eq!(config.sniff.timeout_secs, 2);
        assert_eq!(config.retries.max_attempts, 3);
    }

    #[test]
    fn auth_sections_parse() {
        let config: ClientConfig = toml::from_str(
            r#"
            [auth.basic]
            username = "elastic"
            password = "changeme"
            "#,
        )
        .unwrap();
        let basic = config.auth.basic.unwrap();
        assert_eq!(basic.username, "elastic");
        assert!(config.auth.api_key.is_none());
    }
}
