//! Node-info wire types and address extraction.
//!
//! The discovery endpoint returns a JSON object keyed by node id, each
//! value carrying the node's published HTTP address. Both
//! Elasticsearch and OpenSearch serve this shape; unknown fields are
//! tolerated for forward compatibility.

use std::collections::HashMap;

use serde::Deserialize;
use url::Url;

use crate::config::schema::SnifferConfig;

/// Response of the node-info endpoint.
#[derive(Debug, Deserialize)]
pub struct NodesInfo {
    #[serde(default)]
    pub nodes: HashMap<String, NodeInfo>,
}

/// One cluster node as reported by the discovery endpoint.
#[derive(Debug, Deserialize)]
pub struct NodeInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub http: Option<NodeHttp>,
}

/// The node's HTTP transport block.
#[derive(Debug, Deserialize)]
pub struct NodeHttp {
    #[serde(default)]
    pub publish_address: Option<String>,
}

impl NodesInfo {
    /// Connection URLs for every node that publishes an HTTP address,
    /// with the configured scheme/port rewrites applied. Nodes without
    /// an address (or with one that does not parse) are skipped.
    pub fn node_urls(&self, config: &SnifferConfig) -> Vec<Url> {
        let scheme = if config.force_https { "https" } else { "http" };
        let mut urls: Vec<Url> = Vec::with_capacity(self.nodes.len());

        for (id, node) in &self.nodes {
            let address = node.http.as_ref().and_then(|h| h.publish_address.as_deref());
            let Some(address) = address else {
                tracing::debug!(node = %id, "skipping node without published HTTP address");
                continue;
            };
            match parse_publish_address(address, scheme, config.port_override) {
                Some(url) => urls.push(url),
                None => {
                    tracing::warn!(node = %id, address = %address, "unparseable publish address");
                }
            }
        }

        // Deterministic order keeps round-robin fair across sniffs.
        urls.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        urls
    }
}

/// Parse a published address of the form `host:port` or
/// `hostname/ip:port` (the latter prefers the hostname).
pub fn parse_publish_address(address: &str, scheme: &str, port_override: Option<u16>) -> Option<Url> {
    let (host, port_str) = match address.split_once('/') {
        Some((hostname, rest)) => (hostname, rest.rsplit_once(':')?.1),
        None => {
            let (host, port) = address.rsplit_once(':')?;
            (host, port)
        }
    };

    let port = match port_override {
        Some(p) => p,
        None => port_str.parse().ok()?,
    };

    Url::parse(&format!("{scheme}://{host}:{port}/")).ok()
}
