//! Metrics recording.
//!
//! # Metrics
//! - `shoal_requests_total` (counter): attempts by method, status, node
//!   (status 0 = the exchange never completed)
//! - `shoal_request_duration_seconds` (histogram): attempt latency
//! - `shoal_retries_total` (counter): retries by node
//! - `shoal_node_up` (gauge): per-node liveness, 1 = alive
//! - `shoal_pool_size` (gauge): connections currently pooled
//! - `shoal_sniffs_total` (counter): successful topology refreshes
//!
//! Recording goes through the `metrics` facade; wiring an exporter is
//! the embedding application's choice.

use std::time::Duration;

use metrics::{counter, gauge, histogram};

pub fn record_request(method: &str, status: u16, node: &str, elapsed: Duration) {
    counter!(
        "shoal_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "node" => node.to_string()
    )
    .increment(1);
    histogram!(
        "shoal_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(elapsed.as_secs_f64());
}

pub fn record_retry(node: &str) {
    counter!("shoal_retries_total", "node" => node.to_string()).increment(1);
}

pub fn record_node_health(node: &str, alive: bool) {
    gauge!("shoal_node_up", "node" => node.to_string()).set(if alive { 1.0 } else { 0.0 });
}

pub fn record_pool_size(size: usize) {
    gauge!("shoal_pool_size").set(size as f64);
}

pub fn record_sniff(node_count: usize) {
    counter!("shoal_sniffs_total").increment(1);
    record_pool_size(node_count);
}
