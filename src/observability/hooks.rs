//! Caller-facing observation hooks.

use std::time::Duration;

use reqwest::Method;
use url::Url;

/// An outgoing request attempt, observed just before dispatch.
#[derive(Debug)]
pub struct RequestEvent<'a> {
    pub request_id: &'a str,
    pub method: &'a Method,
    pub url: &'a Url,
    /// 1-based attempt number within the logical request.
    pub attempt: u32,
}

/// A completed HTTP exchange, observed after the body is read.
#[derive(Debug)]
pub struct ResponseEvent<'a> {
    pub request_id: &'a str,
    pub method: &'a Method,
    pub url: &'a Url,
    pub status: u16,
    pub elapsed: Duration,
}

/// Hook invoked with request/response pairs and with deprecation
/// warnings carried on response headers. All methods default to
/// no-ops; implement only what you need. Observing never alters the
/// returned result.
pub trait RequestObserver: Send + Sync {
    fn on_request(&self, _event: &RequestEvent<'_>) {}

    fn on_response(&self, _event: &ResponseEvent<'_>) {}

    fn on_deprecation(&self, _warning: &str) {}
}
