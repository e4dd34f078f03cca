//! Per-call request options.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::Serialize;

use crate::error::Error;
use crate::resilience::retry::Retrier;

/// Request body: raw bytes or a value encoded to JSON at dispatch time.
#[derive(Debug, Clone)]
pub enum Body {
    Raw(Vec<u8>),
    Json(serde_json::Value),
}

impl Body {
    /// Encode a serializable value into a JSON body.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, Error> {
        let value = serde_json::to_value(value).map_err(|source| Error::Decode { source })?;
        Ok(Body::Json(value))
    }
}

/// Everything one `perform_request` call needs. Named fields, no
/// builder chains: endpoint services fill in what they have and leave
/// the rest defaulted.
pub struct RequestOptions {
    /// HTTP method. Always present.
    pub method: Method,
    /// Request path relative to the node base URL. Always present.
    pub path: String,
    /// Query parameters, appended URL-encoded.
    pub query: Vec<(String, String)>,
    /// Extra headers for this call.
    pub headers: HeaderMap,
    /// Optional request body.
    pub body: Option<Body>,
    /// Status codes treated as non-error for this call (e.g. 404 on an
    /// existence check).
    pub ignore_statuses: Vec<u16>,
    /// Per-call retry policy override.
    pub retrier: Option<Arc<dyn Retrier>>,
    /// Overall deadline spanning every attempt and backoff delay.
    /// Defaults to the client's configured request timeout.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            ignore_statuses: Vec::new(),
            retrier: None,
            timeout: None,
        }
    }

    /// Shorthand for a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Shorthand for a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("ignore_statuses", &self.ignore_statuses)
            .field("timeout", &self.timeout)
            .field("has_body", &self.body.is_some())
            .field("has_retrier_override", &self.retrier.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_json_encodes_values() {
        #[derive(Serialize)]
        struct Doc {
            title: &'static str,
        }
        let body = Body::json(&Doc { title: "hello" }).unwrap();
        match body {
            Body::Json(value) => assert_eq!(value["title"], "hello"),
            Body::Raw(_) => panic!("expected JSON body"),
        }
    }

    #[test]
    fn defaults_are_empty() {
        let options = RequestOptions::get("_cat/indices");
        assert_eq!(options.method, Method::GET);
        assert!(options.query.is_empty());
        assert!(options.body.is_none());
        assert!(options.ignore_statuses.is_empty());
        assert!(options.timeout.is_none());
    }
}
