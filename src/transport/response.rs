//! The response handed back to endpoint services.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::transport::decode::Decoder;

/// An HTTP response from the cluster: status, headers, and the raw
/// body. Immutable; decoding happens on demand through the client's
/// configured decoder.
pub struct Response {
    status: u16,
    headers: HeaderMap,
    body: Bytes,
    decoder: Arc<dyn Decoder>,
}

impl Response {
    pub(crate) fn new(status: u16, headers: HeaderMap, body: Bytes, decoder: Arc<dyn Decoder>) -> Self {
        Self {
            status,
            headers,
            body,
            decoder,
        }
    }

    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Consume the response, keeping only the body.
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Body as UTF-8 text (lossy).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body into a typed value through the configured
    /// decoder.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let value = self.decoder.decode(&self.body)?;
        serde_json::from_value(value).map_err(|source| Error::Decode { source })
    }

    /// Deprecation warnings the node attached to this response.
    pub fn warnings(&self) -> Vec<String> {
        self.headers
            .get_all(reqwest::header::WARNING)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(ToString::to_string)
            .collect()
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("body_len", &self.body.len())
            .finish()
    }
}
