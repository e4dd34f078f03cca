//! Pluggable response-body decoding.

use serde_json::Value;

use crate::error::Error;

/// Turns raw response bytes into a JSON value. Injected at client
/// construction; swappable for schema-tolerant deployments.
pub trait Decoder: Send + Sync {
    fn decode(&self, body: &[u8]) -> Result<Value, Error>;
}

/// Strict decoding: the body must be exactly one well-formed JSON
/// document.
#[derive(Debug, Default, Clone, Copy)]
pub struct StrictJson;

impl Decoder for StrictJson {
    fn decode(&self, body: &[u8]) -> Result<Value, Error> {
        serde_json::from_slice(body).map_err(|source| Error::Decode { source })
    }
}

/// Lenient decoding: an empty body decodes to `null`, a UTF-8 BOM is
/// tolerated, and trailing bytes after the first document are ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct LenientJson;

impl Decoder for LenientJson {
    fn decode(&self, body: &[u8]) -> Result<Value, Error> {
        let body = body.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(body);
        if body.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Value::Null);
        }

        let mut stream = serde_json::Deserializer::from_slice(body).into_iter::<Value>();
        match stream.next() {
            Some(Ok(value)) => Ok(value),
            Some(Err(source)) => Err(Error::Decode { source }),
            None => Ok(Value::Null),
        }
    }
}
