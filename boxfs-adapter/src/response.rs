//! Response objects returned by a [`BoxClient`](crate::client::BoxClient).

use std::fmt;
use std::io;

use boxfs_common::{ByteStream, Metadata, StorageError};
use futures_util::TryStreamExt;
use serde_json::Value;

/// Outcome of one remote call: status code, raw JSON body, and for
/// downloads a content stream.
///
/// Transport failures are carried as code `0` so callers see one error flag.
pub struct BoxResponse {
    code: u16,
    json: Value,
    stream: Option<ByteStream>,
}

impl BoxResponse {
    pub fn new(code: u16, json: Value) -> Self {
        Self { code, json, stream: None }
    }

    pub fn with_stream(mut self, stream: ByteStream) -> Self {
        self.stream = Some(stream);
        self
    }

    /// Response for a request that never reached the service.
    pub fn transport_error(message: impl Into<String>) -> Self {
        Self::new(0, serde_json::json!({ "message": message.into() }))
    }

    /// Build a response from an HTTP reply.
    ///
    /// JSON bodies are decoded; any other body is exposed as a stream.
    pub async fn from_reqwest(resp: reqwest::Response) -> Self {
        let code = resp.status().as_u16();
        let is_json = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("json"));

        if is_json {
            return match resp.json::<Value>().await {
                Ok(json) => Self::new(code, json),
                Err(e) => Self::new(
                    code,
                    serde_json::json!({ "message": format!("invalid JSON body: {e}") }),
                ),
            };
        }

        let stream = resp.bytes_stream().map_err(io::Error::other);
        Self::new(code, Value::Null).with_stream(ByteStream::new(stream))
    }

    pub fn is_error(&self) -> bool {
        !(200..300).contains(&self.code)
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn json(&self) -> &Value {
        &self.json
    }

    /// Take the content stream, if the response carried one.
    pub fn take_stream(&mut self) -> Option<ByteStream> {
        self.stream.take()
    }

    /// Message reported by the service, falling back to the status code.
    pub fn error_message(&self) -> String {
        self.json
            .get("message")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", self.code))
    }

    /// The response in metadata form; the stream, if any, is dropped.
    pub fn to_metadata(&self) -> Metadata {
        Metadata::new(self.code, self.json.clone())
    }

    pub fn into_error(self) -> StorageError {
        StorageError::remote(self.code, self.error_message())
    }
}

impl From<reqwest::Error> for BoxResponse {
    fn from(err: reqwest::Error) -> Self {
        let code = err.status().map(|s| s.as_u16()).unwrap_or(0);
        Self::new(code, serde_json::json!({ "message": err.to_string() }))
    }
}

impl fmt::Debug for BoxResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxResponse")
            .field("code", &self.code)
            .field("json", &self.json)
            .field("stream", &self.stream.is_some())
            .finish()
    }
}
