//! HTTP response handling.

use std::sync::LazyLock;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use regex_lite::Regex;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Wrapper around HTTP response with additional functionality.
#[derive(Debug)]
pub struct Response {
    inner: reqwest::Response,
}

impl Response {
    pub(crate) fn new(inner: reqwest::Response) -> Self {
        Self { inner }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// Check if the response was successful (2xx).
    pub fn is_success(&self) -> bool {
        self.inner.status().is_success()
    }

    /// Get a header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Get the response body as text.
    pub async fn text(self) -> Result<String> {
        self.inner.text().await.map_err(Into::into)
    }

    /// Get the response body as bytes.
    pub async fn bytes(self) -> Result<Bytes> {
        self.inner.bytes().await.map_err(Into::into)
    }

    /// Deserialize the response body as JSON.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let bytes = self.bytes().await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }

    /// Stream the body in chunks as they arrive.
    pub fn bytes_stream(self) -> impl Stream<Item = Result<Bytes>> {
        self.inner.bytes_stream().map(|chunk| chunk.map_err(Error::from))
    }
}

static SCRIPT_KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"("?script_key"?\s*[:=]\s*"?)[^"&,\s}]+"#).unwrap());

static SESSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"("?(?:_session_id|session_token)"?\s*[:=]\s*"?)[A-Za-z0-9]{16,}"#).unwrap()
});

/// Sanitize a server message before it reaches error values or logs.
///
/// This function:
/// - Truncates messages longer than 500 characters
/// - Removes script keys
/// - Removes session ids and session tokens
pub fn sanitize_error_message(message: &str) -> String {
    const MAX_LENGTH: usize = 500;

    let mut sanitized = SCRIPT_KEY_PATTERN
        .replace_all(message, "${1}[REDACTED]")
        .to_string();
    sanitized = SESSION_PATTERN
        .replace_all(&sanitized, "${1}[REDACTED]")
        .to_string();

    if sanitized.len() > MAX_LENGTH {
        let mut cut = MAX_LENGTH;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str("...[truncated]");
    }

    sanitized
}
