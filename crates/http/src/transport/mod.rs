//! Transport trait and implementations.
//!
//! This module defines the `Transport` trait, a minimal GET-only HTTP
//! abstraction shared by the index clients and the range fetcher. The live
//! implementation wraps a single `reqwest::Client`; the mock holds canned
//! responses for tests.

mod client;
#[cfg(feature = "mock")]
mod mock;

pub use self::client::HttpClient;
#[cfg(feature = "mock")]
pub use self::mock::MockTransport;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// One GET exchange, fully described up front.
///
/// Every network-issuing operation takes one of these instead of loose
/// parameters, so the deadline is always explicit and visible at the call
/// site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetRequest {
    /// Absolute URL to fetch.
    pub url: String,
    /// Inclusive byte range, sent as `Range: bytes=<start>-<end>`.
    pub range: Option<(u64, u64)>,
    /// Wall-clock deadline for the whole exchange, connect included.
    pub timeout: Duration,
}

impl GetRequest {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            range: None,
            timeout,
        }
    }

    /// Request only the inclusive byte range `start..=end`.
    pub fn with_range(mut self, start: u64, end: u64) -> Self {
        self.range = Some((start, end));
        self
    }
}

/// What came back from one GET exchange.
///
/// Only the headers this pipeline actually inspects are surfaced; the rest
/// of the header block is dropped at the transport boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_range: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// A plain 200 response with the given body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_range: None,
            content_type: None,
            body: body.into(),
        }
    }

    /// A 206 response carrying a `content-range` header.
    pub fn partial(body: impl Into<Vec<u8>>, content_range: impl Into<String>) -> Self {
        Self {
            status: 206,
            content_range: Some(content_range.into()),
            content_type: None,
            body: body.into(),
        }
    }

    /// An empty-bodied response with an arbitrary status code.
    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            content_range: None,
            content_type: None,
            body: Vec::new(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Body bytes decoded as UTF-8, lossily.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Minimal GET-only HTTP transport.
///
/// Non-2xx statuses are returned as ordinary [`HttpResponse`]s; only
/// transport-level failures (unreachable host, timeout) raise errors.
/// Implementations must be cheap to share behind an `Arc` so one client is
/// constructed by the caller and reused across every operation.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use ccdig_http::{GetRequest, Transport, error::Result};
///
/// async fn fetch_directory(transport: &dyn Transport) -> Result<String> {
///     let request = GetRequest::new(
///         "https://index.commoncrawl.org/collinfo.json",
///         Duration::from_secs(30),
///     );
///     let response = transport.get(request).await?;
///     Ok(response.text())
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Name of the transport (used for logging only).
    fn name(&self) -> &str;

    /// Perform a single GET exchange and buffer the whole body.
    async fn get(&self, request: GetRequest) -> Result<HttpResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder() {
        let request = GetRequest::new("https://example.com/x", Duration::from_secs(5)).with_range(10, 19);
        assert_eq!(request.url, "https://example.com/x");
        assert_eq!(request.range, Some((10, 19)));
    }

    #[test]
    fn response_constructors() {
        let ok = HttpResponse::ok("hello").with_content_type("text/plain");
        assert_eq!(ok.status, 200);
        assert_eq!(ok.text(), "hello");
        assert_eq!(ok.content_type.as_deref(), Some("text/plain"));

        let partial = HttpResponse::partial(vec![1, 2, 3], "bytes 0-2/10");
        assert_eq!(partial.status, 206);
        assert_eq!(partial.content_range.as_deref(), Some("bytes 0-2/10"));

        assert_eq!(HttpResponse::with_status(404).status, 404);
    }
}
