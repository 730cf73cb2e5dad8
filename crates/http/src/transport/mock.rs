//! Canned-response transport for testing.

use super::{GetRequest, HttpResponse, Transport};
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory transport for testing.
///
/// Responses live in a `HashMap` keyed by exact request URL, behind a
/// [`RwLock`] so the trait can operate on `&self`. Every request is also
/// recorded, so tests can assert not only what came back but that a call
/// was (or was not) made at all.
///
/// A request for an unknown URL fails with
/// [`Network`](crate::error::ErrorKind::Network), which makes the mock
/// double as an unreachable host.
///
/// # Examples
///
/// ```
/// use ccdig_http::{GetRequest, HttpResponse, MockTransport, Transport};
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = MockTransport::with_responses([
///     ("https://example.com/a", HttpResponse::ok("hello")),
/// ]);
/// let request = GetRequest::new("https://example.com/a", Duration::from_secs(1));
/// assert_eq!(transport.get(request).await?.text(), "hello");
/// assert_eq!(transport.request_count().await, 1);
/// # Ok(())
/// # }
/// ```
pub struct MockTransport {
    name: String,
    responses: RwLock<HashMap<String, HttpResponse>>,
    requests: RwLock<Vec<GetRequest>>,
}

impl MockTransport {
    /// Create a mock pre-populated with responses, keyed by exact URL.
    pub fn with_responses(responses: impl IntoIterator<Item = (impl Into<String>, HttpResponse)>) -> Self {
        let map = responses.into_iter().map(|(url, response)| (url.into(), response)).collect();
        Self {
            name: "mock".to_string(),
            responses: RwLock::new(map),
            requests: RwLock::new(Vec::new()),
        }
    }

    /// Change the name of the mock transport.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add or replace the response for one URL.
    pub async fn insert(&self, url: impl Into<String>, response: HttpResponse) {
        self.responses.write().await.insert(url.into(), response);
    }

    /// Every request issued so far, in order.
    pub async fn requests(&self) -> Vec<GetRequest> {
        self.requests.read().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        let responses: [(&str, HttpResponse); 0] = [];
        Self::with_responses(responses)
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, request: GetRequest) -> Result<HttpResponse> {
        self.requests.write().await.push(request.clone());
        let guard = self.responses.read().await;
        match guard.get(&request.url) {
            Some(response) => Ok(response.clone()),
            None => Err(exn::Exn::from(ErrorKind::Network)),
        }
    }
}
