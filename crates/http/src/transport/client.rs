//! Live transport backed by `reqwest`.

use super::{GetRequest, HttpResponse, Transport};
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use tracing::instrument;

/// [`Transport`] implementation over a shared `reqwest::Client`.
///
/// The inner client holds the connection pool, so construct one `HttpClient`
/// per process and share it; per-request deadlines come from each
/// [`GetRequest`], not from the client.
pub struct HttpClient {
    name: String,
    client: reqwest::Client,
}

impl HttpClient {
    /// Build a client with the given `User-Agent`.
    ///
    /// The archive host throttles anonymous default agents aggressively, so
    /// callers are expected to identify themselves.
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(4))
            .build()
            .or_raise(|| ErrorKind::Client)?;
        Ok(Self {
            name: "reqwest".to_string(),
            client,
        })
    }
}

#[async_trait]
impl Transport for HttpClient {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, request), fields(url = %request.url, status))]
    async fn get(&self, request: GetRequest) -> Result<HttpResponse> {
        let mut builder = self.client.get(&request.url).timeout(request.timeout);
        if let Some((start, end)) = request.range {
            builder = builder.header(reqwest::header::RANGE, format!("bytes={start}-{end}"));
        }
        let response = match builder.send().await {
            Ok(response) => response,
            Err(error) if error.is_timeout() => exn::bail!(ErrorKind::Timeout),
            Err(error) if error.is_builder() => exn::bail!(ErrorKind::InvalidUrl(request.url.clone())),
            Err(_) => exn::bail!(ErrorKind::Network),
        };

        let status = response.status().as_u16();
        tracing::Span::current().record("status", status);
        let content_range = header_string(&response, reqwest::header::CONTENT_RANGE);
        let content_type = header_string(&response, reqwest::header::CONTENT_TYPE);
        let body = match response.bytes().await {
            Ok(body) => body.to_vec(),
            Err(error) if error.is_timeout() => exn::bail!(ErrorKind::Timeout),
            Err(_) => exn::bail!(ErrorKind::Network),
        };

        Ok(HttpResponse {
            status,
            content_range,
            content_type,
            body,
        })
    }
}

fn header_string(response: &reqwest::Response, name: reqwest::header::HeaderName) -> Option<String> {
    response.headers().get(name).and_then(|value| value.to_str().ok()).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds() {
        let client = HttpClient::new("ccdig-test/0.1").unwrap();
        assert_eq!(client.name(), "reqwest");
    }
}
