//! Clients for the collection directory and per-collection CDX endpoints.

use crate::error::{ErrorKind, Result};
use crate::models::{CaptureRecord, CollectionInfo};
use crate::query::CaptureQuery;
use async_stream::stream;
use ccdig_http::{GetRequest, TransportHandle};
use exn::{OptionExt, ResultExt};
use futures::Stream;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

/// Client for one capture index host.
///
/// Owns nothing but a transport handle and the endpoint base; construct it
/// per run and share it freely. All directory and page-count failures are
/// surfaced as errors because discovery cannot proceed without them.
pub struct IndexClient {
    transport: TransportHandle,
    base: String,
    timeout: Duration,
}

impl IndexClient {
    pub fn new(transport: TransportHandle, base: impl Into<String>, timeout: Duration) -> Self {
        Self {
            transport,
            base: base.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Fetch the collection directory, newest collection first.
    ///
    /// The service's own ordering has been observed to drift, so the list is
    /// re-sorted by id descending; `CC-MAIN-<year>-<week>` ids sort
    /// lexicographically.
    #[instrument(skip(self), fields(collections))]
    pub async fn collections(&self) -> Result<Vec<CollectionInfo>> {
        let url = format!("{}/collinfo.json", self.base);
        let response =
            self.transport.get(GetRequest::new(url, self.timeout)).await.or_raise(|| ErrorKind::Directory)?;
        if response.status != 200 {
            exn::bail!(ErrorKind::Status(response.status));
        }
        let mut collections: Vec<CollectionInfo> =
            serde_json::from_slice(&response.body).or_raise(|| ErrorKind::Malformed("collinfo"))?;
        collections.sort_by(|a, b| b.id.cmp(&a.id));
        tracing::Span::current().record("collections", collections.len());
        Ok(collections)
    }

    /// The most recent collection in the directory.
    pub async fn latest_collection(&self) -> Result<CollectionInfo> {
        self.collections().await?.into_iter().next().ok_or_raise(|| ErrorKind::EmptyDirectory)
    }

    /// Total number of pages the paginated sweep will serve for `query`.
    ///
    /// Must complete before page iteration begins; failure here is fatal to
    /// the sweep. A 404 means the pattern matched nothing at all.
    #[instrument(skip(self, query), fields(pages))]
    pub async fn page_count(&self, collection: &str, query: &CaptureQuery) -> Result<u32> {
        let url = self.query_url(collection, query.count_params())?;
        let response =
            self.transport.get(GetRequest::new(url, self.timeout)).await.or_raise(|| ErrorKind::Unreachable)?;
        if response.status == 404 {
            return Ok(0);
        }
        if response.status != 200 {
            exn::bail!(ErrorKind::Status(response.status));
        }

        #[derive(Deserialize)]
        struct PageInfo {
            pages: u32,
        }
        let info: PageInfo =
            serde_json::from_str(response.text().trim()).or_raise(|| ErrorKind::Malformed("page count"))?;
        tracing::Span::current().record("pages", info.pages);
        Ok(info.pages)
    }

    /// Fetch one page of the paginated sweep.
    ///
    /// Pages are independently fetchable and retry-safe. Blank and
    /// malformed NDJSON lines are skipped without failing the page; a 404
    /// page is empty, not an error.
    #[instrument(skip(self, query), fields(records, skipped))]
    pub async fn fetch_page(&self, collection: &str, query: &CaptureQuery, page: u32) -> Result<Vec<CaptureRecord>> {
        let url = self.query_url(collection, query.page_params(page))?;
        let response =
            self.transport.get(GetRequest::new(url, self.timeout)).await.or_raise(|| ErrorKind::Unreachable)?;
        if response.status == 404 {
            return Ok(Vec::new());
        }
        if response.status != 200 {
            exn::bail!(ErrorKind::Status(response.status));
        }
        Ok(parse_ndjson(&response.text()))
    }

    /// Lazily yield every capture record matching `query`, page by page.
    ///
    /// The page count is resolved first; then pages `0..count` are fetched
    /// in order. A failed page ends the stream with its error — callers who
    /// want to resume can re-fetch that page index directly via
    /// [`fetch_page`](Self::fetch_page).
    pub fn captures<'a>(
        &'a self,
        collection: &'a str,
        query: &'a CaptureQuery,
    ) -> impl Stream<Item = Result<CaptureRecord>> + 'a {
        stream! {
            let pages = match self.page_count(collection, query).await {
                Ok(pages) => pages,
                Err(error) => {
                    yield Err(error);
                    return;
                },
            };
            for page in 0..pages {
                match self.fetch_page(collection, query, page).await {
                    Ok(records) => {
                        for record in records {
                            yield Ok(record);
                        }
                    },
                    Err(error) => {
                        yield Err(error);
                        return;
                    },
                }
            }
        }
    }

    /// The most recent eligible capture of one exact URL.
    ///
    /// Kept distinct from the paginated sweep: a single-URL lookup has no
    /// business paging, and its result volume is a handful of rows at most.
    #[instrument(skip(self))]
    pub async fn latest_capture(&self, collection: &str, url: &str) -> Result<Option<CaptureRecord>> {
        let query = CaptureQuery::new(url).filter("status:200").sort_reverse().limit(5);
        let endpoint = self.query_url(collection, query.lookup_params())?;
        let response =
            self.transport.get(GetRequest::new(endpoint, self.timeout)).await.or_raise(|| ErrorKind::Unreachable)?;
        if response.status == 404 {
            return Ok(None);
        }
        if response.status != 200 {
            exn::bail!(ErrorKind::Status(response.status));
        }
        Ok(parse_ndjson(&response.text()).into_iter().find(CaptureRecord::is_ok_status))
    }

    fn query_url(&self, collection: &str, params: Vec<(String, String)>) -> Result<String> {
        let endpoint = format!("{}/{collection}-index", self.base);
        let mut url = url::Url::parse(&endpoint).or_raise(|| ErrorKind::Malformed("endpoint"))?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url.into())
    }
}

/// Parse an NDJSON page body, skipping blank and malformed lines.
fn parse_ndjson(text: &str) -> Vec<CaptureRecord> {
    let mut records = Vec::new();
    let mut skipped = 0u32;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<CaptureRecord>(line) {
            Ok(record) => records.push(record),
            Err(error) => {
                skipped += 1;
                // Cap the noise; one broken page would otherwise log
                // hundreds of near-identical lines.
                if skipped <= 3 {
                    let preview = line.get(..line.len().min(200)).unwrap_or(line);
                    tracing::warn!(%error, line = preview, "skipping malformed CDX line");
                }
            },
        }
    }
    if skipped > 0 {
        tracing::Span::current().record("skipped", skipped);
    }
    tracing::Span::current().record("records", records.len());
    records
}
