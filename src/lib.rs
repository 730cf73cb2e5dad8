//! Web-archive discovery and HTML extraction pipeline.
//!
//! `ccdig` locates candidate pages inside a public columnar web-archive
//! index (the CDX API) and recovers their original HTML from compressed,
//! range-addressed archive segments. The work splits across three member
//! crates plus this facade:
//!
//! - [`ccdig_http`] — the GET-only [`Transport`](ccdig_http::Transport)
//!   abstraction, live `reqwest` client and test mock;
//! - [`ccdig_index`] — collection directory and CDX query clients;
//! - [`ccdig_warc`] — the pure bytes-in/text-out record decoding pipeline;
//! - this crate — configuration, identifier extraction, the range fetcher,
//!   and the [`Harvester`] consumer surface.
//!
//! The consumer surface is intentionally two operations:
//! [`Harvester::discover_identifiers`] sweeps one collection for every
//! hosted-page identifier matching the configured URL glob, and
//! [`Harvester::extract_html`] turns one capture locator into its decoded
//! HTML (or `None` — malformed captures are routine, never fatal).

pub mod config;
pub mod error;
mod fetch;
mod pipeline;
mod slug;

pub use crate::config::{Caps, Config};
pub use crate::slug::extract_identifier;
pub use ccdig_index::{CaptureQuery, CaptureRecord, CollectionInfo, IndexClient, RangeLocator};

use crate::error::{ErrorKind, Result};
use ccdig_http::{HttpClient, TransportHandle};
use exn::ResultExt;
use futures::StreamExt;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::instrument;

/// The pipeline facade: one transport, one configuration, no other state.
///
/// Construct one per process with [`Harvester::new`] and share it; every
/// operation is independent and holds no state between calls. Tests inject
/// a canned transport through [`Harvester::with_transport`].
pub struct Harvester {
    transport: TransportHandle,
    config: Config,
}

impl Harvester {
    /// Build a harvester with a live HTTP client.
    pub fn new(config: Config) -> Result<Self> {
        let client = HttpClient::new(&config.user_agent).or_raise(|| ErrorKind::Config)?;
        Ok(Self::with_transport(Arc::new(client), config))
    }

    /// Build a harvester over an injected transport.
    pub fn with_transport(transport: TransportHandle, config: Config) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// An [`IndexClient`] sharing this harvester's transport and timeout.
    pub fn index_client(&self) -> IndexClient {
        IndexClient::new(Arc::clone(&self.transport), self.config.index_base.clone(), self.config.timeout())
    }

    /// Sweep one collection for every hosted-page identifier matching the
    /// configured URL glob.
    ///
    /// With no `collection_id` the newest collection in the directory is
    /// used. The page count is resolved first, then pages are fetched with
    /// bounded concurrency and folded into one set; fetch order doesn't
    /// affect the result. Directory, page-count, and page failures are all
    /// fatal — a partial sweep would silently under-report.
    #[instrument(skip(self), fields(collection, pages, identifiers))]
    pub async fn discover_identifiers(&self, collection_id: Option<&str>) -> Result<HashSet<String>> {
        let index = self.index_client();
        let collection = match collection_id {
            Some(id) => id.to_string(),
            None => index.latest_collection().await.or_raise(|| ErrorKind::Index)?.id,
        };
        tracing::Span::current().record("collection", collection.as_str());

        let query = CaptureQuery::new(&self.config.discovery_pattern)
            .filter("status:200")
            .filter("mime:text/html")
            .page_size(self.config.page_size);
        let pages = index.page_count(&collection, &query).await.or_raise(|| ErrorKind::Index)?;
        tracing::Span::current().record("pages", pages);

        let mut identifiers = HashSet::new();
        let mut page_results = futures::stream::iter(0..pages)
            .map(|page| index.fetch_page(&collection, &query, page))
            .buffer_unordered(self.config.page_concurrency.max(1));
        while let Some(result) = page_results.next().await {
            let records = result.or_raise(|| ErrorKind::Index)?;
            for record in records {
                // The index's own metadata is advisory; re-check the status
                // it claims before trusting the row.
                if !record.is_ok_status() {
                    continue;
                }
                if let Some(identifier) = extract_identifier(&record.url) {
                    identifiers.insert(identifier);
                }
            }
        }
        tracing::Span::current().record("identifiers", identifiers.len());
        Ok(identifiers)
    }

    /// Recover the decoded HTML of one capture, under the configured caps.
    ///
    /// Returns `None` for anything that stops this one capture from
    /// producing an HTML document — unreachable range, corrupt gzip,
    /// missing response boundary, size caps, a non-HTML body. Malformed
    /// captures are expected in a public archive, so none of this aborts a
    /// batch; the failure stage is logged at debug level. Stateless and
    /// idempotent.
    pub async fn extract_html(&self, locator: &RangeLocator) -> Option<String> {
        self.extract_html_with(locator, &self.config.caps()).await
    }

    /// [`extract_html`](Self::extract_html) with per-call cap overrides.
    pub async fn extract_html_with(&self, locator: &RangeLocator, caps: &Caps) -> Option<String> {
        match pipeline::try_extract(self.transport.as_ref(), &self.config.data_base, locator, caps).await {
            Ok(html) => html,
            Err(error) => {
                tracing::debug!(%error, filename = %locator.filename, offset = locator.offset, "capture dropped");
                None
            },
        }
    }
}
