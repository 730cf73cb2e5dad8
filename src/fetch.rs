//! Byte-range retrieval of single records from the archive data store.

use crate::config::Caps;
use crate::error::{ErrorKind, Result};
use ccdig_http::{GetRequest, Transport};
use ccdig_index::RangeLocator;
use tracing::instrument;

/// Fetch exactly the compressed bytes of one record.
///
/// Issues a ranged GET against `{data_base}/{filename}` and insists on a
/// `206 Partial Content` response carrying a `Content-Range` header; a host
/// that ignores the range would otherwise hand back a multi-gigabyte archive
/// segment. Locators longer than the compressed cap are rejected before any
/// request is made.
#[instrument(skip(transport, locator, caps), fields(filename = %locator.filename, length = locator.length))]
pub(crate) async fn fetch_range(
    transport: &dyn Transport,
    data_base: &str,
    locator: &RangeLocator,
    caps: &Caps,
) -> Result<Vec<u8>> {
    let Some((start, end)) = locator.bounds() else {
        exn::bail!(ErrorKind::Parse("zero-length locator"));
    };
    if locator.length > caps.max_compressed_bytes {
        exn::bail!(ErrorKind::Capacity);
    }

    let url = format!("{}/{}", data_base.trim_end_matches('/'), locator.filename);
    let request = GetRequest::new(url, caps.timeout).with_range(start, end);

    let response = match transport.get(request).await {
        Ok(response) => response,
        Err(error) => {
            tracing::debug!(%error, "range fetch failed");
            exn::bail!(ErrorKind::Network);
        }
    };
    if response.status != 206 {
        exn::bail!(ErrorKind::Protocol("expected partial content"));
    }
    if response.content_range.is_none() {
        exn::bail!(ErrorKind::Protocol("missing content-range header"));
    }
    Ok(response.body)
}
