//! Record extraction pipeline: locator in, HTML text out.

use crate::config::Caps;
use crate::error::{ErrorKind, Result};
use crate::fetch::fetch_range;
use ccdig_http::Transport;
use ccdig_index::RangeLocator;
use ccdig_warc::{decode_body, decode_text, decompress_record, looks_like_html, parse_http_response};
use tracing::instrument;

/// Run the whole extraction pipeline for one capture.
///
/// Fetches the compressed record, unwraps it down to decoded text, and
/// returns `Ok(None)` when the result isn't an HTML document. Every other
/// failure raises, classified by stage, so [`Harvester::extract_html`]
/// (crate::Harvester::extract_html) can log the stage that dropped the
/// capture.
#[instrument(skip_all, fields(filename = %locator.filename, offset = locator.offset))]
pub(crate) async fn try_extract(
    transport: &dyn Transport,
    data_base: &str,
    locator: &RangeLocator,
    caps: &Caps,
) -> Result<Option<String>> {
    let compressed = fetch_range(transport, data_base, locator, caps).await?;

    let raw = match decompress_record(&compressed, caps.max_uncompressed_bytes) {
        Ok(raw) => raw,
        Err(error) => match &*error {
            ccdig_warc::error::ErrorKind::OverCap { .. } => exn::bail!(ErrorKind::Capacity),
            _ => exn::bail!(ErrorKind::Decode),
        },
    };

    let payload = match parse_http_response(&raw) {
        Ok(payload) => payload,
        Err(error) => match &*error {
            ccdig_warc::error::ErrorKind::NotOk(_) => {
                exn::bail!(ErrorKind::Parse("embedded response is not a 200"))
            }
            _ => exn::bail!(ErrorKind::Parse("no embedded response boundary")),
        },
    };

    let body = decode_body(payload.body, &payload.headers);
    let text = decode_text(&body, &payload.headers);
    if looks_like_html(&text, &payload.headers) {
        Ok(Some(text))
    } else {
        tracing::debug!("capture is not an HTML document");
        Ok(None)
    }
}
