//! Charset resolution and text decoding for embedded response bodies.
//!
//! Resolution order, first match wins:
//! 1. `charset=` parameter of the `content-type` header,
//! 2. `<meta charset="...">` within the sniff window,
//! 3. `<meta http-equiv="content-type" content="...charset=...">` within
//!    the same window,
//! 4. UTF-8.
//!
//! Unknown labels and byte sequences that don't decode cleanly never fail:
//! decoding is lossy, with U+FFFD standing in for broken sequences.

use crate::SNIFF_WINDOW_BYTES;
use crate::parse::Headers;
use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::LazyLock;
use tracing::instrument;

/// Match `<meta charset="...">`.
static META_CHARSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>;]+)"#).expect("valid regex"));

/// Match `<meta http-equiv="Content-Type" content="...; charset=...">`.
static META_HTTP_EQUIV_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#,
    )
    .expect("valid regex")
});

/// Resolve the encoding to decode `body` with.
pub fn resolve_charset(body: &[u8], headers: &Headers) -> &'static Encoding {
    if let Some(content_type) = headers.get("content-type")
        && let Some(label) = charset_param(content_type)
        && let Some(encoding) = Encoding::for_label(label.as_bytes())
    {
        return encoding;
    }

    // ASCII-safe scan: lossy conversion of the prefix can mangle multi-byte
    // sequences, but charset labels inside meta tags are plain ASCII.
    let head = &body[..body.len().min(SNIFF_WINDOW_BYTES)];
    let head = String::from_utf8_lossy(head);
    for re in [&META_CHARSET_RE, &META_HTTP_EQUIV_RE] {
        if let Some(captures) = re.captures(&head)
            && let Some(label) = captures.get(1)
            && let Some(encoding) = Encoding::for_label(label.as_str().as_bytes())
        {
            return encoding;
        }
    }
    UTF_8
}

/// Decode body bytes to text using the resolved charset.
#[instrument(skip(body, headers), fields(body_size = body.len(), charset))]
pub fn decode_text(body: &[u8], headers: &Headers) -> String {
    let encoding = resolve_charset(body, headers);
    tracing::Span::current().record("charset", encoding.name());
    let (text, _, _) = encoding.decode(body);
    text.into_owned()
}

/// Extract the `charset=` parameter from a `content-type` value.
fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|segment| {
        let (name, value) = segment.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"').to_string())
        } else {
            None
        }
    })
}
