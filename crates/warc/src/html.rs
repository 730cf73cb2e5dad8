//! HTML acceptance checks.

use crate::SNIFF_WINDOW_BYTES;
use crate::parse::Headers;

/// Decide whether decoded text should be treated as an HTML document.
///
/// A `content-type` of `text/html` or `application/xhtml+xml` accepts
/// immediately. Otherwise the first few kilobytes are scanned for document
/// markers, because archived responses routinely mislabel (or omit) their
/// content type.
pub fn looks_like_html(text: &str, headers: &Headers) -> bool {
    if let Some(content_type) = headers.get("content-type") {
        let content_type = content_type.to_ascii_lowercase();
        if content_type.contains("text/html") || content_type.contains("application/xhtml+xml") {
            return true;
        }
    }

    let mut end = text.len().min(SNIFF_WINDOW_BYTES);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let head = text[..end].to_ascii_lowercase();
    head.contains("<html") || head.contains("<body") || head.contains("<!doctype html")
}
