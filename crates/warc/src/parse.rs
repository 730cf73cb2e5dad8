//! Locating and parsing the HTTP response embedded in a WARC record.
//!
//! A decompressed record is a WARC header block, a blank line, and then a
//! verbatim HTTP response (status line, headers, blank line, body). Nothing
//! here assumes the WARC headers are well-formed; the parser only needs the
//! terminator that ends them.

use crate::error::{ErrorKind, Result};
use exn::OptionExt;
use memchr::memmem;
use std::collections::HashMap;
use tracing::instrument;

/// Case-insensitive HTTP header map.
///
/// Keys are lowercased on insert; lookups lowercase the probe. Duplicate
/// headers keep the last value seen, which is enough for the handful of
/// framing headers this pipeline inspects.
#[derive(Debug, Clone, Default)]
pub struct Headers(HashMap<String, String>);

impl Headers {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut headers = Self::default();
        for (name, value) in pairs {
            headers.insert(name, value);
        }
        headers
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// True when `name` is present and its value contains `needle`,
    /// ASCII case-insensitively.
    pub fn value_contains(&self, name: &str, needle: &str) -> bool {
        self.get(name).is_some_and(|value| value.to_ascii_lowercase().contains(&needle.to_ascii_lowercase()))
    }

    fn insert(&mut self, name: &str, value: &str) {
        self.0.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
    }
}

/// The embedded HTTP response, with the body still borrowed from the
/// record bytes.
#[derive(Debug)]
pub struct HttpPayload<'a> {
    pub status_line: String,
    pub headers: Headers,
    pub body: &'a [u8],
}

/// Locate and parse the HTTP response inside decompressed record bytes.
///
/// Steps, in order:
/// 1. find the terminator of the WARC header block (`\r\n\r\n`, falling
///    back to `\n\n`),
/// 2. scan forward from it for the literal `HTTP/` marker,
/// 3. find the terminator of the embedded header block,
/// 4. require a `HTTP/<digit>.<digit> 200` status line — CDX filtering
///    should exclude non-200 captures already, but the index metadata is
///    not trusted,
/// 5. split the remaining header lines on the first colon.
///
/// The body is everything after the embedded header terminator.
#[instrument(skip(raw), fields(record_size = raw.len(), body_size))]
pub fn parse_http_response(raw: &[u8]) -> Result<HttpPayload<'_>> {
    let (_, after_warc) = find_terminator(raw, 0).ok_or_raise(|| ErrorKind::NoBoundary)?;
    let http_start =
        memmem::find(&raw[after_warc..], b"HTTP/").map(|i| after_warc + i).ok_or_raise(|| ErrorKind::NoBoundary)?;
    let (header_end, body_start) = find_terminator(raw, http_start).ok_or_raise(|| ErrorKind::NoBoundary)?;

    let head = String::from_utf8_lossy(&raw[http_start..header_end]);
    let mut lines = head.lines();
    let status_line = lines.next().unwrap_or_default().trim().to_string();
    ensure_ok_status(&status_line)?;

    let mut headers = Headers::default();
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name, value);
        }
    }

    let body = &raw[body_start..];
    tracing::Span::current().record("body_size", body.len());
    Ok(HttpPayload {
        status_line,
        headers,
        body,
    })
}

/// Find the next header-block terminator at or after `from`.
///
/// `\r\n\r\n` is preferred over `\n\n` regardless of position, matching
/// how the records were written; returns `(terminator_start, first_byte_after)`.
fn find_terminator(haystack: &[u8], from: usize) -> Option<(usize, usize)> {
    if let Some(i) = memmem::find(&haystack[from..], b"\r\n\r\n") {
        return Some((from + i, from + i + 4));
    }
    memmem::find(&haystack[from..], b"\n\n").map(|i| (from + i, from + i + 2))
}

/// Require `HTTP/<digit>.<digit> 200 ...`.
fn ensure_ok_status(status_line: &str) -> Result<()> {
    let mut parts = status_line.split_ascii_whitespace();
    let version = parts.next().unwrap_or_default().as_bytes();
    let code = parts.next().unwrap_or_default();
    let version_ok = version.len() == 8
        && version.starts_with(b"HTTP/")
        && version[5].is_ascii_digit()
        && version[6] == b'.'
        && version[7].is_ascii_digit();
    if !version_ok || code != "200" {
        exn::bail!(ErrorKind::NotOk(status_line.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record(http: &str) -> Vec<u8> {
        let mut raw = Vec::new();
        raw.extend_from_slice(b"WARC/1.0\r\nWARC-Type: response\r\nWARC-Target-URI: https://x.example/\r\n\r\n");
        raw.extend_from_slice(http.as_bytes());
        raw
    }

    #[test]
    fn test_parses_crlf_record() {
        let raw = record("HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nX-Extra: yes\r\n\r\n<html></html>");
        let payload = parse_http_response(&raw).unwrap();
        assert_eq!(payload.status_line, "HTTP/1.1 200 OK");
        assert_eq!(payload.headers.get("content-type"), Some("text/html"));
        assert_eq!(payload.body, b"<html></html>");
    }

    #[test]
    fn test_lf_only_fallback() {
        let raw = b"WARC/1.0\nWARC-Type: response\n\nHTTP/1.0 200 OK\nContent-Type: text/html\n\nbody".to_vec();
        let payload = parse_http_response(&raw).unwrap();
        assert_eq!(payload.body, b"body");
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let raw = record("HTTP/1.1 200 OK\r\nCONTENT-TYPE: text/html\r\n\r\nx");
        let payload = parse_http_response(&raw).unwrap();
        assert_eq!(payload.headers.get("Content-Type"), Some("text/html"));
        assert!(payload.headers.value_contains("content-TYPE", "TEXT/HTML"));
    }

    #[test]
    fn test_header_value_split_on_first_colon() {
        let raw = record("HTTP/1.1 200 OK\r\nLocation: https://x.example/a\r\n\r\nx");
        let payload = parse_http_response(&raw).unwrap();
        assert_eq!(payload.headers.get("location"), Some("https://x.example/a"));
    }

    #[test]
    fn test_no_warc_terminator() {
        let err = parse_http_response(b"WARC/1.0\r\nWARC-Type: response").unwrap_err();
        assert!(matches!(&*err, ErrorKind::NoBoundary));
    }

    #[test]
    fn test_no_http_marker() {
        let err = parse_http_response(b"WARC/1.0\r\n\r\nthis record has no response in it").unwrap_err();
        assert!(matches!(&*err, ErrorKind::NoBoundary));
    }

    #[test]
    fn test_unterminated_http_headers() {
        let err = parse_http_response(b"WARC/1.0\r\n\r\nHTTP/1.1 200 OK\r\nContent-Type: text/html").unwrap_err();
        assert!(matches!(&*err, ErrorKind::NoBoundary));
    }

    #[rstest]
    #[case("HTTP/1.1 404 Not Found")]
    #[case("HTTP/1.1 301 Moved Permanently")]
    #[case("HTTP/1.1 2000 Weird")]
    #[case("HTTP/x.y 200 OK")]
    fn test_non_ok_status_rejected(#[case] status_line: &str) {
        let raw = record(&format!("{status_line}\r\nContent-Type: text/html\r\n\r\nbody"));
        let err = parse_http_response(&raw).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotOk(_)));
    }

    #[test]
    fn test_status_reason_is_optional() {
        let raw = record("HTTP/1.1 200\r\n\r\nbody");
        assert!(parse_http_response(&raw).is_ok());
    }
}
