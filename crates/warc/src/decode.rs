//! Transfer-coding and content-encoding reversal.
//!
//! Order matters: chunked transfer framing is removed first, then whichever
//! content-encoding the response declared. Both steps degrade to "keep the
//! bytes as-is" on failure — a body that fails to decode may still carry
//! enough signal for the acceptance gate to make a clean decision, and a
//! hard failure here would turn routine archive noise into lost captures.

use crate::parse::Headers;
use brotli::Decompressor as BrotliDecoder;
use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use std::io::Read;
use tracing::instrument;

const BROTLI_BUFFER_SIZE: usize = 4096;

/// Reverse chunked transfer coding and content-encoding, in that order.
#[instrument(skip(body, headers), fields(input_size = body.len(), output_size))]
pub fn decode_body(body: &[u8], headers: &Headers) -> Vec<u8> {
    let bytes = if headers.value_contains("transfer-encoding", "chunked") {
        match decode_chunked(body) {
            Some(unchunked) => unchunked,
            None => {
                tracing::debug!("chunked framing did not parse; keeping body as-is");
                body.to_vec()
            },
        }
    } else {
        body.to_vec()
    };

    let decoded = if headers.value_contains("content-encoding", "gzip") {
        gunzip(&bytes)
    } else if headers.value_contains("content-encoding", "br") {
        unbrotli(&bytes)
    } else if headers.value_contains("content-encoding", "deflate") {
        inflate(&bytes)
    } else {
        None
    };

    let output = match decoded {
        Some(decoded) => decoded,
        None => bytes,
    };
    tracing::Span::current().record("output_size", output.len());
    output
}

/// Reassemble a chunked body: hex size line, that many bytes, CRLF, until
/// the zero-size chunk. Trailers after the zero chunk are ignored. Bare-LF
/// line endings and chunk extensions (`;...`) are tolerated.
fn decode_chunked(body: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    let mut pos = 0usize;
    loop {
        let line_end = pos + memchr::memchr(b'\n', body.get(pos..)?)?;
        let line = std::str::from_utf8(&body[pos..line_end]).ok()?.trim_end_matches('\r');
        let size_hex = line.split(';').next()?.trim();
        let size = usize::from_str_radix(size_hex, 16).ok()?;
        pos = line_end + 1;
        if size == 0 {
            break;
        }
        // A hostile size line can declare a chunk near usize::MAX; the
        // addition must not overflow before the bounds check rejects it.
        let data_end = pos.checked_add(size)?;
        let data = body.get(pos..data_end)?;
        out.extend_from_slice(data);
        pos = data_end;
        if body.get(pos) == Some(&b'\r') {
            pos += 1;
        }
        if body.get(pos) != Some(&b'\n') {
            return None;
        }
        pos += 1;
    }
    Some(out)
}

fn gunzip(bytes: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(bytes).read_to_end(&mut out).ok()?;
    Some(out)
}

/// Servers disagree on whether `deflate` means zlib-wrapped or raw; try
/// zlib first, then raw.
fn inflate(bytes: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    if ZlibDecoder::new(bytes).read_to_end(&mut out).is_ok() {
        return Some(out);
    }
    out.clear();
    DeflateDecoder::new(bytes).read_to_end(&mut out).ok()?;
    Some(out)
}

fn unbrotli(bytes: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    BrotliDecoder::new(bytes, BROTLI_BUFFER_SIZE).read_to_end(&mut out).ok()?;
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::{GzEncoder, ZlibEncoder};
    use std::io::Write;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn headers(pairs: &[(&str, &str)]) -> Headers {
        Headers::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn test_identity_passthrough() {
        let out = decode_body(b"plain body", &headers(&[]));
        assert_eq!(out, b"plain body");
    }

    #[test]
    fn test_chunked_reassembly() {
        let body = b"4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n";
        let out = decode_body(body, &headers(&[("Transfer-Encoding", "chunked")]));
        assert_eq!(out, b"Wikipedia");
    }

    #[test]
    fn test_chunked_with_extension_and_bare_lf() {
        let body = b"4;ext=1\nWiki\n3\nped\n0\n";
        let out = decode_body(body, &headers(&[("Transfer-Encoding", "chunked")]));
        assert_eq!(out, b"Wikiped");
    }

    #[test]
    fn test_malformed_chunked_kept_as_is() {
        let body = b"not hex\r\nWiki\r\n0\r\n\r\n";
        let out = decode_body(body, &headers(&[("Transfer-Encoding", "chunked")]));
        assert_eq!(out, body);
    }

    #[test]
    fn test_chunked_huge_declared_size_kept_as_is() {
        // Declared chunk size near usize::MAX; must fall back to the raw
        // bytes instead of overflowing.
        let body = b"ffffffffffffffff\r\ndata";
        let out = decode_body(body, &headers(&[("Transfer-Encoding", "chunked")]));
        assert_eq!(out, body);
    }

    #[test]
    fn test_chunked_size_past_end_kept_as_is() {
        let body = b"ff\r\nshort\r\n0\r\n\r\n";
        let out = decode_body(body, &headers(&[("Transfer-Encoding", "chunked")]));
        assert_eq!(out, body);
    }

    #[test]
    fn test_gzip_content_encoding() {
        let compressed = gzip(b"<html>hello</html>");
        let out = decode_body(&compressed, &headers(&[("Content-Encoding", "gzip")]));
        assert_eq!(out, b"<html>hello</html>");
    }

    #[test]
    fn test_chunked_then_gzip() {
        let compressed = gzip(b"<html>layered</html>");
        let mut body = Vec::new();
        body.extend_from_slice(format!("{:x}\r\n", compressed.len()).as_bytes());
        body.extend_from_slice(&compressed);
        body.extend_from_slice(b"\r\n0\r\n\r\n");
        let out = decode_body(
            &body,
            &headers(&[("Transfer-Encoding", "chunked"), ("Content-Encoding", "gzip")]),
        );
        assert_eq!(out, b"<html>layered</html>");
    }

    #[test]
    fn test_zlib_deflate() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"deflated").unwrap();
        let compressed = encoder.finish().unwrap();
        let out = decode_body(&compressed, &headers(&[("Content-Encoding", "deflate")]));
        assert_eq!(out, b"deflated");
    }

    #[test]
    fn test_raw_deflate() {
        let mut encoder = flate2::write::DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"raw deflated").unwrap();
        let compressed = encoder.finish().unwrap();
        let out = decode_body(&compressed, &headers(&[("Content-Encoding", "deflate")]));
        assert_eq!(out, b"raw deflated");
    }

    #[test]
    fn test_brotli_content_encoding() {
        let mut compressed = Vec::new();
        {
            let mut encoder = brotli::CompressorWriter::new(&mut compressed, BROTLI_BUFFER_SIZE, 5, 22);
            encoder.write_all(b"<html>br</html>").unwrap();
        }
        let out = decode_body(&compressed, &headers(&[("Content-Encoding", "br")]));
        assert_eq!(out, b"<html>br</html>");
    }

    #[test]
    fn test_corrupt_content_encoding_kept_as_is() {
        let body = b"this is not gzip at all";
        let out = decode_body(body, &headers(&[("Content-Encoding", "gzip")]));
        assert_eq!(out, body);
    }

    #[test]
    fn test_x_gzip_value_matches() {
        let compressed = gzip(b"x");
        let out = decode_body(&compressed, &headers(&[("Content-Encoding", "x-gzip")]));
        assert_eq!(out, b"x");
    }
}
