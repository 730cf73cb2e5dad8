//! Pure decoding pipeline for range-fetched WARC records.
//!
//! Everything in this crate is synchronous and I/O-free: bytes in, bytes or
//! text out. The stages mirror how a record is unwrapped — gunzip the
//! record ([`decompress_record`]), locate and parse the embedded HTTP
//! response ([`parse_http_response`]), reverse transfer and content
//! encodings ([`decode_body`]), resolve the charset and decode to text
//! ([`decode_text`]), then decide whether the result is HTML
//! ([`looks_like_html`]).

mod charset;
mod decode;
pub mod error;
mod html;
mod parse;
mod record;

pub use crate::charset::{decode_text, resolve_charset};
pub use crate::decode::decode_body;
pub use crate::html::looks_like_html;
pub use crate::parse::{Headers, HttpPayload, parse_http_response};
pub use crate::record::decompress_record;

/// How far into a body the meta-charset and HTML-marker scans look.
pub(crate) const SNIFF_WINDOW_BYTES: usize = 4096;
