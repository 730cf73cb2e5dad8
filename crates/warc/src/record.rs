//! Record decompression with a decompression-bomb cap.

use crate::error::{ErrorKind, Result};
use flate2::read::MultiGzDecoder;
use std::io::Read;
use tracing::instrument;

/// Gunzip one range-fetched record.
///
/// Archive segments are multi-member gzip files and a byte-range cut yields
/// exactly one member, so [`MultiGzDecoder`] is used and trailing bytes
/// after a complete member are tolerated. Output beyond
/// `max_uncompressed_bytes` raises [`OverCap`](ErrorKind::OverCap) — a
/// capture that inflates past the cap is treated as hostile, not truncated.
///
/// # Examples
///
/// ```
/// use std::io::Write;
/// use flate2::{Compression, write::GzEncoder};
/// use ccdig_warc::decompress_record;
///
/// let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
/// encoder.write_all(b"WARC/1.0\r\n...").unwrap();
/// let compressed = encoder.finish().unwrap();
///
/// let raw = decompress_record(&compressed, 1024).unwrap();
/// assert!(raw.starts_with(b"WARC/1.0"));
/// ```
#[instrument(skip(compressed), fields(input_size = compressed.len(), output_size))]
pub fn decompress_record(compressed: &[u8], max_uncompressed_bytes: u64) -> Result<Vec<u8>> {
    let mut raw = Vec::new();
    // Read one byte past the cap so "exactly at the cap" and "over it" are
    // distinguishable.
    let mut decoder = MultiGzDecoder::new(compressed).take(max_uncompressed_bytes + 1);
    match decoder.read_to_end(&mut raw) {
        Ok(_) => {},
        // A complete member already decoded; junk after it (an imprecise
        // range cut) doesn't invalidate what we have.
        Err(_) if !raw.is_empty() => {},
        Err(_) => exn::bail!(ErrorKind::CorruptRecord),
    }
    if raw.len() as u64 > max_uncompressed_bytes {
        exn::bail!(ErrorKind::OverCap {
            limit: max_uncompressed_bytes
        });
    }
    tracing::Span::current().record("output_size", raw.len());
    Ok(raw)
}
