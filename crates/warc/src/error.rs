//! Record Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A record error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for record operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong
/// internally. All of them mean "this one capture is unusable" — malformed
/// and oversized records are routine in a public archive, so callers
/// recover per record rather than failing a batch.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The record's gzip stream is corrupt. Don't retry with the same input.
    #[display("corrupt record gzip stream")]
    CorruptRecord,
    /// Decompressed output exceeded the configured cap.
    #[display("record exceeds {limit} uncompressed bytes")]
    OverCap {
        /// The cap that was exceeded, in bytes.
        limit: u64,
    },
    /// No record/HTTP boundary could be located in the decompressed bytes.
    #[display("no embedded HTTP response found in record")]
    NoBoundary,
    /// The embedded status line is missing, malformed, or not a 200.
    #[display("embedded response is not HTTP 200: {_0}")]
    NotOk(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The record bytes are immutable once archived; retrying cannot help.
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::CorruptRecord.to_string(), "corrupt record gzip stream");
        assert_eq!(
            ErrorKind::OverCap { limit: 1024 }.to_string(),
            "record exceeds 1024 uncompressed bytes"
        );
        assert_eq!(
            ErrorKind::NotOk("HTTP/1.1 404 Not Found".to_string()).to_string(),
            "embedded response is not HTTP 200: HTTP/1.1 404 Not Found"
        );
    }

    #[test]
    fn error_kind_never_retryable() {
        assert!(!ErrorKind::CorruptRecord.is_retryable());
        assert!(!ErrorKind::NoBoundary.is_retryable());
    }
}
