//! Pipeline Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A pipeline error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Extraction-local kinds (`Network`, `Protocol`, `Parse`, `Decode`,
/// `Capacity`) are recovered inside [`Harvester::extract_html`]
/// (crate::Harvester::extract_html) and become `None`; they exist so logs
/// and tests can tell *why* a capture was dropped. `Index` and `Config`
/// are fatal to the operation that raised them.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unreachable host, reset connection, or a blown deadline.
    #[display("network failure")]
    Network,
    /// The exchange violated protocol expectations.
    #[display("protocol violation: {_0}")]
    Protocol(#[error(not(source))] &'static str),
    /// The record bytes had no parseable WARC/HTTP structure.
    #[display("unparseable record: {_0}")]
    Parse(#[error(not(source))] &'static str),
    /// An encoding in the record could not be reversed.
    #[display("undecodable record")]
    Decode,
    /// A compressed or decompressed size cap was exceeded.
    #[display("record exceeds size caps")]
    Capacity,
    /// The collection directory or capture index failed; discovery cannot
    /// proceed without them.
    #[display("capture index unavailable")]
    Index,
    /// Configuration could not be assembled.
    #[display("invalid configuration")]
    Config,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Network | ErrorKind::Index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(
            ErrorKind::Protocol("expected partial content").to_string(),
            "protocol violation: expected partial content"
        );
        assert_eq!(ErrorKind::Capacity.to_string(), "record exceeds size caps");
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::Network.is_retryable());
        assert!(!ErrorKind::Capacity.is_retryable());
        assert!(!ErrorKind::Parse("zero-length locator").is_retryable());
    }
}
