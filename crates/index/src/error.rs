//! Index Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An index error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for index operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Everything here is fatal to the discovery operation that raised it: no
/// capture records can be derived without the directory and the page count.
/// Malformed individual NDJSON lines are *not* errors — they are skipped at
/// the parsing site.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The collection directory could not be fetched or parsed.
    #[display("collection directory unavailable")]
    Directory,
    /// The directory answered but listed no collections.
    #[display("collection directory is empty")]
    EmptyDirectory,
    /// The index endpoint could not be reached.
    #[display("capture index unreachable")]
    Unreachable,
    /// The index endpoint answered with an unexpected HTTP status.
    #[display("capture index returned HTTP {_0}")]
    Status(#[error(not(source))] u16),
    /// A response that must be JSON could not be parsed.
    #[display("malformed {_0} response")]
    Malformed(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ErrorKind::Unreachable | ErrorKind::Directory => true,
            ErrorKind::Status(status) => *status >= 500,
            ErrorKind::EmptyDirectory | ErrorKind::Malformed(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::Status(503).to_string(), "capture index returned HTTP 503");
        assert_eq!(ErrorKind::Malformed("collinfo").to_string(), "malformed collinfo response");
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::Unreachable.is_retryable());
        assert!(ErrorKind::Status(502).is_retryable());
        assert!(!ErrorKind::Status(404).is_retryable());
        assert!(!ErrorKind::Malformed("page").is_retryable());
    }
}
