//! Wire models for the collection directory and the capture index.

use serde::Deserialize;

/// One entry from the collection directory (`collinfo.json`).
///
/// Collections are re-fetched on every run; the `id`
/// (`CC-MAIN-<year>-<week>`) is the only identity that matters locally.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CollectionInfo {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub timegate: Option<String>,
    #[serde(default, rename = "cdx-api")]
    pub cdx_api: Option<String>,
}

/// One capture row from a CDX NDJSON page.
///
/// The index serves numbers as strings and omits fields freely, so
/// everything beyond `url` and `timestamp` is optional and kept verbatim.
/// Rows are never mutated, only filtered and selected.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CaptureRecord {
    #[serde(default)]
    pub urlkey: Option<String>,
    /// 14-digit capture timestamp (`YYYYMMDDhhmmss`).
    pub timestamp: String,
    pub url: String,
    #[serde(default)]
    pub mime: Option<String>,
    #[serde(default, rename = "mime-detected")]
    pub mime_detected: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub digest: Option<String>,
    /// Compressed record length in bytes, string-encoded.
    #[serde(default)]
    pub length: Option<String>,
    /// Byte offset of the record inside `filename`, string-encoded.
    #[serde(default)]
    pub offset: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub languages: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

impl CaptureRecord {
    /// True when the index recorded a 200 exchange. Only such captures are
    /// eligible for extraction.
    pub fn is_ok_status(&self) -> bool {
        self.status.as_deref() == Some("200")
    }

    /// Advisory content-type hint. Never authoritative; acceptance is
    /// re-verified against the body after extraction.
    pub fn mime_hint(&self) -> Option<&str> {
        self.mime.as_deref().or(self.mime_detected.as_deref())
    }

    /// Where this capture lives in the bulk data store.
    ///
    /// Returns `None` when the row lacks a filename, the offset/length
    /// fields don't parse, or the length is zero — such rows cannot be
    /// fetched and are dropped before any network call.
    pub fn locator(&self) -> Option<RangeLocator> {
        let filename = self.filename.clone()?;
        let offset = self.offset.as_deref()?.parse().ok()?;
        let length: u64 = self.length.as_deref()?.parse().ok()?;
        if length == 0 {
            return None;
        }
        Some(RangeLocator {
            filename,
            offset,
            length,
        })
    }
}

/// Byte-range address of one compressed record: a pure locator value, not a
/// fetched payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeLocator {
    /// Object path inside the bulk data store.
    pub filename: String,
    pub offset: u64,
    pub length: u64,
}

impl RangeLocator {
    /// Inclusive bounds for a `Range: bytes=` header, or `None` for a
    /// zero-length locator. [`CaptureRecord::locator`] never produces one,
    /// but the fields are public and a zero length has no valid bounds.
    pub fn bounds(&self) -> Option<(u64, u64)> {
        if self.length == 0 {
            return None;
        }
        Some((self.offset, self.offset + self.length - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(line: &str) -> CaptureRecord {
        serde_json::from_str(line).unwrap()
    }

    #[test]
    fn test_capture_row_deserializes() {
        let row = record(
            r#"{"urlkey": "com,example,jobs)/acme", "timestamp": "20250102030405",
                "url": "https://jobs.example.com/acme", "mime": "text/html",
                "mime-detected": "text/html", "status": "200", "digest": "AAAA",
                "length": "4840", "offset": "1183742", "filename": "crawl-data/seg/file.warc.gz"}"#,
        );
        assert!(row.is_ok_status());
        assert_eq!(row.mime_hint(), Some("text/html"));
        let locator = row.locator().unwrap();
        assert_eq!(locator.filename, "crawl-data/seg/file.warc.gz");
        assert_eq!(locator.bounds(), Some((1_183_742, 1_188_581)));
    }

    #[test]
    fn test_sparse_row_deserializes() {
        let row = record(r#"{"timestamp": "20250102030405", "url": "https://jobs.example.com/acme"}"#);
        assert!(!row.is_ok_status());
        assert_eq!(row.mime_hint(), None);
        assert!(row.locator().is_none());
    }

    #[test]
    fn test_mime_detected_fallback() {
        let row = record(
            r#"{"timestamp": "20250102030405", "url": "https://x.example/", "mime-detected": "text/html"}"#,
        );
        assert_eq!(row.mime_hint(), Some("text/html"));
    }

    #[test]
    fn test_zero_length_has_no_locator() {
        let row = record(
            r#"{"timestamp": "20250102030405", "url": "https://x.example/",
                "length": "0", "offset": "12", "filename": "f.warc.gz"}"#,
        );
        assert!(row.locator().is_none());
    }

    #[test]
    fn test_zero_length_locator_has_no_bounds() {
        let locator = RangeLocator {
            filename: "f.warc.gz".to_string(),
            offset: 0,
            length: 0,
        };
        assert_eq!(locator.bounds(), None);
    }

    #[test]
    fn test_unparseable_offset_has_no_locator() {
        let row = record(
            r#"{"timestamp": "20250102030405", "url": "https://x.example/",
                "length": "10", "offset": "-3", "filename": "f.warc.gz"}"#,
        );
        assert!(row.locator().is_none());
    }

    #[test]
    fn test_collection_info_renamed_fields() {
        let info: CollectionInfo = serde_json::from_str(
            r#"{"id": "CC-MAIN-2025-30", "name": "July 2025",
                "timegate": "https://index.commoncrawl.org/CC-MAIN-2025-30/",
                "cdx-api": "https://index.commoncrawl.org/CC-MAIN-2025-30-index"}"#,
        )
        .unwrap();
        assert_eq!(info.id, "CC-MAIN-2025-30");
        assert!(info.cdx_api.unwrap().ends_with("-index"));
    }
}
