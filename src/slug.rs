//! Identifier extraction from capture URLs.

use std::sync::LazyLock;
use url::Url;

/// Path segments that name site infrastructure rather than a hosted page.
static RESERVED_SEGMENTS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    vec![
        "api",
        "assets",
        "embed",
        "favicon.ico",
        "jobs",
        "robots.txt",
        "sitemap.xml",
        "static",
    ]
});

/// Extract the hosted-page identifier from a capture URL.
///
/// The identifier is the first path segment, lowercased. Returns `None` for
/// the bare root, for URLs that don't parse, and for reserved infrastructure
/// segments like `api` or `robots.txt` (a reserved first segment rejects the
/// whole URL, even with deeper path components after it).
pub fn extract_identifier(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.find(|segment| !segment.is_empty())?;
    let identifier = segment.trim().to_lowercase();
    if identifier.is_empty() || RESERVED_SEGMENTS.contains(&identifier.as_str()) {
        return None;
    }
    Some(identifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://jobs.example.com/smallpdf", "smallpdf")]
    #[case("https://jobs.example.com/SmallPDF", "smallpdf")]
    #[case("https://jobs.example.com/acme-corp/", "acme-corp")]
    #[case("https://jobs.example.com/acme/senior-engineer-1234", "acme")]
    #[case("https://jobs.example.com//double-slash", "double-slash")]
    #[case("https://jobs.example.com/acme?utm_source=x#apply", "acme")]
    fn test_extracts_first_segment(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(extract_identifier(url).as_deref(), Some(expected));
    }

    #[rstest]
    #[case("https://jobs.example.com/")]
    #[case("https://jobs.example.com")]
    #[case("https://jobs.example.com/robots.txt")]
    #[case("https://jobs.example.com/sitemap.xml")]
    #[case("https://jobs.example.com/favicon.ico")]
    #[case("https://jobs.example.com/api/org/acme")]
    #[case("https://jobs.example.com/static/app.js")]
    #[case("https://jobs.example.com/assets/logo.png")]
    #[case("https://jobs.example.com/embed/widget")]
    #[case("https://jobs.example.com/jobs/1234")]
    #[case("not a url at all")]
    fn test_rejects_reserved_and_invalid(#[case] url: &str) {
        assert_eq!(extract_identifier(url), None);
    }

    #[test]
    fn test_reserved_check_is_case_insensitive() {
        assert_eq!(extract_identifier("https://jobs.example.com/API/x"), None);
    }
}
