//! CDX query construction.

/// Builder for one capture index query.
///
/// The index accepts `filter` as a *repeatable* parameter, one predicate
/// per occurrence, AND-ed together. Each filter added here stays a separate
/// parameter; collapsing them into one would silently drop every predicate
/// but the last.
#[derive(Debug, Clone)]
pub struct CaptureQuery {
    url_pattern: String,
    filters: Vec<String>,
    fields: Vec<String>,
    sort_reverse: bool,
    limit: Option<u32>,
    page_size: u32,
}

/// Page size used when the caller does not override it.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

impl CaptureQuery {
    /// Query for `url_pattern`. A trailing `*` globs "this host and
    /// everything under it" (e.g. `jobs.example.com/*`); an exact URL
    /// matches only its own captures.
    pub fn new(url_pattern: impl Into<String>) -> Self {
        Self {
            url_pattern: url_pattern.into(),
            filters: Vec::new(),
            fields: Vec::new(),
            sort_reverse: false,
            limit: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Add one filter predicate, e.g. `status:200` or `mime:text/html`.
    pub fn filter(mut self, predicate: impl Into<String>) -> Self {
        self.filters.push(predicate.into());
        self
    }

    /// Restrict the returned columns (`fl` parameter).
    pub fn fields(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Newest captures first.
    pub fn sort_reverse(mut self) -> Self {
        self.sort_reverse = true;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Page size for the paginated sweep, in index blocks.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    fn base_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("url".to_string(), self.url_pattern.clone()),
            ("output".to_string(), "json".to_string()),
        ];
        for filter in &self.filters {
            params.push(("filter".to_string(), filter.clone()));
        }
        if !self.fields.is_empty() {
            params.push(("fl".to_string(), self.fields.join(",")));
        }
        if self.sort_reverse {
            params.push(("sort".to_string(), "reverse".to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }

    /// Parameters for the page-count (`showNumPages=true`) variant.
    ///
    /// The page size must match [`page_params`](Self::page_params) or the
    /// reported count will not line up with the pages actually served.
    pub(crate) fn count_params(&self) -> Vec<(String, String)> {
        let mut params = self.base_params();
        params.push(("pageSize".to_string(), self.page_size.to_string()));
        params.push(("showNumPages".to_string(), "true".to_string()));
        params
    }

    /// Parameters for fetching one page of the paginated sweep.
    pub(crate) fn page_params(&self, page: u32) -> Vec<(String, String)> {
        let mut params = self.base_params();
        params.push(("pageSize".to_string(), self.page_size.to_string()));
        params.push(("page".to_string(), page.to_string()));
        params
    }

    /// Parameters for a non-paginated lookup (single exact URL). Distinct
    /// from the sweep on purpose: no paging parameters at all.
    pub(crate) fn lookup_params(&self) -> Vec<(String, String)> {
        self.base_params()
    }
}
