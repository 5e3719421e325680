//! Server-mode row sources
//!
//! A server-mode table never holds the full dataset. It asks a [`PageSource`]
//! for one page at a time, keyed by page, page size, sorting, filters and
//! search. Transport is up to the implementation.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;
use tv_core::{
    accessor_map, display_string, filter_selection, max_page, paginate, search_selection, sort_selection,
    ColumnDescriptor, ColumnSort, FilterCondition, PaginationMode,
};

/// Everything a server needs to produce one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
    pub sorting: Vec<ColumnSort>,
    pub filters: Vec<FilterCondition>,
    pub search: String,
}

impl PageRequest {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page,
            per_page,
            sorting: Vec::new(),
            filters: Vec::new(),
            search: String::new(),
        }
    }

    /// Query string parameters in wire order.
    ///
    /// `q`, `sort` and `filter` are only present when non-empty. Sorts are
    /// `col:asc|desc` and filters `col:value`, both comma-joined.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string()), ("limit", self.per_page.to_string())];

        if !self.search.is_empty() {
            params.push(("q", self.search.clone()));
        }

        if !self.sorting.is_empty() {
            let sort = self
                .sorting
                .iter()
                .map(|s| format!("{}:{}", s.id, s.direction()))
                .collect::<Vec<_>>()
                .join(",");
            params.push(("sort", sort));
        }

        if !self.filters.is_empty() {
            let filter = self
                .filters
                .iter()
                .map(|f| format!("{}:{}", f.column_id, display_string(f.value.as_ref())))
                .collect::<Vec<_>>()
                .join(",");
            params.push(("filter", filter));
        }

        params
    }

    /// Stable identity of the request, used as cache key.
    ///
    /// Covers every field that changes the answer, including each filter's
    /// type and operator. Filter ids are left out.
    pub fn cache_key(&self) -> String {
        let filters: Vec<Value> = self
            .filters
            .iter()
            .map(|f| {
                json!({
                    "column": f.column_id,
                    "type": f.filter_type,
                    "operator": f.operator,
                    "value": f.value,
                })
            })
            .collect();

        json!({
            "page": self.page,
            "perPage": self.per_page,
            "sort": self.sorting,
            "filters": filters,
            "search": self.search,
        })
        .to_string()
    }
}

/// One fetched page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub rows: Vec<Value>,
    pub total_count: usize,
    pub total_pages: usize,
}

/// Page metadata in the standard paginated response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub per_page: usize,
}

/// Standard paginated response body: `{ "data": [...], "_metadata": {...} }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse {
    pub data: Vec<Value>,
    #[serde(rename = "_metadata")]
    pub metadata: PageMetadata,
}

impl From<PaginatedResponse> for Page {
    fn from(response: PaginatedResponse) -> Self {
        Page {
            rows: response.data,
            total_count: response.metadata.total_items,
            total_pages: response.metadata.total_pages,
        }
    }
}

/// Paged fetch
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch one page
    async fn fetch(&self, request: &PageRequest) -> anyhow::Result<Page>;

    /// Get the source name
    fn source_name(&self) -> &str;
}

/// Serves pages out of an in-memory dataset, applying the request the way a
/// backend would: filters, then search, then sorting, then the page slice.
pub struct StaticPageSource {
    name: String,
    rows: RwLock<Vec<Value>>,
    columns: Vec<ColumnDescriptor<Value>>,
    latency: Option<Duration>,
    failing: AtomicBool,
    fetches: AtomicUsize,
}

impl StaticPageSource {
    pub fn new(name: impl Into<String>, rows: Vec<Value>, columns: Vec<ColumnDescriptor<Value>>) -> Self {
        Self {
            name: name.into(),
            rows: RwLock::new(rows),
            columns,
            latency: None,
            failing: AtomicBool::new(false),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Delay every response, to exercise in-flight requests
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Replace the dataset, as if the backend data changed
    pub fn set_rows(&self, rows: Vec<Value>) {
        *self.rows.write() = rows;
    }

    /// Make every fetch fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of fetches served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn build_page(&self, request: &PageRequest) -> Page {
        let guard = self.rows.read();
        let rows: &[Value] = &guard;
        let accessors = accessor_map(&self.columns);
        let all: Vec<usize> = (0..rows.len()).collect();

        let selection = filter_selection(rows, &all, &request.filters, &accessors);
        let selection = search_selection(rows, &selection, &request.search, &self.columns);
        let selection = sort_selection(rows, &selection, &request.sorting, &accessors);

        let slice = paginate(&selection, request.page, request.per_page, PaginationMode::Client, None);
        Page {
            rows: slice.rows.iter().map(|&idx| rows[idx].clone()).collect(),
            total_count: selection.len(),
            total_pages: max_page(selection.len(), request.per_page),
        }
    }
}

#[async_trait]
impl PageSource for StaticPageSource {
    async fn fetch(&self, request: &PageRequest) -> anyhow::Result<Page> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("{} is unavailable", self.name);
        }

        let page = self.build_page(request);
        debug!(
            "{} served page {} ({} of {} rows)",
            self.name,
            request.page,
            page.rows.len(),
            page.total_count
        );
        Ok(page)
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}
