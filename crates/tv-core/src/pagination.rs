//! Pagination coordinator
//!
//! In client mode the rows are sliced locally and the page count is derived
//! from the row count. In server mode the rows already are one page and the
//! page count comes from the caller's fetch metadata.

use serde::{Deserialize, Serialize};

/// Where pages are cut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationMode {
    #[default]
    Client,
    Server,
}

/// Page count for `total` rows, never less than 1
pub fn max_page(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 1;
    }
    total.div_ceil(per_page).max(1)
}

/// One page worth of rows plus the page count
#[derive(Debug, PartialEq)]
pub struct PageSlice<'a, X> {
    pub rows: &'a [X],
    pub max_page: usize,
}

/// Cut the requested page.
///
/// `page` is 1-based. Server mode returns `rows` untouched and takes the page
/// count from `server_max_page`.
pub fn paginate<X>(
    rows: &[X],
    page: usize,
    per_page: usize,
    mode: PaginationMode,
    server_max_page: Option<usize>,
) -> PageSlice<'_, X> {
    match mode {
        PaginationMode::Server => PageSlice {
            rows,
            max_page: server_max_page.unwrap_or(1).max(1),
        },
        PaginationMode::Client => {
            let per_page = per_page.max(1);
            let start = page.saturating_sub(1).saturating_mul(per_page).min(rows.len());
            let end = start.saturating_add(per_page).min(rows.len());
            PageSlice {
                rows: &rows[start..end],
                max_page: max_page(rows.len(), per_page),
            }
        }
    }
}

/// Snapshot of the pagination state handed to the rendering layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationView {
    pub mode: PaginationMode,
    pub current_page: usize,
    pub per_page: usize,
    pub max_page: usize,
    pub total_records: usize,
}

impl PaginationView {
    /// Which records the current page shows
    pub fn summary(&self) -> PaginationSummary {
        if self.total_records == 0 {
            return PaginationSummary { from: 0, to: 0, total: 0 };
        }
        let from = (self.current_page.saturating_sub(1) * self.per_page + 1).min(self.total_records);
        let to = (self.current_page * self.per_page).min(self.total_records);
        PaginationSummary {
            from,
            to,
            total: self.total_records,
        }
    }
}

/// 1-based record range of the current page, `0-0` when there are no records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationSummary {
    pub from: usize,
    pub to: usize,
    pub total: usize,
}

impl std::fmt::Display for PaginationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Showing {}-{} of {} records", self.from, self.to, self.total)
    }
}

/// Outcome of a page or page-size change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageChange {
    /// Out of range, nothing changed
    Ignored,
    /// Client mode: the local page moved
    Local { page: usize, per_page: usize },
    /// Server mode: the caller has to fetch this page
    Refetch { page: usize, per_page: usize },
}

/// Page state of one table
#[derive(Debug, Clone)]
pub struct Paginator {
    enabled: bool,
    mode: PaginationMode,
    current_page: usize,
    per_page: usize,
    server_max_page: Option<usize>,
    server_total: Option<usize>,
}

impl Paginator {
    pub fn new(enabled: bool, mode: PaginationMode, per_page: usize) -> Self {
        Self {
            enabled,
            mode,
            current_page: 1,
            per_page: per_page.max(1),
            server_max_page: None,
            server_total: None,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn mode(&self) -> PaginationMode {
        self.mode
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Record the authoritative page metadata of the last server fetch
    pub fn set_server_meta(&mut self, current_page: usize, max_page: usize, total_records: usize) {
        self.current_page = current_page.max(1);
        self.server_max_page = Some(max_page);
        self.server_total = Some(total_records);
    }

    /// Page count given the number of rows left after filtering and search
    pub fn max_page(&self, row_count: usize) -> usize {
        if !self.enabled {
            return 1;
        }
        match self.mode {
            PaginationMode::Server => self.server_max_page.unwrap_or(1).max(1),
            PaginationMode::Client => max_page(row_count, self.per_page),
        }
    }

    /// Rows to show for the current page
    pub fn paginate<'a, X>(&self, rows: &'a [X]) -> &'a [X] {
        if !self.enabled {
            return rows;
        }
        paginate(rows, self.current_page, self.per_page, self.mode, self.server_max_page).rows
    }

    /// Move to another page. Pages outside `1..=max_page` are ignored.
    pub fn handle_page_change(&mut self, new_page: usize, row_count: usize) -> PageChange {
        if new_page < 1 || new_page > self.max_page(row_count) {
            return PageChange::Ignored;
        }

        self.current_page = new_page;
        match self.mode {
            PaginationMode::Server => PageChange::Refetch {
                page: new_page,
                per_page: self.per_page,
            },
            PaginationMode::Client => PageChange::Local {
                page: new_page,
                per_page: self.per_page,
            },
        }
    }

    /// Change the page size and jump to `new_page`
    pub fn handle_per_page_change(&mut self, new_per_page: usize, new_page: usize) -> PageChange {
        self.per_page = new_per_page.max(1);
        self.current_page = new_page.max(1);
        match self.mode {
            PaginationMode::Server => PageChange::Refetch {
                page: self.current_page,
                per_page: self.per_page,
            },
            PaginationMode::Client => PageChange::Local {
                page: self.current_page,
                per_page: self.per_page,
            },
        }
    }

    /// Keep the current page inside the range after the row count shrank
    pub fn clamp(&mut self, row_count: usize) {
        if self.mode == PaginationMode::Client {
            self.current_page = self.current_page.min(self.max_page(row_count)).max(1);
        }
    }

    /// Back to the first page
    pub fn reset(&mut self, per_page: usize) {
        self.current_page = 1;
        self.per_page = per_page.max(1);
    }

    /// Controls are hidden when disabled, while loading, and for grouped
    /// client-side tables where a page would split a group
    pub fn should_show(&self, loading: bool, grouped: bool) -> bool {
        if !self.enabled || loading {
            return false;
        }
        !(self.mode == PaginationMode::Client && grouped)
    }

    pub fn view(&self, row_count: usize) -> PaginationView {
        let total_records = match self.mode {
            PaginationMode::Server => self.server_total.unwrap_or(row_count),
            PaginationMode::Client => row_count,
        };
        PaginationView {
            mode: self.mode,
            current_page: self.current_page,
            per_page: self.per_page,
            max_page: self.max_page(row_count),
            total_records,
        }
    }
}
