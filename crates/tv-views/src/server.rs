//! Server-mode page fetching
//!
//! Every fetch takes a generation number. A response is applied only if no
//! newer fetch started in the meantime, so the last request always wins.
//! While a new page loads the previous one stays visible. A cached copy of
//! the requested page is shown at once but still revalidated against the
//! source.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error};
use tv_data::{Page, PageCache, PageRequest, PageSource};

/// Maximum number of pages kept per pager
const DEFAULT_CACHE_PAGES: usize = 32;

/// Fetch state shown to the rendering layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// Nothing requested yet
    Idle,
    /// First fetch, no page to show yet
    Loading,
    /// Fetching while the last good page stays visible
    Revalidating,
    Ready,
    /// The last fetch failed; distinct from an empty result
    Failed(String),
}

impl FetchStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchStatus::Loading | FetchStatus::Revalidating)
    }
}

/// What happened to one fetch
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Applied(Page),
    /// A newer fetch started before this one finished
    Superseded,
    Failed(String),
}

struct PagerState {
    generation: u64,
    status: FetchStatus,
    page: Option<Page>,
    request: Option<PageRequest>,
}

/// Fetches pages from a [`PageSource`]
#[derive(Clone)]
pub struct ServerPager {
    source: Arc<dyn PageSource>,
    cache: PageCache,
    state: Arc<Mutex<PagerState>>,
}

impl ServerPager {
    pub fn new(source: Arc<dyn PageSource>) -> Self {
        Self::with_cache(source, PageCache::new(DEFAULT_CACHE_PAGES))
    }

    pub fn with_cache(source: Arc<dyn PageSource>, cache: PageCache) -> Self {
        Self {
            source,
            cache,
            state: Arc::new(Mutex::new(PagerState {
                generation: 0,
                status: FetchStatus::Idle,
                page: None,
                request: None,
            })),
        }
    }

    pub fn status(&self) -> FetchStatus {
        self.state.lock().status.clone()
    }

    /// Last successfully applied page
    pub fn page(&self) -> Option<Page> {
        self.state.lock().page.clone()
    }

    /// Request of the last applied page
    pub fn request(&self) -> Option<PageRequest> {
        self.state.lock().request.clone()
    }

    /// Forget cached pages, e.g. after the underlying data changed
    pub fn invalidate(&self) {
        self.cache.clear();
    }

    /// Fetch a page, superseding any fetch still in flight
    pub async fn fetch(&self, request: PageRequest) -> FetchOutcome {
        let key = request.cache_key();

        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;

            if let Some(page) = self.cache.get(&key) {
                debug!("Showing cached {} while revalidating", key);
                state.page = Some(page);
                state.request = Some(request.clone());
            }

            state.status = if state.page.is_some() {
                FetchStatus::Revalidating
            } else {
                FetchStatus::Loading
            };
            state.generation
        };

        let result = self.source.fetch(&request).await;

        let mut state = self.state.lock();
        if state.generation != generation {
            debug!("Discarding stale response for {} from {}", key, self.source.source_name());
            return FetchOutcome::Superseded;
        }

        match result {
            Ok(page) => {
                self.cache.put(key, page.clone());
                state.status = FetchStatus::Ready;
                state.page = Some(page.clone());
                state.request = Some(request);
                FetchOutcome::Applied(page)
            }
            Err(e) => {
                let message = e.to_string();
                error!("Failed to fetch {} from {}: {}", key, self.source.source_name(), message);
                state.status = FetchStatus::Failed(message.clone());
                FetchOutcome::Failed(message)
            }
        }
    }
}
