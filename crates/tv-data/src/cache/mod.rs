//! Page caching for server-mode tables

use std::sync::Arc;
use parking_lot::RwLock;
use ahash::AHashMap;

use crate::sources::Page;

struct CacheInner {
    pages: AHashMap<String, Page>,
    /// Least recently used first
    access_order: Vec<String>,
}

/// Bounded cache of fetched pages keyed by request key
#[derive(Clone)]
pub struct PageCache {
    inner: Arc<RwLock<CacheInner>>,
    max_pages: usize,
}

impl PageCache {
    /// Create a new page cache
    pub fn new(max_pages: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CacheInner {
                pages: AHashMap::new(),
                access_order: Vec::new(),
            })),
            max_pages: max_pages.max(1),
        }
    }

    /// Get a page from cache and mark it as recently used
    pub fn get(&self, key: &str) -> Option<Page> {
        let mut inner = self.inner.write();
        let page = inner.pages.get(key).cloned()?;
        touch(&mut inner.access_order, key);
        Some(page)
    }

    /// Put a page in cache, evicting the least recently used one at capacity
    pub fn put(&self, key: impl Into<String>, page: Page) {
        let key = key.into();
        let mut inner = self.inner.write();

        if inner.pages.len() >= self.max_pages && !inner.pages.contains_key(&key) && !inner.access_order.is_empty() {
            let oldest = inner.access_order.remove(0);
            inner.pages.remove(&oldest);
        }

        touch(&mut inner.access_order, &key);
        inner.pages.insert(key, page);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.read().pages.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear the cache
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.pages.clear();
        inner.access_order.clear();
    }
}

fn touch(order: &mut Vec<String>, key: &str) {
    order.retain(|k| k != key);
    order.push(key.to_string());
}
