//! Persisted view state
//!
//! A table persists its layout and controls under one storage key as a JSON
//! object with camelCase fields. Each concern is written and read back only
//! while its feature flag is on. Storage failures are logged and the table
//! falls back to defaults; persistence never fails a command.

use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use tv_core::{ExpandedGroups, FilterState, SortingState};

use crate::config::{TableConfig, TableFeatures};
use crate::store::KeyValueStore;
use crate::DataError;

/// Current time in epoch milliseconds
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// The persisted form: every concern is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredViewState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_order: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_sizing: Option<AHashMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_visibility: Option<AHashMap<String, bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded_groups: Option<ExpandedGroups>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorting: Option<SortingState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    /// Epoch milliseconds of the save that wrote `search_query`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query_timestamp: Option<i64>,
}

/// The in-memory view state of one table
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub column_order: Vec<String>,
    pub column_sizing: AHashMap<String, f64>,
    pub column_visibility: AHashMap<String, bool>,
    pub group_by: Option<String>,
    pub expanded_groups: ExpandedGroups,
    pub per_page: usize,
    pub sorting: SortingState,
    pub filters: FilterState,
    pub search_query: String,
}

impl ViewState {
    /// Engine defaults for the given column order
    pub fn defaults(column_order: Vec<String>, per_page: usize) -> Self {
        Self {
            column_order,
            column_sizing: AHashMap::new(),
            column_visibility: AHashMap::new(),
            group_by: None,
            expanded_groups: ExpandedGroups::new(),
            per_page,
            sorting: SortingState::new(),
            filters: FilterState::new(),
            search_query: String::new(),
        }
    }
}

/// A stored order is only usable when it is a permutation of the defaults:
/// same length, no repeated ids, and the same set of ids.
pub fn column_order_matches(stored: &[String], defaults: &[String]) -> bool {
    if stored.len() != defaults.len() {
        return false;
    }
    let stored_ids: AHashSet<&str> = stored.iter().map(String::as_str).collect();
    let default_ids: AHashSet<&str> = defaults.iter().map(String::as_str).collect();
    stored_ids.len() == stored.len() && stored_ids == default_ids
}

/// Load/save/reset lifecycle of one table's view state
pub struct ViewStateStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
    features: TableFeatures,
    search_ttl_ms: i64,
    default_per_page: usize,
    clock: Clock,
}

impl ViewStateStore {
    pub fn new(store: Arc<dyn KeyValueStore>, config: &TableConfig) -> Self {
        Self {
            store,
            key: config.storage_key(),
            features: config.features.clone(),
            search_ttl_ms: i64::try_from(config.search_ttl_secs.saturating_mul(1000)).unwrap_or(i64::MAX),
            default_per_page: config.default_per_page.max(1),
            clock: Arc::new(|| Utc::now().timestamp_millis()),
        }
    }

    /// Replace the wall clock, used to test the search TTL
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Storage key this table persists under
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn features(&self) -> &TableFeatures {
        &self.features
    }

    /// Defaults for a fresh table
    pub fn defaults(&self, default_column_order: &[String]) -> ViewState {
        ViewState::defaults(default_column_order.to_vec(), self.default_per_page)
    }

    /// Raw stored entry. Unreadable or corrupted entries are logged and
    /// treated as absent.
    pub fn read(&self) -> Option<StoredViewState> {
        match self.try_read() {
            Ok(stored) => stored,
            Err(e) => {
                error!("Failed to load table state for '{}': {}", self.key, e);
                None
            }
        }
    }

    fn try_read(&self) -> Result<Option<StoredViewState>, DataError> {
        let Some(text) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        serde_json::from_str(&text).map(Some).map_err(|e| DataError::Corrupted {
            key: self.key.clone(),
            reason: e.to_string(),
        })
    }

    /// Write an entry, logging instead of failing
    pub fn write(&self, stored: &StoredViewState) -> bool {
        let result = serde_json::to_string(stored)
            .map_err(DataError::from)
            .and_then(|text| self.store.set(&self.key, &text));

        match result {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to save table state for '{}': {}", self.key, e);
                false
            }
        }
    }

    /// Resolve the view state for the current columns.
    ///
    /// A stored column order that is not a permutation of
    /// `default_column_order` discards the whole entry: it is rewritten to
    /// hold only the default order and every other concern takes its default.
    pub fn load(&self, default_column_order: &[String]) -> ViewState {
        let mut state = self.defaults(default_column_order);
        let Some(mut stored) = self.read() else {
            return state;
        };

        if self.features.column_orderable {
            match stored.column_order.take() {
                Some(order) if column_order_matches(&order, default_column_order) => {
                    state.column_order = order;
                }
                Some(_) => {
                    warn!("Table state mismatch for '{}'. Resetting to default.", self.key);
                    stored = StoredViewState {
                        column_order: Some(default_column_order.to_vec()),
                        ..Default::default()
                    };
                    self.write(&stored);
                }
                None => {}
            }
        }

        if self.features.column_resizable {
            if let Some(sizing) = stored.column_sizing {
                state.column_sizing = sizing;
            }
        }

        if self.features.column_visibility_toggle {
            if let Some(visibility) = stored.column_visibility {
                state.column_visibility = visibility;
            }
        }

        if self.features.groupable {
            state.group_by = stored.group_by;
            if let Some(expanded) = stored.expanded_groups {
                state.expanded_groups = expanded;
            }
        }

        if self.features.pagination {
            if let Some(per_page) = stored.per_page.filter(|&n| n > 0) {
                state.per_page = per_page;
            }
        }

        if self.features.sortable {
            if let Some(sorting) = stored.sorting {
                state.sorting = sorting;
            }
        }

        if self.features.filterable {
            if let Some(filters) = stored.filters {
                state.filters = filters;
            }
        }

        if self.features.search {
            if let (Some(query), Some(timestamp)) = (stored.search_query, stored.search_query_timestamp) {
                let elapsed = (self.clock)().saturating_sub(timestamp);
                if !query.is_empty() && elapsed < self.search_ttl_ms {
                    state.search_query = query;
                } else if !query.is_empty() {
                    debug!("Stored search for '{}' expired after {}ms", self.key, elapsed);
                }
            }
        }

        state
    }

    /// Persisted form of `state`, restricted to enabled features
    pub fn to_stored(&self, state: &ViewState) -> StoredViewState {
        let mut stored = StoredViewState::default();

        if self.features.column_orderable {
            stored.column_order = Some(state.column_order.clone());
        }
        if self.features.column_resizable {
            stored.column_sizing = Some(state.column_sizing.clone());
        }
        if self.features.column_visibility_toggle {
            stored.column_visibility = Some(state.column_visibility.clone());
        }
        if self.features.groupable {
            stored.group_by = state.group_by.clone();
            stored.expanded_groups = Some(state.expanded_groups.clone());
        }
        if self.features.pagination {
            stored.per_page = Some(state.per_page);
        }
        if self.features.sortable {
            stored.sorting = Some(state.sorting.clone());
        }
        if self.features.filterable {
            stored.filters = Some(state.filters.clone());
        }
        if self.features.search {
            stored.search_query = Some(state.search_query.clone());
            stored.search_query_timestamp = Some((self.clock)());
        }

        stored
    }

    /// Persist `state`. Returns whether the write went through.
    pub fn save(&self, state: &ViewState) -> bool {
        self.write(&self.to_stored(state))
    }

    /// Defaults in memory, then delete the stored entry
    pub fn reset(&self, default_column_order: &[String]) -> ViewState {
        let state = self.defaults(default_column_order);
        if let Err(e) = self.store.delete(&self.key) {
            error!("Failed to reset table state for '{}': {}", self.key, e);
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use tv_core::{ColumnSort, FilterCondition, FilterType};

    fn order() -> Vec<String> {
        vec!["id".to_string(), "status".to_string(), "amount".to_string()]
    }

    fn all_features() -> TableFeatures {
        TableFeatures {
            column_orderable: true,
            column_resizable: true,
            column_visibility_toggle: true,
            groupable: true,
            pagination: true,
            sortable: true,
            filterable: true,
            search: true,
            row_virtualization: true,
        }
    }

    fn store_with(features: TableFeatures) -> (Arc<MemoryStore>, ViewStateStore) {
        let backend = Arc::new(MemoryStore::new());
        let config = TableConfig::default().with_save_key("orders").with_features(features);
        let store = ViewStateStore::new(backend.clone(), &config).with_clock(Arc::new(|| 1_000_000));
        (backend, store)
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let (_, store) = store_with(all_features());
        let mut state = store.defaults(&order());
        state.column_order = vec!["amount".into(), "id".into(), "status".into()];
        state.group_by = Some("status".into());
        state.per_page = 25;
        state.sorting = vec![ColumnSort::desc("amount")];
        state.filters = vec![FilterCondition::new("status", FilterType::Select).with_value("open")];
        state.search_query = "acme".into();

        assert!(store.save(&state));
        assert_eq!(store.load(&order()), state);
    }

    #[test]
    fn test_disabled_features_are_not_written_or_read() {
        let (backend, store) = store_with(TableFeatures {
            groupable: false,
            ..all_features()
        });
        let mut state = store.defaults(&order());
        state.group_by = Some("status".into());
        store.save(&state);

        let raw = backend.get("table-view-orders").unwrap().unwrap();
        assert!(!raw.contains("groupBy"));

        // A groupBy written while grouping was enabled is ignored later
        backend
            .set("table-view-orders", r#"{"groupBy":"status","perPage":50}"#)
            .unwrap();
        let loaded = store.load(&order());
        assert_eq!(loaded.group_by, None);
        assert_eq!(loaded.per_page, 50);
    }

    #[test]
    fn test_column_order_mismatch_rewrites_entry() {
        let (backend, store) = store_with(all_features());
        backend
            .set(
                "table-view-orders",
                r#"{"columnOrder":["id","status","legacy"],"perPage":50,"sorting":[{"id":"id","desc":true}]}"#,
            )
            .unwrap();

        let loaded = store.load(&order());
        assert_eq!(loaded, store.defaults(&order()));

        let rewritten: StoredViewState =
            serde_json::from_str(&backend.get("table-view-orders").unwrap().unwrap()).unwrap();
        assert_eq!(rewritten.column_order, Some(order()));
        assert_eq!(rewritten.per_page, None);
    }

    #[test]
    fn test_duplicate_column_order_is_rewritten() {
        let (backend, store) = store_with(all_features());
        backend
            .set("table-view-orders", r#"{"columnOrder":["id","id","status"],"perPage":50}"#)
            .unwrap();

        let loaded = store.load(&order());
        assert_eq!(loaded.column_order, order());
        assert_eq!(loaded.per_page, 10);

        let rewritten: StoredViewState =
            serde_json::from_str(&backend.get("table-view-orders").unwrap().unwrap()).unwrap();
        assert_eq!(rewritten.column_order, Some(order()));
    }

    #[test]
    fn test_column_order_matches_requires_permutation() {
        let defaults = order();
        let order_of = |ids: &[&str]| ids.iter().map(|id| id.to_string()).collect::<Vec<_>>();

        assert!(column_order_matches(&order_of(&["amount", "id", "status"]), &defaults));
        assert!(!column_order_matches(&order_of(&["id", "id", "status"]), &defaults));
        assert!(!column_order_matches(&order_of(&["id", "status"]), &defaults));
        assert!(!column_order_matches(&order_of(&["id", "status", "legacy"]), &defaults));
    }

    #[test]
    fn test_search_ttl_boundaries() {
        let (backend, store) = store_with(all_features());
        let now = 1_000_000;
        let ttl_ms = 1800 * 1000;

        let stale = format!(r#"{{"searchQuery":"acme","searchQueryTimestamp":{}}}"#, now - ttl_ms - 1000);
        backend.set("table-view-orders", &stale).unwrap();
        assert_eq!(store.load(&order()).search_query, "");

        let fresh = format!(r#"{{"searchQuery":"acme","searchQueryTimestamp":{}}}"#, now - ttl_ms + 1000);
        backend.set("table-view-orders", &fresh).unwrap();
        assert_eq!(store.load(&order()).search_query, "acme");
    }

    #[test]
    fn test_zero_per_page_is_ignored() {
        let (backend, store) = store_with(all_features());
        backend.set("table-view-orders", r#"{"perPage":0}"#).unwrap();
        assert_eq!(store.load(&order()).per_page, 10);
    }

    #[test]
    fn test_storage_failures_degrade_to_defaults() {
        let (backend, store) = store_with(all_features());
        backend.set("table-view-orders", "{ not json").unwrap();
        assert_eq!(store.load(&order()), store.defaults(&order()));

        backend.set_failing(true);
        assert_eq!(store.load(&order()), store.defaults(&order()));
        assert!(!store.save(&store.defaults(&order())));
        assert_eq!(store.reset(&order()), store.defaults(&order()));
    }

    #[test]
    fn test_reset_deletes_entry() {
        let (backend, store) = store_with(all_features());
        store.save(&store.defaults(&order()));
        assert!(!backend.is_empty());
        store.reset(&order());
        assert!(backend.is_empty());
    }
}
