//! Table controller
//!
//! A [`TableController`] owns the rows, the column descriptors and the view
//! state of one table. Every public command mutates the state, persists it
//! and publishes an event in one step, so a change is always saved before
//! the next command runs.

mod compose;

pub use compose::{compose, select_rows, ComposedView, PipelineInput, RenderRow};

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};
use tv_core::events::events::{
    ColumnLayoutChanged, FiltersChanged, GroupToggled, GroupingChanged, PaginationChanged, SearchChanged,
    SortingChanged, ViewStateReset,
};
use tv_core::{
    accessor_map, default_column_order, ensure_column_ids, filterable_columns, toggle_group, validate_columns,
    Accessors, ColumnDescriptor, ColumnSort, CoreError, EventBus, FilterCondition, FilterOperator, FilterType,
    FilterableColumn, PageChange, PaginationMode, Paginator, Record,
};
use tv_data::view_state::column_order_matches;
use tv_data::{KeyValueStore, Page, PageRequest, TableConfig, ViewState, ViewStateStore};

/// Partial update of a filter condition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPatch {
    pub operator: Option<FilterOperator>,
    /// `Some(None)` clears the value
    pub value: Option<Option<Value>>,
}

impl FilterPatch {
    pub fn operator(operator: FilterOperator) -> Self {
        Self {
            operator: Some(operator),
            value: None,
        }
    }

    pub fn value(value: impl Into<Value>) -> Self {
        Self {
            operator: None,
            value: Some(Some(value.into())),
        }
    }
}

/// State and commands of one table instance
pub struct TableController<R> {
    columns: Vec<ColumnDescriptor<R>>,
    accessors: Accessors<R>,
    rows: Vec<R>,
    config: TableConfig,
    store: ViewStateStore,
    state: ViewState,
    paginator: Paginator,
    default_order: Vec<String>,
    events: EventBus,
    loading: bool,
}

impl<R: Record> TableController<R> {
    /// Create a table and restore its persisted view state.
    ///
    /// Fails only when the column ids are empty or not unique.
    pub fn new(
        columns: Vec<ColumnDescriptor<R>>,
        rows: Vec<R>,
        config: TableConfig,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, CoreError> {
        Self::with_view_store(columns, rows, config.clone(), ViewStateStore::new(store, &config))
    }

    /// Create a table around a prepared view-state store
    pub fn with_view_store(
        columns: Vec<ColumnDescriptor<R>>,
        rows: Vec<R>,
        config: TableConfig,
        store: ViewStateStore,
    ) -> Result<Self, CoreError> {
        let columns = ensure_column_ids(columns);
        validate_columns(&columns)?;

        let default_order = default_column_order(&columns);
        let mut state = store.load(&default_order);
        let paginator = Paginator::new(config.features.pagination, config.pagination_mode, state.per_page);

        if let Some(group_by) = state.group_by.take() {
            let groupable = config.features.groupable && paginator.mode() != PaginationMode::Server;
            if groupable && default_order.contains(&group_by) {
                state.group_by = Some(group_by);
            } else {
                warn!("Ignoring stored grouping by '{}' for table '{}'", group_by, store.key());
            }
        }

        info!(
            "Table '{}' ready with {} columns and {} rows",
            store.key(),
            columns.len(),
            rows.len()
        );

        Ok(Self {
            accessors: accessor_map(&columns),
            columns,
            rows,
            config,
            store,
            state,
            paginator,
            default_order,
            events: EventBus::new(),
            loading: false,
        })
    }

    pub fn columns(&self) -> &[ColumnDescriptor<R>] {
        &self.columns
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    /// Bus the table publishes its events on
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Entries of the filter menu
    pub fn filterable_columns(&self) -> Vec<FilterableColumn> {
        filterable_columns(&self.columns)
    }

    fn column(&self, column_id: &str) -> Result<&ColumnDescriptor<R>, CoreError> {
        self.columns
            .iter()
            .find(|c| c.id == column_id)
            .ok_or_else(|| CoreError::UnknownColumn(column_id.to_string()))
    }

    fn filter_mut(&mut self, filter_id: &str) -> Result<&mut FilterCondition, CoreError> {
        self.state
            .filters
            .iter_mut()
            .find(|f| f.id == filter_id)
            .ok_or_else(|| CoreError::UnknownFilter(filter_id.to_string()))
    }

    fn persist(&self) {
        self.store.save(&self.state);
    }

    fn is_server(&self) -> bool {
        self.paginator.mode() == PaginationMode::Server
    }

    /// Number of rows surviving filter and search
    pub fn filtered_count(&self) -> usize {
        select_rows(&self.pipeline_input()).len()
    }

    /// Upstream controls changed: server tables go back to page one, client
    /// tables keep their page inside the new range
    fn after_narrowing_change(&mut self) {
        if self.is_server() {
            self.paginator.reset(self.state.per_page);
        } else {
            let count = self.filtered_count();
            self.paginator.clamp(count);
        }
    }

    // -- Filters ------------------------------------------------------------

    /// Add an unconfigured condition on a column; returns the condition id
    pub fn add_filter(&mut self, column_id: &str, filter_type: Option<FilterType>) -> Result<String, CoreError> {
        let column = self.column(column_id)?;
        let filter_type = filter_type.unwrap_or_else(|| column.effective_filter_type());
        let condition = FilterCondition::new(column_id, filter_type);
        let id = condition.id.clone();

        debug!("Adding {} filter on '{}'", filter_type.as_str(), column_id);
        self.state.filters.push(condition);
        self.filters_changed();
        Ok(id)
    }

    /// Change the operator and/or value of a condition
    pub fn update_filter(&mut self, filter_id: &str, patch: FilterPatch) -> Result<(), CoreError> {
        let condition = self.filter_mut(filter_id)?;

        if let Some(operator) = patch.operator {
            if !condition.filter_type.supports(operator) {
                return Err(CoreError::InvalidOperator {
                    operator,
                    filter_type: condition.filter_type,
                });
            }
            condition.operator = operator;
            if !operator.requires_value() {
                condition.value = None;
            }
        }
        if let Some(value) = patch.value {
            condition.value = value;
        }

        self.filters_changed();
        Ok(())
    }

    /// Point a condition at another column.
    ///
    /// The value is always cleared. The operator goes back to the first
    /// operator of the new column's type only when the type changes.
    pub fn change_filter_column(&mut self, filter_id: &str, column_id: &str) -> Result<(), CoreError> {
        let filter_type = self.column(column_id)?.effective_filter_type();
        let condition = self.filter_mut(filter_id)?;

        if condition.filter_type != filter_type {
            condition.operator = filter_type.first_operator();
        }
        condition.column_id = column_id.to_string();
        condition.filter_type = filter_type;
        condition.value = None;

        self.filters_changed();
        Ok(())
    }

    pub fn remove_filter(&mut self, filter_id: &str) -> Result<(), CoreError> {
        let before = self.state.filters.len();
        self.state.filters.retain(|f| f.id != filter_id);
        if self.state.filters.len() == before {
            return Err(CoreError::UnknownFilter(filter_id.to_string()));
        }
        self.filters_changed();
        Ok(())
    }

    pub fn clear_filters(&mut self) {
        self.state.filters.clear();
        self.filters_changed();
    }

    /// Chip text of a condition, e.g. `Status is "Open"`
    pub fn filter_display_text(&self, filter_id: &str) -> Result<String, CoreError> {
        let condition = self
            .state
            .filters
            .iter()
            .find(|f| f.id == filter_id)
            .ok_or_else(|| CoreError::UnknownFilter(filter_id.to_string()))?;
        let (label, options) = match self.column(&condition.column_id) {
            Ok(column) => (column.label(), column.options.as_slice()),
            Err(_) => (condition.column_id.as_str(), &[][..]),
        };
        Ok(condition.display_text(label, options))
    }

    fn filters_changed(&mut self) {
        self.after_narrowing_change();
        self.persist();
        self.events.publish(FiltersChanged {
            filters: self.state.filters.clone(),
        });
    }

    // -- Search -------------------------------------------------------------

    /// Commit a search query; callers debounce raw input first
    pub fn set_search(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query == self.state.search_query {
            return;
        }
        self.state.search_query = query;
        self.after_narrowing_change();
        self.persist();
        self.events.publish(SearchChanged {
            query: self.state.search_query.clone(),
        });
    }

    // -- Sorting ------------------------------------------------------------

    pub fn set_sort(&mut self, sorting: Vec<ColumnSort>) {
        self.state.sorting = sorting;
        self.sorting_changed();
    }

    /// Cycle a sortable column through ascending, descending and unsorted
    pub fn toggle_sort(&mut self, column_id: &str, multi: bool) -> Result<(), CoreError> {
        if !self.column(column_id)?.is_sortable(self.config.features.sortable) {
            debug!("Column '{}' is not sortable", column_id);
            return Ok(());
        }
        tv_core::toggle_sort(&mut self.state.sorting, column_id, multi);
        self.sorting_changed();
        Ok(())
    }

    fn sorting_changed(&mut self) {
        if self.is_server() {
            self.paginator.reset(self.state.per_page);
        }
        self.persist();
        self.events.publish(SortingChanged {
            sorting: self.state.sorting.clone(),
        });
    }

    // -- Grouping -----------------------------------------------------------

    /// Whether rows may be grouped at all
    pub fn can_group(&self) -> bool {
        self.config.features.groupable && !self.is_server()
    }

    pub fn set_group_by(&mut self, column_id: Option<&str>) -> Result<(), CoreError> {
        if let Some(id) = column_id {
            self.column(id)?;
            if !self.can_group() {
                warn!("Grouping is not available for table '{}'", self.store.key());
                return Ok(());
            }
        }

        self.state.group_by = column_id.map(str::to_string);
        self.persist();
        self.events.publish(GroupingChanged {
            group_by: self.state.group_by.clone(),
        });
        Ok(())
    }

    /// Expand or collapse a group; returns the new state
    pub fn toggle_group(&mut self, key: &str) -> bool {
        let expanded = toggle_group(&mut self.state.expanded_groups, key);
        self.persist();
        self.events.publish(GroupToggled {
            key: key.to_string(),
            expanded,
        });
        expanded
    }

    // -- Pagination ---------------------------------------------------------

    /// Go to a page; out-of-range pages are ignored
    pub fn set_page(&mut self, page: usize) -> PageChange {
        let count = if self.is_server() { self.rows.len() } else { self.filtered_count() };
        let change = self.paginator.handle_page_change(page, count);
        if change != PageChange::Ignored {
            self.publish_pagination();
        }
        change
    }

    /// Change the page size and go back to the first page
    pub fn set_per_page(&mut self, per_page: usize) -> PageChange {
        let per_page = per_page.max(1);
        let change = self.paginator.handle_per_page_change(per_page, 1);
        self.state.per_page = per_page;
        self.persist();
        self.publish_pagination();
        change
    }

    fn publish_pagination(&self) {
        self.events.publish(PaginationChanged {
            page: self.paginator.current_page(),
            per_page: self.paginator.per_page(),
        });
    }

    // -- Columns ------------------------------------------------------------

    /// Reorder columns; the order must be a permutation of the column ids
    pub fn set_column_order(&mut self, order: Vec<String>) -> Result<(), CoreError> {
        if !column_order_matches(&order, &self.default_order) {
            if let Some(unknown) = order.iter().find(|id| !self.default_order.contains(*id)) {
                return Err(CoreError::UnknownColumn(unknown.clone()));
            }
            if let Some((_, repeated)) = order.iter().enumerate().find(|(i, id)| order[..*i].contains(*id)) {
                return Err(CoreError::DuplicateColumnId(repeated.clone()));
            }
            let missing = self
                .default_order
                .iter()
                .find(|id| !order.contains(*id))
                .cloned()
                .unwrap_or_default();
            return Err(CoreError::UnknownColumn(missing));
        }
        self.state.column_order = order;
        self.layout_changed();
        Ok(())
    }

    pub fn set_column_size(&mut self, column_id: &str, width: f64) -> Result<(), CoreError> {
        if !self.column(column_id)?.is_resizable(self.config.features.column_resizable) {
            return Ok(());
        }
        self.state.column_sizing.insert(column_id.to_string(), width);
        self.layout_changed();
        Ok(())
    }

    pub fn set_column_visibility(&mut self, column_id: &str, visible: bool) -> Result<(), CoreError> {
        if !self
            .column(column_id)?
            .can_toggle_visibility(self.config.features.column_visibility_toggle)
        {
            return Ok(());
        }
        self.state.column_visibility.insert(column_id.to_string(), visible);
        self.layout_changed();
        Ok(())
    }

    /// Columns in display order, hidden ones left out
    pub fn visible_columns(&self) -> Vec<&ColumnDescriptor<R>> {
        self.state
            .column_order
            .iter()
            .filter(|id| self.state.column_visibility.get(*id).copied().unwrap_or(true))
            .filter_map(|id| self.columns.iter().find(|c| &c.id == id))
            .collect()
    }

    fn layout_changed(&mut self) {
        self.persist();
        self.events.publish(ColumnLayoutChanged {
            column_order: self.state.column_order.clone(),
        });
    }

    // -- Lifecycle ----------------------------------------------------------

    /// Back to defaults, then drop the persisted entry
    pub fn reset_view_state(&mut self) {
        self.state = self.store.reset(&self.default_order);
        self.paginator.reset(self.state.per_page);
        info!("Reset view state of '{}'", self.store.key());
        self.events.publish(ViewStateReset {
            key: self.store.key().to_string(),
        });
    }

    /// Replace the rows, e.g. after a reload
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        if !self.is_server() {
            let count = self.filtered_count();
            self.paginator.clamp(count);
        }
    }

    // -- Pipeline -----------------------------------------------------------

    fn pipeline_input(&self) -> PipelineInput<'_, R> {
        PipelineInput {
            rows: &self.rows,
            columns: &self.columns,
            accessors: &self.accessors,
            filters: &self.state.filters,
            search_query: &self.state.search_query,
            sorting: &self.state.sorting,
            group_by: self.state.group_by.as_deref(),
            expanded_groups: &self.state.expanded_groups,
            paginator: &self.paginator,
            loading: self.loading,
            virtualization_enabled: self.config.features.row_virtualization,
        }
    }

    /// Compose the rows to render
    pub fn view(&self) -> ComposedView {
        compose(&self.pipeline_input())
    }

    /// Data rows to render, in order
    pub fn visible_rows(&self) -> Vec<&R> {
        self.view().data_rows(&self.rows)
    }
}

impl TableController<Value> {
    /// Request for the page a server-mode table currently shows
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.paginator.current_page(),
            per_page: self.paginator.per_page(),
            sorting: self.state.sorting.clone(),
            filters: self.state.filters.clone(),
            search: self.state.search_query.clone(),
        }
    }

    /// Show a page fetched for `request`
    pub fn apply_page(&mut self, request: &PageRequest, page: Page) {
        self.paginator
            .set_server_meta(request.page, page.total_pages, page.total_count);
        self.rows = page.rows;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;
    use tv_data::{MemoryStore, TableFeatures};

    fn columns() -> Vec<ColumnDescriptor<Value>> {
        vec![
            ColumnDescriptor::new("id").filterable(FilterType::Number),
            ColumnDescriptor::new("status").filterable(FilterType::Select),
            ColumnDescriptor::new("amount").filterable(FilterType::Number),
            ColumnDescriptor::new("_actions"),
        ]
    }

    fn table(features: TableFeatures) -> (Arc<MemoryStore>, TableController<Value>) {
        let store = Arc::new(MemoryStore::new());
        let rows = (1..=25)
            .map(|i| {
                let status = if i % 2 == 0 { "closed" } else { "open" };
                json!({ "id": i, "status": status, "amount": i * 10 })
            })
            .collect();
        let config = TableConfig::default().with_save_key("orders").with_features(features);
        let table = TableController::new(columns(), rows, config, store.clone()).unwrap();
        (store, table)
    }

    #[test]
    fn test_duplicate_columns_are_rejected() {
        let columns = vec![ColumnDescriptor::<Value>::new("a"), ColumnDescriptor::new("a")];
        let result = TableController::new(columns, Vec::new(), TableConfig::default(), Arc::new(MemoryStore::new()));
        assert!(matches!(result, Err(CoreError::DuplicateColumnId(_))));
    }

    #[test]
    fn test_filter_commands() {
        let (_, mut table) = table(TableFeatures::default());
        let id = table.add_filter("status", None).unwrap();
        assert_eq!(table.state().filters[0].operator, FilterOperator::Is);

        table.update_filter(&id, FilterPatch::value("open")).unwrap();
        assert_eq!(table.filtered_count(), 13);
        assert_eq!(table.filter_display_text(&id).unwrap(), "status is \"open\"");

        let err = table.update_filter(&id, FilterPatch::operator(FilterOperator::GreaterThan));
        assert!(matches!(err, Err(CoreError::InvalidOperator { .. })));

        assert!(matches!(table.remove_filter("nope"), Err(CoreError::UnknownFilter(_))));
        assert!(matches!(table.add_filter("nope", None), Err(CoreError::UnknownColumn(_))));

        table.remove_filter(&id).unwrap();
        assert_eq!(table.filtered_count(), 25);
    }

    #[test]
    fn test_change_filter_column_resets_operator_on_type_change() {
        let (_, mut table) = table(TableFeatures::default());
        let id = table.add_filter("id", None).unwrap();
        table
            .update_filter(
                &id,
                FilterPatch {
                    operator: Some(FilterOperator::GreaterThan),
                    value: Some(Some(json!(3))),
                },
            )
            .unwrap();

        // Same type: operator kept, value cleared
        table.change_filter_column(&id, "amount").unwrap();
        let condition = &table.state().filters[0];
        assert_eq!(condition.operator, FilterOperator::GreaterThan);
        assert_eq!(condition.value, None);

        // Different type: first operator of the new type
        table.change_filter_column(&id, "status").unwrap();
        let condition = &table.state().filters[0];
        assert_eq!(condition.filter_type, FilterType::Select);
        assert_eq!(condition.operator, FilterOperator::Is);
    }

    #[test]
    fn test_commands_persist_and_publish() {
        let (store, mut table) = table(TableFeatures {
            pagination: true,
            ..TableFeatures::default()
        });
        let pages = Arc::new(Mutex::new(Vec::new()));
        let sink = pages.clone();
        table
            .events()
            .subscribe_fn::<PaginationChanged, _>(move |e| sink.lock().push((e.page, e.per_page)));

        assert_eq!(table.set_per_page(5), PageChange::Local { page: 1, per_page: 5 });
        assert_eq!(table.set_page(5), PageChange::Local { page: 5, per_page: 5 });
        assert_eq!(table.set_page(6), PageChange::Ignored);
        assert_eq!(*pages.lock(), vec![(1, 5), (5, 5)]);

        let raw = store.get("table-view-orders").unwrap().unwrap();
        assert!(raw.contains("\"perPage\":5"));
    }

    #[test]
    fn test_client_page_is_clamped_when_filters_narrow() {
        let (_, mut table) = table(TableFeatures {
            pagination: true,
            ..TableFeatures::default()
        });
        table.set_page(3);
        let id = table.add_filter("id", None).unwrap();
        table
            .update_filter(
                &id,
                FilterPatch {
                    operator: Some(FilterOperator::LessThanOrEquals),
                    value: Some(Some(json!(4))),
                },
            )
            .unwrap();
        assert_eq!(table.paginator().current_page(), 1);
        assert_eq!(table.visible_rows().len(), 4);
    }

    #[test]
    fn test_internal_columns_are_not_toggled() {
        let (_, mut table) = table(TableFeatures::default());
        table.set_column_visibility("_actions", false).unwrap();
        table.set_column_visibility("amount", false).unwrap();
        let ids: Vec<&str> = table.visible_columns().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["id", "status", "_actions"]);
    }

    #[test]
    fn test_column_order_must_be_permutation() {
        let (_, mut table) = table(TableFeatures {
            column_orderable: true,
            ..TableFeatures::default()
        });
        let bad = vec!["id".to_string(), "status".to_string(), "ghost".to_string(), "_actions".to_string()];
        assert!(matches!(table.set_column_order(bad), Err(CoreError::UnknownColumn(id)) if id == "ghost"));

        let good = vec!["amount".to_string(), "id".to_string(), "status".to_string(), "_actions".to_string()];
        table.set_column_order(good.clone()).unwrap();
        assert_eq!(table.state().column_order, good);
    }

    #[test]
    fn test_column_order_rejects_repeated_ids() {
        let (store, mut table) = table(TableFeatures {
            column_orderable: true,
            ..TableFeatures::default()
        });
        let repeated = vec!["id".to_string(), "id".to_string(), "status".to_string(), "_actions".to_string()];
        assert!(matches!(table.set_column_order(repeated), Err(CoreError::DuplicateColumnId(id)) if id == "id"));

        let short = vec!["id".to_string(), "status".to_string(), "_actions".to_string()];
        assert!(matches!(table.set_column_order(short), Err(CoreError::UnknownColumn(id)) if id == "amount"));

        assert_eq!(table.state().column_order, default_column_order(&columns()));
        assert!(store.is_empty());
    }

    #[test]
    fn test_stored_repeated_column_order_falls_back_to_defaults() {
        let store = Arc::new(MemoryStore::new());
        store
            .set("table-view-orders", r#"{"columnOrder":["id","id","status","_actions"]}"#)
            .unwrap();
        let config = TableConfig::default().with_save_key("orders").with_features(TableFeatures {
            column_orderable: true,
            ..TableFeatures::default()
        });
        let table = TableController::new(columns(), Vec::<Value>::new(), config, store).unwrap();

        let ids: Vec<&str> = table.visible_columns().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["id", "status", "amount", "_actions"]);
    }

    #[test]
    fn test_stored_grouping_is_dropped_when_unavailable() {
        let stored = r#"{"groupBy":"status"}"#;

        let store = Arc::new(MemoryStore::new());
        store.set("table-view-orders", stored).unwrap();
        let mut config = TableConfig::default().with_save_key("orders");
        config.pagination_mode = PaginationMode::Server;
        let rows = vec![json!({ "id": 1, "status": "open", "amount": 10 })];
        let table = TableController::new(columns(), rows, config, store).unwrap();
        assert_eq!(table.state().group_by, None);
        assert!(table
            .view()
            .rows
            .iter()
            .all(|row| matches!(row, RenderRow::Data { .. })));

        let store = Arc::new(MemoryStore::new());
        store.set("table-view-orders", r#"{"groupBy":"region"}"#).unwrap();
        let config = TableConfig::default().with_save_key("orders");
        let table = TableController::new(columns(), Vec::<Value>::new(), config, store).unwrap();
        assert_eq!(table.state().group_by, None);

        let store = Arc::new(MemoryStore::new());
        store.set("table-view-orders", stored).unwrap();
        let config = TableConfig::default().with_save_key("orders");
        let table = TableController::new(columns(), Vec::<Value>::new(), config, store).unwrap();
        assert_eq!(table.state().group_by.as_deref(), Some("status"));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let (store, mut table) = table(TableFeatures::default());
        table.set_search("open");
        table.set_group_by(Some("status")).unwrap();
        table.toggle_sort("amount", false).unwrap();
        assert!(!store.is_empty());

        table.reset_view_state();
        assert_eq!(table.state().search_query, "");
        assert_eq!(table.state().group_by, None);
        assert!(table.state().sorting.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_internal_column_is_not_sortable() {
        let (_, mut table) = table(TableFeatures::default());
        table.toggle_sort("_actions", false).unwrap();
        assert!(table.state().sorting.is_empty());
        table.toggle_sort("amount", false).unwrap();
        assert_eq!(table.state().sorting, vec![ColumnSort::asc("amount")]);
    }
}
