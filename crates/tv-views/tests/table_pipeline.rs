use std::sync::Arc;

use serde_json::{json, Value};
use tv_core::{ColumnDescriptor, FilterOperator, FilterType, PageChange};
use tv_data::{FileStore, KeyValueStore, MemoryStore, StoredViewState, TableConfig, TableFeatures, ViewStateStore};
use tv_views::{FilterPatch, TableController};

fn order_columns() -> Vec<ColumnDescriptor<Value>> {
    vec![
        ColumnDescriptor::new("id").filterable(FilterType::Number),
        ColumnDescriptor::new("status").filterable(FilterType::Text),
        ColumnDescriptor::new("amount").filterable(FilterType::Number),
    ]
}

fn ids(rows: &[&Value]) -> Vec<i64> {
    rows.iter().map(|r| r["id"].as_i64().unwrap()).collect()
}

fn all_features() -> TableFeatures {
    TableFeatures {
        column_orderable: true,
        column_resizable: true,
        pagination: true,
        ..TableFeatures::default()
    }
}

#[test]
fn test_filter_search_scenario() {
    let rows = vec![
        json!({ "id": 1, "status": "open", "amount": 5 }),
        json!({ "id": 2, "status": "closed", "amount": 15 }),
    ];
    let mut table =
        TableController::new(order_columns(), rows, TableConfig::default(), Arc::new(MemoryStore::new())).unwrap();

    let filter = table.add_filter("status", None).unwrap();
    table
        .update_filter(
            &filter,
            FilterPatch {
                operator: Some(FilterOperator::Is),
                value: Some(Some(json!("open"))),
            },
        )
        .unwrap();
    assert_eq!(ids(&table.visible_rows()), vec![1]);

    table.set_search("5");
    assert_eq!(ids(&table.visible_rows()), vec![1]);

    table
        .update_filter(&filter, FilterPatch::operator(FilterOperator::IsNot))
        .unwrap();
    // "5" still matches row 2 through its amount of 15
    assert_eq!(ids(&table.visible_rows()), vec![2]);
}

#[test]
fn test_pagination_boundaries() {
    let rows: Vec<Value> = (1..=25).map(|i| json!({ "id": i, "status": "open", "amount": i })).collect();
    let config = TableConfig::default().with_features(all_features());
    let mut table = TableController::new(order_columns(), rows, config, Arc::new(MemoryStore::new())).unwrap();

    let view = table.view();
    assert_eq!(view.data_indices().len(), 10);
    assert_eq!(view.pagination.max_page, 3);
    assert_eq!(view.pagination.summary().to_string(), "Showing 1-10 of 25 records");

    assert_eq!(table.set_page(0), PageChange::Ignored);
    assert_eq!(table.set_page(4), PageChange::Ignored);
    assert_eq!(table.paginator().current_page(), 1);

    table.set_page(3);
    assert_eq!(ids(&table.visible_rows()), vec![21, 22, 23, 24, 25]);

    // Grouping shows every row and hides the pager
    table.set_group_by(Some("status")).unwrap();
    let view = table.view();
    assert_eq!(view.data_indices().len(), 25);
    assert!(!view.show_pagination);
    assert!(!view.virtualize);
}

#[test]
fn test_mismatched_column_order_is_discarded() {
    let backend = Arc::new(MemoryStore::new());
    let config = TableConfig::default()
        .with_save_key("orders")
        .with_features(all_features());
    backend
        .set(
            &config.storage_key(),
            r#"{"columnOrder":["id","status","discount"],"perPage":50,"searchQuery":"x","searchQueryTimestamp":0}"#,
        )
        .unwrap();

    let table = TableController::new(order_columns(), Vec::new(), config.clone(), backend.clone()).unwrap();
    assert_eq!(table.state().column_order, vec!["id", "status", "amount"]);
    assert_eq!(table.state().per_page, 10);

    let stored: StoredViewState =
        serde_json::from_str(&backend.get(&config.storage_key()).unwrap().unwrap()).unwrap();
    assert_eq!(
        stored.column_order,
        Some(vec!["id".to_string(), "status".to_string(), "amount".to_string()])
    );
    assert_eq!(stored.per_page, None);
}

#[test]
fn test_search_ttl_on_reload() {
    let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let config = TableConfig::default().with_save_key("ttl");
    let ttl_ms = config.search_ttl_secs as i64 * 1000;
    let saved_at = 5_000_000_i64;

    // Save a search at a fixed time
    {
        let store = ViewStateStore::new(backend.clone(), &config).with_clock(Arc::new(move || saved_at));
        let mut table = TableController::with_view_store(order_columns(), Vec::new(), config.clone(), store).unwrap();
        table.set_search("acme");
    }

    let reload_at = |now: i64| {
        let store = ViewStateStore::new(backend.clone(), &config).with_clock(Arc::new(move || now));
        TableController::with_view_store(order_columns(), Vec::new(), config.clone(), store)
            .unwrap()
            .state()
            .search_query
            .clone()
    };

    assert_eq!(reload_at(saved_at + ttl_ms - 1000), "acme");
    assert_eq!(reload_at(saved_at + ttl_ms + 1000), "");
}

#[test]
fn test_view_state_survives_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = TableConfig::default()
        .with_save_key("orders")
        .with_features(all_features());
    let rows: Vec<Value> = (1..=12).map(|i| json!({ "id": i, "status": "open", "amount": i })).collect();

    {
        let store = Arc::new(FileStore::open(dir.path()).unwrap());
        let mut table = TableController::new(order_columns(), rows.clone(), config.clone(), store).unwrap();
        table.set_per_page(25);
        table.toggle_sort("amount", false).unwrap();
        table.toggle_sort("amount", false).unwrap();
        table
            .set_column_order(vec!["amount".into(), "id".into(), "status".into()])
            .unwrap();
        table.set_column_size("amount", 140.0).unwrap();
    }

    let store = Arc::new(FileStore::open(dir.path()).unwrap());
    let table = TableController::new(order_columns(), rows, config, store).unwrap();
    assert_eq!(table.state().per_page, 25);
    assert_eq!(table.state().column_order, vec!["amount", "id", "status"]);
    assert_eq!(table.state().column_sizing.get("amount"), Some(&140.0));
    assert_eq!(ids(&table.visible_rows())[..3], [12, 11, 10]);
}

#[test]
fn test_storage_failure_never_breaks_commands() {
    let backend = Arc::new(MemoryStore::new());
    backend.set_failing(true);
    let rows = vec![json!({ "id": 1, "status": "open", "amount": 5 })];
    let mut table = TableController::new(order_columns(), rows, TableConfig::default(), backend).unwrap();

    let id = table.add_filter("amount", None).unwrap();
    table.update_filter(&id, FilterPatch::value("not a number")).unwrap();
    table.set_search("open");
    // Malformed number values never hide rows
    assert_eq!(ids(&table.visible_rows()), vec![1]);
}
