//! Pipeline composer
//!
//! Stages run in a fixed order: filter, search, sort, then exactly one of
//! grouping, pagination or pass-through. Grouping sees the complete searched
//! set, so a grouped client-side table is never sliced into pages.

use serde::Serialize;
use tv_core::{
    filter_selection, group_selection, is_group_expanded, search_selection, sort_selection, Accessors,
    ColumnDescriptor, ExpandedGroups, FilterCondition, PaginationMode, PaginationView, Paginator, Record,
    SortingState,
};

/// One line of the rendered table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderRow {
    GroupHeader { key: String, count: usize, expanded: bool },
    Data { source_index: usize },
}

/// Everything the rendering layer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedView {
    pub rows: Vec<RenderRow>,
    /// Source row index per render position, `None` for group headers
    pub virtual_index: Vec<Option<usize>>,
    /// Whether fixed-height row windowing may be used
    pub virtualize: bool,
    pub show_pagination: bool,
    pub pagination: PaginationView,
    /// Rows left after filtering and search
    pub filtered_count: usize,
}

impl ComposedView {
    /// Source indices of the data rows in render order
    pub fn data_indices(&self) -> Vec<usize> {
        self.virtual_index.iter().flatten().copied().collect()
    }

    /// Data rows in render order
    pub fn data_rows<'a, R>(&self, rows: &'a [R]) -> Vec<&'a R> {
        self.virtual_index.iter().flatten().map(|&idx| &rows[idx]).collect()
    }

    pub fn group_headers(&self) -> impl Iterator<Item = (&str, usize, bool)> + '_ {
        self.rows.iter().filter_map(|row| match row {
            RenderRow::GroupHeader { key, count, expanded } => Some((key.as_str(), *count, *expanded)),
            RenderRow::Data { .. } => None,
        })
    }
}

/// Inputs of one composition pass
pub struct PipelineInput<'a, R> {
    pub rows: &'a [R],
    pub columns: &'a [ColumnDescriptor<R>],
    pub accessors: &'a Accessors<R>,
    pub filters: &'a [FilterCondition],
    pub search_query: &'a str,
    pub sorting: &'a SortingState,
    pub group_by: Option<&'a str>,
    pub expanded_groups: &'a ExpandedGroups,
    pub paginator: &'a Paginator,
    pub loading: bool,
    pub virtualization_enabled: bool,
}

/// Row indices surviving filter, search and sort.
///
/// In server mode the rows are already one filtered, searched and sorted
/// page, so they pass through untouched.
pub fn select_rows<R: Record>(input: &PipelineInput<'_, R>) -> Vec<usize> {
    let all: Vec<usize> = (0..input.rows.len()).collect();
    if input.paginator.mode() == PaginationMode::Server {
        return all;
    }

    let filtered = filter_selection(input.rows, &all, input.filters, input.accessors);
    let searched = search_selection(input.rows, &filtered, input.search_query, input.columns);
    sort_selection(input.rows, &searched, input.sorting, input.accessors)
}

/// Run the pipeline
pub fn compose<R: Record>(input: &PipelineInput<'_, R>) -> ComposedView {
    let selection = select_rows(input);
    let filtered_count = selection.len();
    let grouped = input.group_by.is_some();

    let mut rows = Vec::new();
    let mut virtual_index = Vec::new();

    match group_selection(input.rows, &selection, input.group_by, input.accessors) {
        Some(groups) => {
            for (key, members) in groups {
                let expanded = is_group_expanded(input.expanded_groups, &key);
                rows.push(RenderRow::GroupHeader {
                    key,
                    count: members.len(),
                    expanded,
                });
                virtual_index.push(None);

                if expanded {
                    for idx in members {
                        rows.push(RenderRow::Data { source_index: idx });
                        virtual_index.push(Some(idx));
                    }
                }
            }
        }
        None => {
            for &idx in input.paginator.paginate(&selection) {
                rows.push(RenderRow::Data { source_index: idx });
                virtual_index.push(Some(idx));
            }
        }
    }

    ComposedView {
        rows,
        virtual_index,
        virtualize: input.virtualization_enabled && !input.loading && !grouped,
        show_pagination: input.paginator.should_show(input.loading, grouped),
        pagination: input.paginator.view(filtered_count),
        filtered_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tv_core::{accessor_map, ColumnSort, FilterOperator, FilterType};

    fn rows() -> Vec<Value> {
        (1..=25)
            .map(|i| {
                let team = if i % 3 == 0 { "red" } else { "blue" };
                json!({ "id": i, "team": team })
            })
            .collect()
    }

    fn columns() -> Vec<ColumnDescriptor<Value>> {
        vec![
            ColumnDescriptor::new("id").filterable(FilterType::Number),
            ColumnDescriptor::new("team").filterable(FilterType::Text),
        ]
    }

    struct Fixture {
        rows: Vec<Value>,
        columns: Vec<ColumnDescriptor<Value>>,
        accessors: Accessors<Value>,
        filters: Vec<FilterCondition>,
        sorting: SortingState,
        expanded: ExpandedGroups,
        paginator: Paginator,
    }

    impl Fixture {
        fn new(paginator: Paginator) -> Self {
            let columns = columns();
            Self {
                rows: rows(),
                accessors: accessor_map(&columns),
                columns,
                filters: Vec::new(),
                sorting: SortingState::new(),
                expanded: ExpandedGroups::new(),
                paginator,
            }
        }

        fn compose(&self, group_by: Option<&str>, loading: bool) -> ComposedView {
            compose(&PipelineInput {
                rows: &self.rows,
                columns: &self.columns,
                accessors: &self.accessors,
                filters: &self.filters,
                search_query: "",
                sorting: &self.sorting,
                group_by,
                expanded_groups: &self.expanded,
                paginator: &self.paginator,
                loading,
                virtualization_enabled: true,
            })
        }
    }

    #[test]
    fn test_client_pagination_slices_filtered_rows() {
        let mut fixture = Fixture::new(Paginator::new(true, PaginationMode::Client, 10));
        fixture.paginator.handle_page_change(3, 25);

        let view = fixture.compose(None, false);
        assert_eq!(view.data_indices(), (20..25).collect::<Vec<_>>());
        assert_eq!(view.pagination.max_page, 3);
        assert!(view.show_pagination);
        assert!(view.virtualize);
    }

    #[test]
    fn test_grouping_bypasses_client_pages() {
        let fixture = Fixture::new(Paginator::new(true, PaginationMode::Client, 10));
        let view = fixture.compose(Some("team"), false);

        assert_eq!(view.data_indices().len(), 25);
        let headers: Vec<_> = view.group_headers().collect();
        assert_eq!(headers, vec![("blue", 17, true), ("red", 8, true)]);
        assert!(!view.show_pagination);
        assert!(!view.virtualize);
    }

    #[test]
    fn test_collapsed_group_emits_only_header() {
        let mut fixture = Fixture::new(Paginator::new(false, PaginationMode::Client, 10));
        fixture.expanded.insert("red".to_string(), false);

        let view = fixture.compose(Some("team"), false);
        assert_eq!(view.data_indices().len(), 17);
        assert_eq!(view.rows.len(), 17 + 2);
        assert_eq!(view.virtual_index.len(), view.rows.len());
        assert!(view.rows.contains(&RenderRow::GroupHeader {
            key: "red".to_string(),
            count: 8,
            expanded: false
        }));
    }

    #[test]
    fn test_filter_then_sort_then_page() {
        let mut fixture = Fixture::new(Paginator::new(true, PaginationMode::Client, 5));
        fixture.filters = vec![FilterCondition::new("team", FilterType::Text)
            .with_operator(FilterOperator::Is)
            .with_value("red")];
        fixture.sorting = vec![ColumnSort::desc("id")];

        let view = fixture.compose(None, false);
        assert_eq!(view.filtered_count, 8);
        let ids: Vec<i64> = view
            .data_rows(&fixture.rows)
            .iter()
            .map(|r| r["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![24, 21, 18, 15, 12]);
    }

    #[test]
    fn test_server_mode_passes_page_through() {
        let mut paginator = Paginator::new(true, PaginationMode::Server, 10);
        paginator.set_server_meta(4, 9, 87);
        let mut fixture = Fixture::new(paginator);
        // Filters were already applied by the server
        fixture.filters = vec![FilterCondition::new("team", FilterType::Text).with_value("nothing")];

        let view = fixture.compose(None, true);
        assert_eq!(view.data_indices().len(), 25);
        assert_eq!(view.pagination.max_page, 9);
        assert_eq!(view.pagination.total_records, 87);
        assert!(!view.show_pagination);
        assert!(!view.virtualize);
    }
}
