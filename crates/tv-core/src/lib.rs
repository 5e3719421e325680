//! Core functionality for the table view engine
//!
//! This crate provides the pure data stages of a table: filter evaluation,
//! free-text search, sorting, grouping and pagination, together with the
//! column model and the table event bus.

pub mod column;
pub mod events;
pub mod filter;
pub mod grouping;
pub mod pagination;
pub mod record;
pub mod search;
pub mod sorting;

use thiserror::Error;

// Re-export commonly used types
pub use column::{
    accessor_map, default_column_order, ensure_column_ids, filterable_columns, validate_columns, Accessor,
    Accessors, ColumnDescriptor, ColumnOption, FilterableColumn,
};
pub use events::EventBus;
pub use filter::{
    apply_filters, evaluate, filter_selection, operators_for, CompoundFilter, FilterCondition, FilterOperator, FilterState,
    FilterType, LogicalOperator,
};
pub use grouping::{group_rows, group_selection, is_group_expanded, toggle_group, ExpandedGroups, GroupedView};
pub use pagination::{
    max_page, paginate, PageChange, PaginationMode, PaginationSummary, PaginationView, Paginator,
};
pub use record::{display_string, Record};
pub use search::{search_rows, search_selection};
pub use sorting::{sort_rows, sort_selection, toggle_sort, ColumnSort, SortingState};

/// Errors raised by table commands
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Column id must not be empty")]
    EmptyColumnId,

    #[error("Duplicate column id: {0}")]
    DuplicateColumnId(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    #[error("Operator '{}' is not valid for {} filters", operator.label(), filter_type.as_str())]
    InvalidOperator {
        operator: FilterOperator,
        filter_type: FilterType,
    },
}
