//! Column descriptors
//!
//! Columns are supplied by the caller on every render and are treated as
//! read-only input. The column `id` is the join key between persisted view
//! state and the descriptors, so ids must be non-empty, unique and stable.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::filter::FilterType;
use crate::record::Record;
use crate::CoreError;

/// Function accessor: computes a column value from a row
pub type AccessorFn<R> = Arc<dyn Fn(&R) -> Option<Value> + Send + Sync>;

/// How a column reads its value from a row
pub enum Accessor<R> {
    /// Dot-separated path into the row
    Path(String),
    /// Explicit function
    Func(AccessorFn<R>),
}

impl<R> Clone for Accessor<R> {
    fn clone(&self) -> Self {
        match self {
            Accessor::Path(path) => Accessor::Path(path.clone()),
            Accessor::Func(f) => Accessor::Func(Arc::clone(f)),
        }
    }
}

impl<R> fmt::Debug for Accessor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Accessor::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl<R: Record> Accessor<R> {
    /// Build a function accessor from a closure
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&R) -> Option<Value> + Send + Sync + 'static,
    {
        Accessor::Func(Arc::new(f))
    }

    /// Resolve the value for a row
    pub fn resolve<'a>(&self, row: &'a R) -> Option<Cow<'a, Value>> {
        match self {
            Accessor::Path(path) => row.path(path),
            Accessor::Func(f) => f(row).map(Cow::Owned),
        }
    }
}

/// Accessors keyed by column id
pub type Accessors<R> = AHashMap<String, Accessor<R>>;

/// One selectable option of a select column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnOption {
    pub label: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ColumnOption {
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Declarative description of one column
pub struct ColumnDescriptor<R> {
    /// Unique, stable identifier
    pub id: String,

    /// Display label, defaults to the id
    pub header: Option<String>,

    /// Value accessor, defaults to the id used as a path
    pub accessor: Option<Accessor<R>>,

    /// Whether the column is offered in the filter menu and searched
    pub filterable: bool,

    /// Filter type used when a condition is added for this column
    pub filter_type: Option<FilterType>,

    /// Per-column overrides of the table feature flags
    pub sortable: Option<bool>,
    pub orderable: Option<bool>,
    pub resizable: Option<bool>,
    pub visibility_toggle: Option<bool>,

    /// Options for select columns
    pub options: Vec<ColumnOption>,
}

impl<R> Clone for ColumnDescriptor<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            accessor: self.accessor.clone(),
            filterable: self.filterable,
            filter_type: self.filter_type,
            sortable: self.sortable,
            orderable: self.orderable,
            resizable: self.resizable,
            visibility_toggle: self.visibility_toggle,
            options: self.options.clone(),
        }
    }
}

impl<R> fmt::Debug for ColumnDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("accessor", &self.accessor)
            .field("filterable", &self.filterable)
            .field("filter_type", &self.filter_type)
            .finish_non_exhaustive()
    }
}

impl<R: Record> ColumnDescriptor<R> {
    /// Create a column that reads the field named like its id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            header: None,
            accessor: None,
            filterable: false,
            filter_type: None,
            sortable: None,
            orderable: None,
            resizable: None,
            visibility_toggle: None,
            options: Vec::new(),
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.accessor = Some(Accessor::Path(path.into()));
        self
    }

    pub fn with_accessor<F>(mut self, f: F) -> Self
    where
        F: Fn(&R) -> Option<Value> + Send + Sync + 'static,
    {
        self.accessor = Some(Accessor::func(f));
        self
    }

    /// Make the column filterable with the given filter type
    pub fn filterable(mut self, filter_type: FilterType) -> Self {
        self.filterable = true;
        self.filter_type = Some(filter_type);
        self
    }

    pub fn with_options(mut self, options: Vec<ColumnOption>) -> Self {
        self.options = options;
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = Some(sortable);
        self
    }

    pub fn orderable(mut self, orderable: bool) -> Self {
        self.orderable = Some(orderable);
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = Some(resizable);
        self
    }

    pub fn visibility_toggle(mut self, visibility_toggle: bool) -> Self {
        self.visibility_toggle = Some(visibility_toggle);
        self
    }

    /// Label shown in headers and filter chips
    pub fn label(&self) -> &str {
        self.header.as_deref().unwrap_or(&self.id)
    }

    /// Internal columns (`_actions`, `_select`, ...) never take part in
    /// searching, filtering, ordering or visibility toggling
    pub fn is_internal(&self) -> bool {
        self.id.starts_with('_')
    }

    /// Read this column's value from a row
    pub fn value<'a>(&self, row: &'a R) -> Option<Cow<'a, Value>> {
        match &self.accessor {
            Some(accessor) => accessor.resolve(row),
            None => row.path(&self.id),
        }
    }

    /// Filter type for new conditions on this column
    pub fn effective_filter_type(&self) -> FilterType {
        self.filter_type.unwrap_or(FilterType::Text)
    }

    pub fn is_sortable(&self, table_default: bool) -> bool {
        !self.is_internal() && self.sortable.unwrap_or(table_default)
    }

    pub fn is_orderable(&self, table_default: bool) -> bool {
        !self.is_internal() && self.orderable.unwrap_or(table_default)
    }

    pub fn is_resizable(&self, table_default: bool) -> bool {
        self.resizable.unwrap_or(table_default)
    }

    pub fn can_toggle_visibility(&self, table_default: bool) -> bool {
        !self.is_internal() && self.visibility_toggle.unwrap_or(table_default)
    }
}

/// Entry of the filter menu
#[derive(Debug, Clone, PartialEq)]
pub struct FilterableColumn {
    pub column_id: String,
    pub label: String,
    pub filter_type: FilterType,
}

/// Give every column an id: the accessor path if there is one, otherwise
/// `column_<index>`
pub fn ensure_column_ids<R: Record>(columns: Vec<ColumnDescriptor<R>>) -> Vec<ColumnDescriptor<R>> {
    columns
        .into_iter()
        .enumerate()
        .map(|(index, mut column)| {
            if column.id.is_empty() {
                column.id = match &column.accessor {
                    Some(Accessor::Path(path)) if !path.is_empty() => path.clone(),
                    _ => format!("column_{}", index),
                };
            }
            column
        })
        .collect()
}

/// Every id must be non-empty and unique
pub fn validate_columns<R>(columns: &[ColumnDescriptor<R>]) -> Result<(), CoreError> {
    let mut seen = AHashSet::with_capacity(columns.len());
    for column in columns {
        if column.id.is_empty() {
            return Err(CoreError::EmptyColumnId);
        }
        if !seen.insert(column.id.as_str()) {
            return Err(CoreError::DuplicateColumnId(column.id.clone()));
        }
    }
    Ok(())
}

/// Column ids in declaration order
pub fn default_column_order<R>(columns: &[ColumnDescriptor<R>]) -> Vec<String> {
    columns.iter().map(|c| c.id.clone()).collect()
}

/// Columns offered by the filter menu
pub fn filterable_columns<R: Record>(columns: &[ColumnDescriptor<R>]) -> Vec<FilterableColumn> {
    columns
        .iter()
        .filter(|c| c.filterable && !c.is_internal())
        .map(|c| FilterableColumn {
            column_id: c.id.clone(),
            label: c.label().to_string(),
            filter_type: c.effective_filter_type(),
        })
        .collect()
}

/// Collect the accessors of all columns that define one
pub fn accessor_map<R: Record>(columns: &[ColumnDescriptor<R>]) -> Accessors<R> {
    columns
        .iter()
        .filter_map(|c| c.accessor.clone().map(|a| (c.id.clone(), a)))
        .collect()
}
