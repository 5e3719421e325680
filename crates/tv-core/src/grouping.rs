//! Grouping stage
//!
//! Buckets rows by the stringified value of one column. Buckets keep the
//! first-seen order of their keys; null and missing values share the `""`
//! bucket. Expansion state lives in a separate map where an absent key means
//! expanded.

use ahash::AHashMap;
use indexmap::IndexMap;
use tracing::debug;

use crate::column::{Accessor, Accessors};
use crate::record::{display_string, Record};

/// Ordered buckets keyed by stringified column value
pub type GroupedView<T> = IndexMap<String, Vec<T>>;

/// Expansion state per bucket key
pub type ExpandedGroups = AHashMap<String, bool>;

/// Bucket key of a row. The column's accessor wins over the raw path.
pub fn group_key<R: Record>(row: &R, column_id: &str, accessor: Option<&Accessor<R>>) -> String {
    let value = match accessor {
        Some(accessor) => accessor.resolve(row),
        None => row.path(column_id),
    };
    display_string(value.as_deref())
}

/// Group a selection of row indices; `None` when grouping is off
pub fn group_selection<R: Record>(
    rows: &[R],
    selection: &[usize],
    group_by: Option<&str>,
    accessors: &Accessors<R>,
) -> Option<GroupedView<usize>> {
    let column_id = group_by?;
    let accessor = accessors.get(column_id);
    let mut groups: GroupedView<usize> = IndexMap::new();

    for &idx in selection {
        groups.entry(group_key(&rows[idx], column_id, accessor)).or_default().push(idx);
    }

    debug!("Grouped {} rows by '{}' into {} groups", selection.len(), column_id, groups.len());
    Some(groups)
}

/// Group rows; `None` when grouping is off
pub fn group_rows<'a, R: Record>(
    rows: &'a [R],
    group_by: Option<&str>,
    accessors: &Accessors<R>,
) -> Option<GroupedView<&'a R>> {
    let column_id = group_by?;
    let accessor = accessors.get(column_id);
    let mut groups: GroupedView<&'a R> = IndexMap::new();

    for row in rows {
        groups.entry(group_key(row, column_id, accessor)).or_default().push(row);
    }

    Some(groups)
}

/// Buckets are open until explicitly collapsed
pub fn is_group_expanded(expanded: &ExpandedGroups, key: &str) -> bool {
    expanded.get(key).copied().unwrap_or(true)
}

/// Flip a bucket's expansion state and return the new state
pub fn toggle_group(expanded: &mut ExpandedGroups, key: &str) -> bool {
    let next = !is_group_expanded(expanded, key);
    expanded.insert(key.to_string(), next);
    next
}
