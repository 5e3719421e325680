//! Client-side sorting
//!
//! Sorting state is an ordered list of column sorts; earlier entries take
//! precedence. Values compare numerically when both sides are numbers,
//! otherwise as case-insensitive strings. Empty values always sort last.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::column::Accessors;
use crate::record::{display_string, is_empty_value, Record};

/// Sort on one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSort {
    pub id: String,
    pub desc: bool,
}

impl ColumnSort {
    pub fn asc(id: impl Into<String>) -> Self {
        Self { id: id.into(), desc: false }
    }

    pub fn desc(id: impl Into<String>) -> Self {
        Self { id: id.into(), desc: true }
    }

    /// Wire form used in server query strings
    pub fn direction(&self) -> &'static str {
        if self.desc {
            "desc"
        } else {
            "asc"
        }
    }
}

pub type SortingState = Vec<ColumnSort>;

/// Cycle a column through ascending, descending and unsorted.
///
/// With `multi` the other sorts are kept, otherwise the column replaces them.
pub fn toggle_sort(sorting: &mut SortingState, column_id: &str, multi: bool) {
    let current = sorting.iter().position(|s| s.id == column_id);

    match current {
        None => {
            if !multi {
                sorting.clear();
            }
            sorting.push(ColumnSort::asc(column_id));
        }
        Some(pos) if !sorting[pos].desc => {
            if multi {
                sorting[pos].desc = true;
            } else {
                *sorting = vec![ColumnSort::desc(column_id)];
            }
        }
        Some(pos) => {
            if multi {
                sorting.remove(pos);
            } else {
                sorting.clear();
            }
        }
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Order two cell values ascending with empty values last
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (is_empty_value(a), is_empty_value(b)) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        _ => {}
    }

    if let (Some(x), Some(y)) = (a.and_then(numeric), b.and_then(numeric)) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }

    display_string(a)
        .to_lowercase()
        .cmp(&display_string(b).to_lowercase())
}

fn resolve_value<R: Record>(row: &R, column_id: &str, accessors: &Accessors<R>) -> Option<Value> {
    let value = match accessors.get(column_id) {
        Some(accessor) => accessor.resolve(row),
        None => row.path(column_id),
    };
    value.map(|v| v.into_owned())
}

/// Stable sort of a selection of row indices
pub fn sort_selection<R: Record>(
    rows: &[R],
    selection: &[usize],
    sorting: &[ColumnSort],
    accessors: &Accessors<R>,
) -> Vec<usize> {
    if sorting.is_empty() {
        return selection.to_vec();
    }

    // Resolve every key once up front
    let mut keyed: Vec<(usize, Vec<Option<Value>>)> = selection
        .iter()
        .map(|&idx| {
            let keys = sorting
                .iter()
                .map(|s| resolve_value(&rows[idx], &s.id, accessors))
                .collect();
            (idx, keys)
        })
        .collect();

    keyed.sort_by(|(_, a), (_, b)| {
        for (i, sort) in sorting.iter().enumerate() {
            let (x, y) = (a[i].as_ref(), b[i].as_ref());
            let mut ord = compare_values(x, y);
            // Empty values stay last in both directions
            if sort.desc && !is_empty_value(x) && !is_empty_value(y) {
                ord = ord.reverse();
            }
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });

    keyed.into_iter().map(|(idx, _)| idx).collect()
}

/// Stable sort of rows
pub fn sort_rows<'a, R: Record>(rows: &'a [R], sorting: &[ColumnSort], accessors: &Accessors<R>) -> Vec<&'a R> {
    let all: Vec<usize> = (0..rows.len()).collect();
    sort_selection(rows, &all, sorting, accessors)
        .into_iter()
        .map(|idx| &rows[idx])
        .collect()
}
