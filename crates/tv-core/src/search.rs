//! Free-text search stage
//!
//! Runs after the filter stage: a row matches when the stringified value of
//! any filterable, non-internal column contains the trimmed, lowercased query.

use crate::column::ColumnDescriptor;
use crate::record::{display_string, Record};

/// Normalise raw user input into the form matched against cell values
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

fn searchable<R: Record>(columns: &[ColumnDescriptor<R>]) -> Vec<&ColumnDescriptor<R>> {
    columns.iter().filter(|c| c.filterable && !c.is_internal()).collect()
}

fn row_matches<R: Record>(row: &R, needle: &str, columns: &[&ColumnDescriptor<R>]) -> bool {
    columns.iter().any(|column| {
        let value = column.value(row);
        display_string(value.as_deref()).to_lowercase().contains(needle)
    })
}

/// Search a selection of row indices. A blank query keeps the selection.
pub fn search_selection<R: Record>(
    rows: &[R],
    selection: &[usize],
    query: &str,
    columns: &[ColumnDescriptor<R>],
) -> Vec<usize> {
    let needle = normalize_query(query);
    if needle.is_empty() {
        return selection.to_vec();
    }

    let columns = searchable(columns);
    selection
        .iter()
        .copied()
        .filter(|&idx| row_matches(&rows[idx], &needle, &columns))
        .collect()
}

/// Search rows
pub fn search_rows<'a, R: Record>(rows: &'a [R], query: &str, columns: &[ColumnDescriptor<R>]) -> Vec<&'a R> {
    let needle = normalize_query(query);
    if needle.is_empty() {
        return rows.iter().collect();
    }

    let columns = searchable(columns);
    rows.iter().filter(|row| row_matches(*row, &needle, &columns)).collect()
}
