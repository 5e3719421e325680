//! Filter stage: flat AND lists and compound AND/OR trees

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::condition::{evaluate, FilterCondition};
use crate::column::Accessors;
use crate::record::Record;

/// Ordered list of conditions combined with AND
pub type FilterState = Vec<FilterCondition>;

/// How the children of a [`CompoundFilter`] are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    And,
    Or,
}

/// Node of a compound filter tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterNode {
    Group(CompoundFilter),
    Condition(FilterCondition),
}

/// AND/OR tree of conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundFilter {
    pub logic: LogicalOperator,
    pub conditions: Vec<FilterNode>,
}

impl CompoundFilter {
    pub fn and(conditions: Vec<FilterNode>) -> Self {
        Self {
            logic: LogicalOperator::And,
            conditions,
        }
    }

    pub fn or(conditions: Vec<FilterNode>) -> Self {
        Self {
            logic: LogicalOperator::Or,
            conditions,
        }
    }
}

impl From<FilterCondition> for FilterNode {
    fn from(condition: FilterCondition) -> Self {
        FilterNode::Condition(condition)
    }
}

impl From<CompoundFilter> for FilterNode {
    fn from(group: CompoundFilter) -> Self {
        FilterNode::Group(group)
    }
}

/// Whether any condition is configured
pub fn has_active_filters(filters: &[FilterCondition]) -> bool {
    !filters.is_empty()
}

/// A row passes when it satisfies every condition
pub fn matches_all<R: Record>(row: &R, filters: &[FilterCondition], accessors: &Accessors<R>) -> bool {
    filters
        .iter()
        .all(|condition| evaluate(row, condition, accessors.get(&condition.column_id)))
}

/// Apply a flat AND list to a selection of row indices.
///
/// An empty filter list returns the selection unchanged.
pub fn filter_selection<R: Record>(
    rows: &[R],
    selection: &[usize],
    filters: &[FilterCondition],
    accessors: &Accessors<R>,
) -> Vec<usize> {
    if filters.is_empty() {
        return selection.to_vec();
    }

    let kept: Vec<usize> = selection
        .iter()
        .copied()
        .filter(|&idx| matches_all(&rows[idx], filters, accessors))
        .collect();
    debug!("Filtered {} of {} rows with {} conditions", kept.len(), selection.len(), filters.len());
    kept
}

/// Apply a flat AND list to rows
pub fn apply_filters<'a, R: Record>(
    rows: &'a [R],
    filters: &[FilterCondition],
    accessors: &Accessors<R>,
) -> Vec<&'a R> {
    if filters.is_empty() {
        return rows.iter().collect();
    }

    rows.iter().filter(|row| matches_all(*row, filters, accessors)).collect()
}

/// Evaluate a compound tree for one row. Empty groups match everything.
pub fn matches_compound<R: Record>(row: &R, filter: &CompoundFilter, accessors: &Accessors<R>) -> bool {
    if filter.conditions.is_empty() {
        return true;
    }

    let mut results = filter.conditions.iter().map(|node| match node {
        FilterNode::Group(group) => matches_compound(row, group, accessors),
        FilterNode::Condition(condition) => evaluate(row, condition, accessors.get(&condition.column_id)),
    });

    match filter.logic {
        LogicalOperator::And => results.all(|r| r),
        LogicalOperator::Or => results.any(|r| r),
    }
}

/// Apply a compound AND/OR tree to rows
pub fn apply_compound<'a, R: Record>(
    rows: &'a [R],
    filter: &CompoundFilter,
    accessors: &Accessors<R>,
) -> Vec<&'a R> {
    rows.iter().filter(|row| matches_compound(*row, filter, accessors)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterOperator, FilterType};
    use serde_json::{json, Value};

    fn rows() -> Vec<Value> {
        vec![
            json!({ "id": 1, "status": "open", "amount": 5 }),
            json!({ "id": 2, "status": "closed", "amount": 15 }),
            json!({ "id": 3, "status": "open", "amount": 25 }),
        ]
    }

    fn ids(rows: &[&Value]) -> Vec<i64> {
        rows.iter().map(|r| r["id"].as_i64().unwrap()).collect()
    }

    #[test]
    fn test_empty_filter_list_is_noop() {
        let data = rows();
        let out = apply_filters(&data, &[], &Accessors::default());
        assert_eq!(ids(&out), vec![1, 2, 3]);
    }

    #[test]
    fn test_and_semantics() {
        let data = rows();
        let open = FilterCondition::new("status", FilterType::Text)
            .with_operator(FilterOperator::Is)
            .with_value("open");
        let big = FilterCondition::new("amount", FilterType::Number)
            .with_operator(FilterOperator::GreaterThan)
            .with_value(10);
        let accessors = Accessors::default();

        assert_eq!(ids(&apply_filters(&data, &[open.clone()], &accessors)), vec![1, 3]);
        assert_eq!(ids(&apply_filters(&data, &[big.clone()], &accessors)), vec![2, 3]);
        // Only rows matching both individually survive
        assert_eq!(ids(&apply_filters(&data, &[open, big], &accessors)), vec![3]);
    }

    #[test]
    fn test_filter_selection_keeps_source_indices() {
        let data = rows();
        let closed = FilterCondition::new("status", FilterType::Text)
            .with_operator(FilterOperator::Is)
            .with_value("closed");
        let out = filter_selection(&data, &[0, 1, 2], &[closed], &Accessors::default());
        assert_eq!(out, vec![1]);
    }

    #[test]
    fn test_compound_or_and_nesting() {
        let data = rows();
        let closed = FilterCondition::new("status", FilterType::Select).with_value("closed");
        let small = FilterCondition::new("amount", FilterType::Number)
            .with_operator(FilterOperator::LessThan)
            .with_value(10);
        let first = FilterCondition::new("id", FilterType::Number).with_value(1);

        let tree = CompoundFilter::or(vec![
            closed.into(),
            CompoundFilter::and(vec![small.into(), first.into()]).into(),
        ]);
        let accessors = Accessors::default();
        assert_eq!(ids(&apply_compound(&data, &tree, &accessors)), vec![1, 2]);

        let empty = CompoundFilter::and(Vec::new());
        assert_eq!(apply_compound(&data, &empty, &accessors).len(), 3);
    }

    #[test]
    fn test_compound_tree_roundtrips_through_json() {
        let tree = CompoundFilter::and(vec![FilterCondition::new("a", FilterType::Text).with_value("x").into()]);
        let json = serde_json::to_string(&tree).unwrap();
        let back: CompoundFilter = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }
}
