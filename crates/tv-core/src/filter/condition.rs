//! Single filter conditions and their evaluation

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::operator::{FilterOperator, FilterType};
use crate::column::{Accessor, ColumnOption};
use crate::record::{display_string, is_empty_value, is_truthy, to_date, to_number, Record};
use crate::CoreError;

/// One filter test on one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCondition {
    /// Unique identifier of this condition
    pub id: String,
    pub column_id: String,
    pub filter_type: FilterType,
    pub operator: FilterOperator,
    /// Comparison value; `None` (or JSON null) means "not configured yet"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Generate a unique condition id
pub fn generate_filter_id() -> String {
    format!("filter_{}", Uuid::new_v4().simple())
}

impl FilterCondition {
    /// New condition with the type's default operator and no value
    pub fn new(column_id: impl Into<String>, filter_type: FilterType) -> Self {
        Self {
            id: generate_filter_id(),
            column_id: column_id.into(),
            filter_type,
            operator: filter_type.default_operator(),
            value: None,
        }
    }

    pub fn with_operator(mut self, operator: FilterOperator) -> Self {
        self.operator = operator;
        self
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// The operator must belong to the operator set of the filter type
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.filter_type.supports(self.operator) {
            Ok(())
        } else {
            Err(CoreError::InvalidOperator {
                operator: self.operator,
                filter_type: self.filter_type,
            })
        }
    }

    /// Configured value, with JSON null folded into `None`
    pub fn configured_value(&self) -> Option<&Value> {
        self.value.as_ref().filter(|v| !v.is_null())
    }

    /// Short summary used by filter chips, e.g. `Status is "Open"`.
    ///
    /// Select values are shown by their option label when one matches.
    pub fn display_text(&self, column_label: &str, options: &[ColumnOption]) -> String {
        let operator = self.operator.label().to_lowercase();

        if !self.operator.requires_value() {
            return format!("{} {}", column_label, operator);
        }

        let value = match self.configured_value() {
            Some(v) if !display_string(Some(v)).is_empty() => v,
            _ => return format!("{} {}...", column_label, operator),
        };

        let shown = if self.filter_type == FilterType::Select {
            let raw = display_string(Some(value));
            options
                .iter()
                .find(|o| display_string(Some(&o.value)) == raw)
                .map(|o| o.label.clone())
                .unwrap_or(raw)
        } else {
            display_string(Some(value))
        };

        format!("{} {} \"{}\"", column_label, operator, shown)
    }
}

/// Decide whether a row satisfies a condition.
///
/// The value is read through `accessor` when given, otherwise by walking
/// `condition.column_id` as a dot path. Malformed or missing comparison values
/// never hide rows: such conditions are vacuous and evaluate to `true`.
pub fn evaluate<R: Record>(row: &R, condition: &FilterCondition, accessor: Option<&Accessor<R>>) -> bool {
    let resolved = match accessor {
        Some(accessor) => accessor.resolve(row),
        None => row.path(&condition.column_id),
    };
    let raw = resolved.as_deref();

    // Emptiness checks work for every type
    match condition.operator {
        FilterOperator::IsEmpty => return is_empty_value(raw),
        FilterOperator::IsNotEmpty => return !is_empty_value(raw),
        _ => {}
    }

    if condition.filter_type == FilterType::Boolean {
        let truthy = is_truthy(raw);
        return match condition.operator {
            FilterOperator::IsTrue => truthy,
            FilterOperator::IsFalse => !truthy,
            _ => true,
        };
    }

    let Some(expected) = condition.configured_value() else {
        return true;
    };

    match condition.filter_type {
        FilterType::Text => compare_text(raw, expected, condition.operator),
        FilterType::Number => compare_number(raw, expected, condition.operator),
        FilterType::Date => compare_date(raw, expected, condition.operator),
        FilterType::Select => compare_select(raw, expected, condition.operator),
        FilterType::Boolean => true,
    }
}

fn compare_text(raw: Option<&Value>, expected: &Value, operator: FilterOperator) -> bool {
    let actual = display_string(raw).to_lowercase();
    let expected = display_string(Some(expected)).to_lowercase();

    match operator {
        FilterOperator::Is => actual == expected,
        FilterOperator::IsNot => actual != expected,
        FilterOperator::Contains => actual.contains(&expected),
        FilterOperator::DoesNotContain => !actual.contains(&expected),
        FilterOperator::StartsWith => actual.starts_with(&expected),
        FilterOperator::EndsWith => actual.ends_with(&expected),
        _ => true,
    }
}

fn compare_number(raw: Option<&Value>, expected: &Value, operator: FilterOperator) -> bool {
    let actual = to_number(raw);
    let expected = to_number(Some(expected));

    if actual.is_nan() || expected.is_nan() {
        return true;
    }

    match operator {
        FilterOperator::Equals => actual == expected,
        FilterOperator::NotEquals => actual != expected,
        FilterOperator::GreaterThan => actual > expected,
        FilterOperator::LessThan => actual < expected,
        FilterOperator::GreaterThanOrEquals => actual >= expected,
        FilterOperator::LessThanOrEquals => actual <= expected,
        _ => true,
    }
}

fn compare_date(raw: Option<&Value>, expected: &Value, operator: FilterOperator) -> bool {
    let (Some(actual), Some(expected)) = (to_date(raw), to_date(Some(expected))) else {
        return true;
    };

    match operator {
        FilterOperator::Is => actual == expected,
        FilterOperator::IsNot => actual != expected,
        FilterOperator::IsBefore => actual < expected,
        FilterOperator::IsAfter => actual > expected,
        FilterOperator::IsOnOrBefore => actual <= expected,
        FilterOperator::IsOnOrAfter => actual >= expected,
        _ => true,
    }
}

fn compare_select(raw: Option<&Value>, expected: &Value, operator: FilterOperator) -> bool {
    let actual = display_string(raw);
    let expected = display_string(Some(expected));

    match operator {
        FilterOperator::Is => actual == expected,
        FilterOperator::IsNot => actual != expected,
        _ => true,
    }
}
