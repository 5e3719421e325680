//! Filter types and operators

use serde::{Deserialize, Serialize};

/// Kind of value a condition compares against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    Text,
    Number,
    Date,
    Boolean,
    Select,
}

/// Every operator known to the engine; which ones are valid depends on the
/// [`FilterType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    // Text, date and select
    Is,
    IsNot,
    // Text
    Contains,
    DoesNotContain,
    StartsWith,
    EndsWith,
    // Number
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterThanOrEquals,
    LessThanOrEquals,
    // Date
    IsBefore,
    IsAfter,
    IsOnOrBefore,
    IsOnOrAfter,
    // Boolean
    IsTrue,
    IsFalse,
    // Any type
    IsEmpty,
    IsNotEmpty,
}

const TEXT_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Is,
    FilterOperator::IsNot,
    FilterOperator::Contains,
    FilterOperator::DoesNotContain,
    FilterOperator::StartsWith,
    FilterOperator::EndsWith,
    FilterOperator::IsEmpty,
    FilterOperator::IsNotEmpty,
];

const NUMBER_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Equals,
    FilterOperator::NotEquals,
    FilterOperator::GreaterThan,
    FilterOperator::LessThan,
    FilterOperator::GreaterThanOrEquals,
    FilterOperator::LessThanOrEquals,
    FilterOperator::IsEmpty,
    FilterOperator::IsNotEmpty,
];

const DATE_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Is,
    FilterOperator::IsNot,
    FilterOperator::IsBefore,
    FilterOperator::IsAfter,
    FilterOperator::IsOnOrBefore,
    FilterOperator::IsOnOrAfter,
    FilterOperator::IsEmpty,
    FilterOperator::IsNotEmpty,
];

const BOOLEAN_OPERATORS: &[FilterOperator] = &[FilterOperator::IsTrue, FilterOperator::IsFalse];

const SELECT_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Is,
    FilterOperator::IsNot,
    FilterOperator::IsEmpty,
    FilterOperator::IsNotEmpty,
];

/// Operators valid for a filter type, in menu order
pub fn operators_for(filter_type: FilterType) -> &'static [FilterOperator] {
    filter_type.operators()
}

impl FilterType {
    /// Operators valid for this type, in menu order
    pub fn operators(self) -> &'static [FilterOperator] {
        match self {
            FilterType::Text => TEXT_OPERATORS,
            FilterType::Number => NUMBER_OPERATORS,
            FilterType::Date => DATE_OPERATORS,
            FilterType::Boolean => BOOLEAN_OPERATORS,
            FilterType::Select => SELECT_OPERATORS,
        }
    }

    /// Operator preselected when a new condition is created
    pub fn default_operator(self) -> FilterOperator {
        match self {
            FilterType::Text => FilterOperator::Contains,
            FilterType::Number => FilterOperator::Equals,
            FilterType::Date => FilterOperator::Is,
            FilterType::Boolean => FilterOperator::IsTrue,
            FilterType::Select => FilterOperator::Is,
        }
    }

    /// First operator in menu order, used when a condition switches type
    pub fn first_operator(self) -> FilterOperator {
        self.operators()[0]
    }

    pub fn supports(self, operator: FilterOperator) -> bool {
        self.operators().contains(&operator)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterType::Text => "text",
            FilterType::Number => "number",
            FilterType::Date => "date",
            FilterType::Boolean => "boolean",
            FilterType::Select => "select",
        }
    }
}

impl FilterOperator {
    /// `is_empty`, `is_not_empty`, `is_true` and `is_false` carry no value
    pub fn requires_value(self) -> bool {
        !matches!(
            self,
            FilterOperator::IsEmpty | FilterOperator::IsNotEmpty | FilterOperator::IsTrue | FilterOperator::IsFalse
        )
    }

    /// Human readable label
    pub fn label(self) -> &'static str {
        match self {
            FilterOperator::Is => "Is",
            FilterOperator::IsNot => "Is not",
            FilterOperator::Contains => "Contains",
            FilterOperator::DoesNotContain => "Does not contain",
            FilterOperator::StartsWith => "Starts with",
            FilterOperator::EndsWith => "Ends with",
            FilterOperator::Equals => "Equals",
            FilterOperator::NotEquals => "Not equals",
            FilterOperator::GreaterThan => "Greater than",
            FilterOperator::LessThan => "Less than",
            FilterOperator::GreaterThanOrEquals => "Greater than or equals",
            FilterOperator::LessThanOrEquals => "Less than or equals",
            FilterOperator::IsBefore => "Is before",
            FilterOperator::IsAfter => "Is after",
            FilterOperator::IsOnOrBefore => "Is on or before",
            FilterOperator::IsOnOrAfter => "Is on or after",
            FilterOperator::IsTrue => "Is true",
            FilterOperator::IsFalse => "Is false",
            FilterOperator::IsEmpty => "Is empty",
            FilterOperator::IsNotEmpty => "Is not empty",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_operator_is_supported() {
        for ty in [
            FilterType::Text,
            FilterType::Number,
            FilterType::Date,
            FilterType::Boolean,
            FilterType::Select,
        ] {
            assert!(ty.supports(ty.default_operator()), "{:?}", ty);
        }
    }

    #[test]
    fn test_operator_sets() {
        assert!(FilterType::Text.supports(FilterOperator::StartsWith));
        assert!(!FilterType::Number.supports(FilterOperator::Contains));
        assert!(!FilterType::Boolean.supports(FilterOperator::IsEmpty));
        assert_eq!(FilterType::Text.first_operator(), FilterOperator::Is);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&FilterOperator::GreaterThanOrEquals).unwrap();
        assert_eq!(json, "\"greater_than_or_equals\"");
        let ty: FilterType = serde_json::from_str("\"select\"").unwrap();
        assert_eq!(ty, FilterType::Select);
    }
}
