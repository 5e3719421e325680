//! Filter engine
//!
//! Supports:
//! - Multiple filter types (text, number, date, boolean, select)
//! - Per-type operator sets with defaults and labels
//! - Flat AND lists (what tables evaluate) and compound AND/OR trees

mod condition;
mod engine;
mod operator;

pub use condition::{evaluate, generate_filter_id, FilterCondition};
pub use engine::{
    apply_compound, apply_filters, filter_selection, has_active_filters, matches_all, matches_compound,
    CompoundFilter, FilterNode, FilterState, LogicalOperator,
};
pub use operator::{operators_for, FilterOperator, FilterType};
