//! Query filters
//!
//! A filter is a small expression tree over entity fields: equality and null tests,
//! combined with AND. Stores translate it to SQL through `SqlGenerator` or evaluate it
//! directly against entities, so it never needs a closure run after loading.

use serde_json::Value;

/// Comparisons a filter condition can make
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperator {
    Eq,
    IsNull,
    IsNotNull,
}

/// One comparison of an entity field against a JSON value
#[derive(Debug, Clone, PartialEq)]
pub struct QueryCondition {
    pub field: String,
    pub operator: QueryOperator,
    pub value: Option<Value>, // None for IS NULL/IS NOT NULL
}

/// Filter tree, used both as a visibility filter and as a query predicate
#[derive(Debug, Clone, PartialEq)]
pub enum QueryFilter {
    Condition(QueryCondition),
    All(Vec<QueryFilter>),
}

impl QueryFilter {
    fn condition(field: &str, operator: QueryOperator, value: Option<Value>) -> Self {
        Self::Condition(QueryCondition {
            field: field.to_string(),
            operator,
            value,
        })
    }

    /// Every filter must match; an empty list matches everything
    pub fn and(filters: Vec<QueryFilter>) -> Self {
        Self::All(filters)
    }

    /// Equal condition, `IS NULL` when `value` is null
    pub fn eq(field: &str, value: Value) -> Self {
        Self::condition(field, QueryOperator::Eq, Some(value))
    }

    pub fn is_null(field: &str) -> Self {
        Self::condition(field, QueryOperator::IsNull, None)
    }

    pub fn is_not_null(field: &str) -> Self {
        Self::condition(field, QueryOperator::IsNotNull, None)
    }

    /// Combine two filters with AND, flattening nested AND groups
    pub fn and_also(self, other: QueryFilter) -> Self {
        let mut filters = Vec::new();
        for filter in [self, other] {
            match filter {
                QueryFilter::All(inner) => filters.extend(inner),
                other => filters.push(other),
            }
        }
        Self::All(filters)
    }
}
