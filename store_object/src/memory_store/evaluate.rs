//! In-memory evaluation of query filters
//!
//! Follows SQL semantics where they matter for filtering: a comparison against a null
//! field is never true, except through `IS NULL` or equality with null.

use crate::query_builder::{QueryCondition, QueryFilter, QueryOperator};
use crate::traits::Entity;
use serde_json::Value;
use std::cmp::Ordering;

pub fn matches(filter: &QueryFilter, entity: &dyn Entity) -> bool {
    match filter {
        QueryFilter::Condition(condition) => condition_matches(condition, entity),
        QueryFilter::All(filters) => matches_all(filters, entity),
    }
}

pub fn matches_all(filters: &[QueryFilter], entity: &dyn Entity) -> bool {
    filters.iter().all(|f| matches(f, entity))
}

fn condition_matches(condition: &QueryCondition, entity: &dyn Entity) -> bool {
    let actual = entity.field(&condition.field).unwrap_or(Value::Null);
    let expected = condition.value.as_ref().unwrap_or(&Value::Null);

    match condition.operator {
        QueryOperator::IsNull => actual.is_null(),
        QueryOperator::IsNotNull => !actual.is_null(),
        QueryOperator::Eq if expected.is_null() => actual.is_null(),
        QueryOperator::Eq => compare(&actual, expected) == Some(Ordering::Equal),
    }
}

/// Compare two JSON scalars, `None` when they are not comparable
pub fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => match (l.as_i64(), r.as_i64()) {
            (Some(l), Some(r)) => Some(l.cmp(&r)),
            _ => l.as_f64()?.partial_cmp(&r.as_f64()?),
        },
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        (Value::Bool(l), Value::Bool(r)) => Some(l.cmp(r)),
        (Value::Null, _) | (_, Value::Null) => None,
        (l, r) if l == r => Some(Ordering::Equal),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compare_scalars() {
        assert_eq!(compare(&json!(2), &json!(2)), Some(Ordering::Equal));
        assert_eq!(compare(&json!(1), &json!(2.5)), Some(Ordering::Less));
        assert_eq!(compare(&json!("a"), &json!("a")), Some(Ordering::Equal));
        assert_eq!(compare(&json!(true), &json!(1)), None);
        assert_eq!(compare(&json!(null), &json!(null)), None);
    }
}
