//! SQL rendering for query filters
//!
//! Values are never inlined: every literal becomes a `$n` placeholder and is returned
//! alongside the clause in placeholder order.

use crate::query_builder::filter::{QueryCondition, QueryFilter, QueryOperator};
use serde_json::Value;

pub struct SqlGenerator;

struct Placeholders {
    values: Vec<Value>,
    next: usize,
}

impl Placeholders {
    fn push(&mut self, value: &Value) -> String {
        self.values.push(value.clone());
        let param = format!("${}", self.next);
        self.next += 1;
        param
    }
}

impl SqlGenerator {
    /// Build WHERE clause from conditions
    pub fn build_where_clause(conditions: &[QueryFilter]) -> (String, Vec<Value>) {
        let (predicate, values) = Self::build_predicate(conditions, None);
        if predicate.is_empty() {
            (String::new(), values)
        } else {
            (format!("WHERE {}", predicate), values)
        }
    }

    /// Render conditions joined with AND, without the WHERE keyword
    ///
    /// When `qualifier` is given every field is written as `qualifier.field`.
    pub fn build_predicate(conditions: &[QueryFilter], qualifier: Option<&str>) -> (String, Vec<Value>) {
        let mut placeholders = Placeholders {
            values: Vec::new(),
            next: 1,
        };

        let predicate = conditions
            .iter()
            .map(|condition| Self::build_filter_sql(condition, qualifier, &mut placeholders))
            .collect::<Vec<_>>()
            .join(" AND ");

        (predicate, placeholders.values)
    }

    fn build_filter_sql(filter: &QueryFilter, qualifier: Option<&str>, placeholders: &mut Placeholders) -> String {
        match filter {
            QueryFilter::Condition(condition) => Self::build_condition_sql(condition, qualifier, placeholders),
            QueryFilter::All(filters) if filters.is_empty() => "1=1".to_string(),
            QueryFilter::All(filters) => {
                let group = filters
                    .iter()
                    .map(|f| Self::build_filter_sql(f, qualifier, placeholders))
                    .collect::<Vec<_>>()
                    .join(" AND ");
                format!("({})", group)
            }
        }
    }

    fn build_condition_sql(
        condition: &QueryCondition,
        qualifier: Option<&str>,
        placeholders: &mut Placeholders,
    ) -> String {
        let field = match qualifier {
            Some(qualifier) => format!("{}.{}", qualifier, condition.field),
            None => condition.field.clone(),
        };

        match (condition.operator, &condition.value) {
            (QueryOperator::Eq, Some(Value::Null) | None) | (QueryOperator::IsNull, _) => {
                format!("{} IS NULL", field)
            }
            (QueryOperator::Eq, Some(value)) => format!("{} = {}", field, placeholders.push(value)),
            (QueryOperator::IsNotNull, _) => format!("{} IS NOT NULL", field),
        }
    }
}
