//! Filter expressions for soft deleted and visible entities
//!
//! A `FilterExpression` is a `QueryFilter` written against a named parameter, so it stays
//! something a store can translate instead of a closure run after loading. The builder
//! composes the soft delete clause of a configuration with every supplementary filter
//! registered for a type the entity is assignable to.

use crate::configuration::{SoftDeleteConfiguration, SoftDeleteValue};
use crate::errors::SoftDeleteError;
use serde_json::Value;
use store_object::query_builder::SqlGenerator;
use store_object::{EntityModel, EntityType, QueryBuilder, QueryFilter};

#[derive(Debug, Clone, PartialEq)]
pub struct FilterExpression {
    parameter: String,
    body: QueryFilter,
}

impl FilterExpression {
    pub fn new(parameter: &str, body: QueryFilter) -> Self {
        Self {
            parameter: parameter.to_string(),
            body,
        }
    }

    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    pub fn body(&self) -> &QueryFilter {
        &self.body
    }

    pub fn into_body(self) -> QueryFilter {
        self.body
    }

    /// AND another expression onto this one; both must use the same parameter
    pub fn and(self, type_key: &str, other: &FilterExpression) -> Result<Self, SoftDeleteError> {
        if other.parameter != self.parameter {
            return Err(SoftDeleteError::ParameterMismatch {
                type_key: type_key.to_string(),
                expected: self.parameter,
                found: other.parameter.clone(),
            });
        }
        Ok(Self {
            body: self.body.and_also(other.body.clone()),
            parameter: self.parameter,
        })
    }

    /// Render as an SQL predicate with fields qualified by the parameter name
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        SqlGenerator::build_predicate(std::slice::from_ref(&self.body), Some(&self.parameter))
    }

    pub fn to_query(&self) -> QueryBuilder {
        QueryBuilder::new().filter(self.body.clone())
    }
}

/// AND every supplementary filter that applies to `model` onto `base`, in registration order
///
/// Without a base the first applicable filter starts the expression. Returns `None` when
/// there is neither a base nor an applicable filter.
pub fn compose(
    base: Option<FilterExpression>,
    other_filters: &[(String, FilterExpression)],
    model: &EntityModel,
) -> Result<Option<FilterExpression>, SoftDeleteError> {
    let mut composed = base;
    for (type_key, filter) in other_filters {
        if !model.is_assignable_to(type_key) {
            continue;
        }
        composed = Some(match composed {
            None => filter.clone(),
            Some(current) => current.and(type_key, filter)?,
        });
    }
    Ok(composed)
}

pub struct FilterExpressionBuilder<'c, V: SoftDeleteValue> {
    config: &'c SoftDeleteConfiguration<V>,
}

impl<'c, V: SoftDeleteValue> FilterExpressionBuilder<'c, V> {
    pub fn new(config: &'c SoftDeleteConfiguration<V>) -> Self {
        Self { config }
    }

    /// Entities of `T` whose soft delete value equals `value`, plus the filters for `T`
    pub fn soft_deleted_filter<T: EntityType>(&self, value: V) -> Result<FilterExpression, SoftDeleteError> {
        self.soft_deleted_filter_for(&EntityModel::of::<T>(), value)
    }

    pub fn soft_deleted_filter_for(&self, model: &EntityModel, value: V) -> Result<FilterExpression, SoftDeleteError> {
        self.require_participant(model)?;
        let base = FilterExpression::new(
            self.config.parameter(),
            QueryFilter::eq(self.config.value_field(), value.to_json()),
        );
        compose(Some(base), self.config.other_filters(), model)?
            .ok_or_else(|| SoftDeleteError::configuration(format!("No filter composed for {}", model.name)))
    }

    /// Entities of `T` that are not soft deleted
    pub fn visible_filter<T: EntityType>(&self) -> Result<FilterExpression, SoftDeleteError> {
        self.soft_deleted_filter::<T>(V::ACTIVE)
    }

    pub fn visible_filter_for(&self, model: &EntityModel) -> Result<FilterExpression, SoftDeleteError> {
        self.soft_deleted_filter_for(model, V::ACTIVE)
    }

    /// Only the supplementary filters that apply to `T`
    pub fn other_filters_only<T: EntityType>(&self) -> Result<Option<FilterExpression>, SoftDeleteError> {
        self.other_filters_only_for(&EntityModel::of::<T>())
    }

    pub fn other_filters_only_for(&self, model: &EntityModel) -> Result<Option<FilterExpression>, SoftDeleteError> {
        compose(None, self.config.other_filters(), model)
    }

    fn require_participant(&self, model: &EntityModel) -> Result<(), SoftDeleteError> {
        if self.config.participates(model) {
            Ok(())
        } else {
            Err(SoftDeleteError::NotSoftDeletable(model.name.clone()))
        }
    }
}
