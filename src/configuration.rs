//! Soft delete configuration
//!
//! One `SoftDeleteConfiguration` describes how entities implementing a contract are soft
//! deleted: which field holds the soft delete value, how to read and write it, which
//! extra filters (for example a tenant or owner filter) apply to which types, and the
//! words used in user-facing messages.
//!
//! The single soft delete services use a `bool` value, the cascade services a `u8` level.

use crate::errors::SoftDeleteError;
use crate::filter_builder::FilterExpression;
use config::SoftDeleteSettings;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use store_object::{Entity, EntityModel, StoreError, ValidatedFieldName};

/// Parameter name used by filter expressions unless configured otherwise
pub const DEFAULT_PARAMETER: &str = "entity";

/// A value that records soft delete state
pub trait SoftDeleteValue: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// The value of an entity that is not soft deleted
    const ACTIVE: Self;

    fn from_json(value: &Value) -> Option<Self>;

    fn to_json(self) -> Value;
}

impl SoftDeleteValue for bool {
    const ACTIVE: Self = false;

    fn from_json(value: &Value) -> Option<Self> {
        value.as_bool()
    }

    fn to_json(self) -> Value {
        Value::Bool(self)
    }
}

impl SoftDeleteValue for u8 {
    const ACTIVE: Self = 0;

    fn from_json(value: &Value) -> Option<Self> {
        value.as_u64().and_then(|level| u8::try_from(level).ok())
    }

    fn to_json(self) -> Value {
        Value::from(self)
    }
}

pub type ValueGetter<V> = Arc<dyn Fn(&dyn Entity) -> Option<V> + Send + Sync>;
pub type ValueSetter<V> = Arc<dyn Fn(&mut dyn Entity, V) -> Result<(), StoreError> + Send + Sync>;

#[derive(Clone)]
pub struct SoftDeleteConfiguration<V: SoftDeleteValue> {
    contract: String,
    value_field: String,
    parameter: String,
    get_value: ValueGetter<V>,
    set_value: ValueSetter<V>,
    other_filters: Vec<(String, FilterExpression)>,
    not_found_is_not_an_error: bool,
    soft_deleted_text: String,
    reset_soft_delete_text: String,
    read_every_time: bool,
}

impl<V: SoftDeleteValue> fmt::Debug for SoftDeleteConfiguration<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftDeleteConfiguration")
            .field("contract", &self.contract)
            .field("value_field", &self.value_field)
            .field("parameter", &self.parameter)
            .field("other_filters", &self.other_filters)
            .field("not_found_is_not_an_error", &self.not_found_is_not_an_error)
            .field("soft_deleted_text", &self.soft_deleted_text)
            .field("reset_soft_delete_text", &self.reset_soft_delete_text)
            .field("read_every_time", &self.read_every_time)
            .finish()
    }
}

impl<V: SoftDeleteValue> SoftDeleteConfiguration<V> {
    /// Start a configuration for the entities implementing `contract`
    ///
    /// `contract` may also be a concrete entity type name.
    pub fn builder(contract: &str) -> SoftDeleteConfigurationBuilder<V> {
        SoftDeleteConfigurationBuilder::new(contract)
    }

    pub fn contract(&self) -> &str {
        &self.contract
    }

    pub fn value_field(&self) -> &str {
        &self.value_field
    }

    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    pub fn other_filters(&self) -> &[(String, FilterExpression)] {
        &self.other_filters
    }

    pub fn not_found_is_not_an_error(&self) -> bool {
        self.not_found_is_not_an_error
    }

    pub fn soft_deleted_text(&self) -> &str {
        &self.soft_deleted_text
    }

    pub fn reset_soft_delete_text(&self) -> &str {
        &self.reset_soft_delete_text
    }

    pub fn read_every_time(&self) -> bool {
        self.read_every_time
    }

    /// Choose between trusting loaded navigations and reloading them on every step
    pub fn set_read_every_time(&mut self, read_every_time: bool) {
        self.read_every_time = read_every_time;
    }

    /// Whether entities of this model take part in this configuration
    pub fn participates(&self, model: &EntityModel) -> bool {
        model.is_assignable_to(&self.contract)
    }

    pub fn is_participant(&self, entity: &dyn Entity) -> bool {
        entity.is_assignable_to(&self.contract)
    }

    /// Read the soft delete value of a participating entity
    pub fn read_value(&self, entity: &dyn Entity) -> Result<V, SoftDeleteError> {
        (self.get_value)(entity).ok_or_else(|| {
            SoftDeleteError::configuration(format!(
                "{} has no readable soft delete value in {}",
                entity.entity_type(),
                self.value_field
            ))
        })
    }

    pub fn write_value(&self, entity: &mut dyn Entity, value: V) -> Result<(), SoftDeleteError> {
        (self.set_value)(entity, value)?;
        Ok(())
    }
}

pub struct SoftDeleteConfigurationBuilder<V: SoftDeleteValue> {
    contract: String,
    value_field: Option<String>,
    parameter: String,
    get_value: Option<ValueGetter<V>>,
    set_value: Option<ValueSetter<V>>,
    other_filters: Vec<(String, FilterExpression)>,
    settings: SoftDeleteSettings,
}

impl<V: SoftDeleteValue> SoftDeleteConfigurationBuilder<V> {
    fn new(contract: &str) -> Self {
        Self {
            contract: contract.to_string(),
            value_field: None,
            parameter: DEFAULT_PARAMETER.to_string(),
            get_value: None,
            set_value: None,
            other_filters: Vec::new(),
            settings: SoftDeleteSettings::default(),
        }
    }

    /// Field holding the soft delete value; filters are expressed over it
    pub fn value_field(mut self, field: &str) -> Self {
        self.value_field = Some(field.to_string());
        self
    }

    /// Name of the parameter every filter expression is written against
    pub fn parameter(mut self, parameter: &str) -> Self {
        self.parameter = parameter.to_string();
        self
    }

    /// Read the value some other way than through the value field
    pub fn get_value<F>(mut self, getter: F) -> Self
    where
        F: Fn(&dyn Entity) -> Option<V> + Send + Sync + 'static,
    {
        self.get_value = Some(Arc::new(getter));
        self
    }

    /// Write the value some other way than through the value field
    pub fn set_value<F>(mut self, setter: F) -> Self
    where
        F: Fn(&mut dyn Entity, V) -> Result<(), StoreError> + Send + Sync + 'static,
    {
        self.set_value = Some(Arc::new(setter));
        self
    }

    /// Add a filter for every type assignable to `type_key`, applied in registration order
    pub fn other_filter(mut self, type_key: &str, filter: FilterExpression) -> Self {
        self.other_filters.push((type_key.to_string(), filter));
        self
    }

    pub fn settings(mut self, settings: &SoftDeleteSettings) -> Self {
        self.settings = settings.clone();
        self
    }

    pub fn not_found_is_not_an_error(mut self, value: bool) -> Self {
        self.settings.not_found_is_not_an_error = value;
        self
    }

    pub fn soft_deleted_text(mut self, text: &str) -> Self {
        self.settings.soft_deleted_text = text.to_string();
        self
    }

    pub fn reset_soft_delete_text(mut self, text: &str) -> Self {
        self.settings.reset_soft_delete_text = text.to_string();
        self
    }

    pub fn read_every_time(mut self, value: bool) -> Self {
        self.settings.read_every_time = value;
        self
    }

    pub fn build(self) -> Result<SoftDeleteConfiguration<V>, SoftDeleteError> {
        if self.contract.trim().is_empty() {
            return Err(SoftDeleteError::configuration("The contract name cannot be empty"));
        }
        let value_field = self.value_field.ok_or_else(|| {
            SoftDeleteError::configuration(format!(
                "You must set the value field for the {} soft delete configuration",
                self.contract
            ))
        })?;
        ValidatedFieldName::new(&value_field)
            .map_err(|e| SoftDeleteError::configuration(e.to_string()))?;
        ValidatedFieldName::new(&self.parameter)
            .map_err(|e| SoftDeleteError::configuration(format!("parameter: {}", e)))?;
        if self.get_value.is_some() != self.set_value.is_some() {
            return Err(SoftDeleteError::configuration(
                "A custom value getter and setter must be provided together",
            ));
        }
        self.settings.validate()?;

        for (type_key, filter) in &self.other_filters {
            if filter.parameter() != self.parameter {
                return Err(SoftDeleteError::ParameterMismatch {
                    type_key: type_key.clone(),
                    expected: self.parameter.clone(),
                    found: filter.parameter().to_string(),
                });
            }
        }

        let get_value = match self.get_value {
            Some(getter) => getter,
            None => field_getter(value_field.clone()),
        };
        let set_value = match self.set_value {
            Some(setter) => setter,
            None => field_setter(value_field.clone()),
        };

        Ok(SoftDeleteConfiguration {
            contract: self.contract,
            value_field,
            parameter: self.parameter,
            get_value,
            set_value,
            other_filters: self.other_filters,
            not_found_is_not_an_error: self.settings.not_found_is_not_an_error,
            soft_deleted_text: self.settings.soft_deleted_text,
            reset_soft_delete_text: self.settings.reset_soft_delete_text,
            read_every_time: self.settings.read_every_time,
        })
    }
}

fn field_getter<V: SoftDeleteValue>(field: String) -> ValueGetter<V> {
    Arc::new(move |entity: &dyn Entity| entity.field(&field).as_ref().and_then(V::from_json))
}

fn field_setter<V: SoftDeleteValue>(field: String) -> ValueSetter<V> {
    Arc::new(move |entity: &mut dyn Entity, value: V| entity.set_field(&field, value.to_json()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use store_object::QueryFilter;

    #[test]
    fn test_defaults() {
        let config = SoftDeleteConfiguration::<bool>::builder("SingleSoftDelete")
            .value_field("soft_deleted")
            .build()
            .unwrap();

        assert_eq!(config.parameter(), DEFAULT_PARAMETER);
        assert_eq!(config.soft_deleted_text(), "soft deleted");
        assert_eq!(config.reset_soft_delete_text(), "recovered");
        assert!(!config.not_found_is_not_an_error());
        assert!(config.read_every_time());
    }

    #[test]
    fn test_missing_value_field_is_rejected() {
        let result = SoftDeleteConfiguration::<u8>::builder("CascadeSoftDelete").build();
        assert!(matches!(result, Err(SoftDeleteError::Configuration(_))));
    }

    #[test]
    fn test_getter_without_setter_is_rejected() {
        let result = SoftDeleteConfiguration::<bool>::builder("SingleSoftDelete")
            .value_field("soft_deleted")
            .get_value(|entity| entity.field("soft_deleted").and_then(|v| v.as_bool()))
            .build();
        assert!(matches!(result, Err(SoftDeleteError::Configuration(_))));
    }

    #[test]
    fn test_empty_text_is_rejected() {
        let result = SoftDeleteConfiguration::<bool>::builder("SingleSoftDelete")
            .value_field("soft_deleted")
            .soft_deleted_text("  ")
            .build();
        assert!(matches!(result, Err(SoftDeleteError::Config(_))));
    }

    #[test]
    fn test_other_filter_parameter_mismatch_fails_at_build() {
        let user = serde_json::json!("5c7a0c4e-0000-0000-0000-000000000001");
        let result = SoftDeleteConfiguration::<bool>::builder("SingleSoftDelete")
            .value_field("soft_deleted")
            .other_filter("UserOwned", FilterExpression::new("entity", QueryFilter::eq("user_id", user)))
            .other_filter("TenantOwned", FilterExpression::new("row", QueryFilter::eq("tenant_id", serde_json::json!(1))))
            .build();

        match result {
            Err(SoftDeleteError::ParameterMismatch { type_key, expected, found }) => {
                assert_eq!(type_key, "TenantOwned");
                assert_eq!(expected, "entity");
                assert_eq!(found, "row");
            }
            other => panic!("expected a parameter mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_settings_are_applied() {
        let settings = SoftDeleteSettings::new(true, "archived".to_string(), "restored".to_string(), false);
        let config = SoftDeleteConfiguration::<u8>::builder("CascadeSoftDelete")
            .value_field("soft_delete_level")
            .settings(&settings)
            .build()
            .unwrap();

        assert!(config.not_found_is_not_an_error());
        assert_eq!(config.soft_deleted_text(), "archived");
        assert_eq!(config.reset_soft_delete_text(), "restored");
        assert!(!config.read_every_time());
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(u8::from_json(&serde_json::json!(3)), Some(3));
        assert_eq!(u8::from_json(&serde_json::json!(300)), None);
        assert_eq!(bool::from_json(&serde_json::json!(true)), Some(true));
        assert_eq!(5u8.to_json(), serde_json::json!(5));
    }
}
