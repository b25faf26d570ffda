//! Entity traits
//!
//! `EntityType` describes a persisted type statically, `Entity` is the object-safe view of
//! one tracked instance that the unit of work and the soft delete services work through.

use crate::errors::StoreError;
use crate::id_type::{EntityId, EntityKey, KeyKind};
use serde_json::Value;
use std::any::Any;
use std::fmt::Debug;

/// A primary key field and the kind of value it holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyField {
    pub name: String,
    pub kind: KeyKind,
}

impl KeyField {
    pub fn new(name: &str, kind: KeyKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
        }
    }
}

/// Static description of a persisted entity type
///
/// This trait should be derived with `#[derive(Entity)]`, which implements it together
/// with [`Entity`]:
///
/// ```ignore
/// #[derive(Debug, Clone, Entity)]
/// #[entity(name = "books", contracts("SingleSoftDelete", "UserOwned"))]
/// pub struct Book {
///     #[key]
///     pub id: i64,
///     pub title: String,
///     pub user_id: Uuid,
///     pub soft_deleted: bool,
/// }
/// ```
pub trait EntityType {
    /// The type name, used as the table name by stores
    fn type_name() -> &'static str;

    /// Primary key fields in key order
    fn key_fields() -> Vec<KeyField>;

    /// Names of the contracts (interfaces) this type takes part in
    fn type_contracts() -> &'static [&'static str] {
        &[]
    }
}

/// Object-safe view of one entity instance
pub trait Entity: Any + Send + Sync + Debug {
    fn entity_type(&self) -> &'static str;

    fn key(&self) -> EntityKey;

    fn contracts(&self) -> &'static [&'static str];

    /// Read a field as JSON, `None` if the field does not exist
    fn field(&self, name: &str) -> Option<Value>;

    /// Write a field from JSON
    fn set_field(&mut self, name: &str, value: Value) -> Result<(), StoreError>;

    fn clone_entity(&self) -> Box<dyn Entity>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<'a> dyn Entity + 'a {
    pub fn id(&self) -> EntityId {
        EntityId::new(self.entity_type(), self.key())
    }

    /// Whether this entity is of the named type or implements the named contract
    pub fn is_assignable_to(&self, type_key: &str) -> bool {
        self.entity_type() == type_key || self.contracts().contains(&type_key)
    }

    pub fn downcast_ref<T: Entity>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Entity>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}
