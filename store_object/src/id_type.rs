//! Id Type module
//!
//! Primary key values and the surrogate identity used to track entities.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Display};
use uuid::Uuid;

/// A single primary key component
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyValue {
    /// Numeric key (i32, i64, etc.)
    Numeric(i64),
    /// UUID key
    Uuid(Uuid),
    /// String-based key
    String(String),
}

/// The type of a primary key component, used to validate lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyKind {
    Numeric,
    Uuid,
    String,
}

impl Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyKind::Numeric => write!(f, "numeric"),
            KeyKind::Uuid => write!(f, "uuid"),
            KeyKind::String => write!(f, "string"),
        }
    }
}

impl KeyKind {
    /// Read a field value as a key of this kind
    ///
    /// Returns `None` for nulls and for values of another shape.
    pub fn parse(&self, value: &Value) -> Option<KeyValue> {
        match (self, value) {
            (KeyKind::Numeric, Value::Number(n)) => n.as_i64().map(KeyValue::Numeric),
            (KeyKind::Uuid, Value::String(s)) => Uuid::parse_str(s).ok().map(KeyValue::Uuid),
            (KeyKind::String, Value::String(s)) => Some(KeyValue::String(s.clone())),
            _ => None,
        }
    }
}

impl KeyValue {
    pub fn kind(&self) -> KeyKind {
        match self {
            KeyValue::Numeric(_) => KeyKind::Numeric,
            KeyValue::Uuid(_) => KeyKind::Uuid,
            KeyValue::String(_) => KeyKind::String,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            KeyValue::Numeric(n) => Value::from(*n),
            KeyValue::Uuid(uuid) => Value::String(uuid.to_string()),
            KeyValue::String(s) => Value::String(s.clone()),
        }
    }
}

impl Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Numeric(n) => write!(f, "{}", n),
            KeyValue::Uuid(uuid) => write!(f, "{}", uuid),
            KeyValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i32> for KeyValue {
    fn from(id: i32) -> Self {
        KeyValue::Numeric(id as i64)
    }
}

impl From<i64> for KeyValue {
    fn from(id: i64) -> Self {
        KeyValue::Numeric(id)
    }
}

impl From<u32> for KeyValue {
    fn from(id: u32) -> Self {
        KeyValue::Numeric(id as i64)
    }
}

impl From<Uuid> for KeyValue {
    fn from(id: Uuid) -> Self {
        KeyValue::Uuid(id)
    }
}

impl From<String> for KeyValue {
    fn from(id: String) -> Self {
        KeyValue::String(id)
    }
}

impl From<&str> for KeyValue {
    fn from(id: &str) -> Self {
        KeyValue::String(id.to_string())
    }
}

/// Types usable as primary key fields
pub trait IntoKeyValue {
    const KIND: KeyKind;

    fn key_value(&self) -> KeyValue;
}

impl IntoKeyValue for i32 {
    const KIND: KeyKind = KeyKind::Numeric;

    fn key_value(&self) -> KeyValue {
        KeyValue::Numeric(*self as i64)
    }
}

impl IntoKeyValue for i64 {
    const KIND: KeyKind = KeyKind::Numeric;

    fn key_value(&self) -> KeyValue {
        KeyValue::Numeric(*self)
    }
}

impl IntoKeyValue for u32 {
    const KIND: KeyKind = KeyKind::Numeric;

    fn key_value(&self) -> KeyValue {
        KeyValue::Numeric(*self as i64)
    }
}

impl IntoKeyValue for Uuid {
    const KIND: KeyKind = KeyKind::Uuid;

    fn key_value(&self) -> KeyValue {
        KeyValue::Uuid(*self)
    }
}

impl IntoKeyValue for String {
    const KIND: KeyKind = KeyKind::String;

    fn key_value(&self) -> KeyValue {
        KeyValue::String(self.clone())
    }
}

/// Ordered primary key values of one entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityKey(Vec<KeyValue>);

impl EntityKey {
    pub fn new(values: Vec<KeyValue>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[KeyValue] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<KeyValue> for EntityKey {
    fn from(value: KeyValue) -> Self {
        Self(vec![value])
    }
}

impl Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.len() == 1 {
            return write!(f, "{}", self.0[0]);
        }
        let parts: Vec<String> = self.0.iter().map(|v| v.to_string()).collect();
        write!(f, "({})", parts.join(", "))
    }
}

/// Stable identity of a persisted entity: its type name plus primary key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId {
    entity_type: String,
    key: EntityKey,
}

impl EntityId {
    pub fn new(entity_type: impl Into<String>, key: impl Into<EntityKey>) -> Self {
        Self {
            entity_type: entity_type.into(),
            key: key.into(),
        }
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn key(&self) -> &EntityKey {
        &self.key
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.entity_type, self.key)
    }
}
