use crate::id_type::{EntityId, KeyKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("The entity type {0} is not registered in the model")]
    UnknownEntityType(String),

    #[error("The entity type {0} has no primary key")]
    NoPrimaryKey(String),

    #[error("Mismatch in keys: your provided {provided} key(s) and the entity has {expected} key(s)")]
    KeyCountMismatch { provided: usize, expected: usize },

    #[error("Mismatch in keys: your provided key {position} (of {count}) is of type {provided} but entity key's type is {expected}")]
    KeyTypeMismatch {
        position: usize,
        count: usize,
        provided: KeyKind,
        expected: KeyKind,
    },

    #[error("Field {field} does not exist on {entity_type}")]
    UnknownField { entity_type: String, field: String },

    #[error("Field {field} on {entity_type} is part of the primary key and cannot be changed")]
    ReadOnlyField { entity_type: String, field: String },

    #[error("Serialization error on {entity_type}.{field}: {message}")]
    Serialization {
        entity_type: String,
        field: String,
        message: String,
    },

    #[error("Entity {0} is not tracked by this unit of work")]
    NotTracked(EntityId),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn unknown_field(entity_type: &str, field: &str) -> Self {
        Self::UnknownField {
            entity_type: entity_type.to_string(),
            field: field.to_string(),
        }
    }

    pub fn read_only_field(entity_type: &str, field: &str) -> Self {
        Self::ReadOnlyField {
            entity_type: entity_type.to_string(),
            field: field.to_string(),
        }
    }

    pub fn serialization(entity_type: &str, field: &str, error: impl std::fmt::Display) -> Self {
        Self::Serialization {
            entity_type: entity_type.to_string(),
            field: field.to_string(),
            message: error.to_string(),
        }
    }
}
