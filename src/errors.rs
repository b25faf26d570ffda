//! Error types for the soft delete services
//!
//! Business outcomes such as "already soft deleted" are reported through
//! [`SoftDeleteStatus`](crate::SoftDeleteStatus); the errors here abort the operation.

use config::ConfigError;
use store_object::{EntityId, StoreError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SoftDeleteError {
    #[error("Invalid soft delete configuration: {0}")]
    Configuration(String),

    #[error("The filter parameter for {type_key} must be the same in all usages, i.e. {expected}.")]
    ParameterMismatch {
        type_key: String,
        expected: String,
        found: String,
    },

    #[error("You cannot soft delete a one-to-one relationship. It causes problems if you try to create a new version.")]
    OneToOneRelationship { entity_type: String },

    #[error("Currently only works with navigation links that are properties: {entity_type}.{navigation} is not")]
    UnsupportedNavigation {
        entity_type: String,
        navigation: String,
    },

    #[error("The entity {0} is not tracked by the unit of work")]
    EntityNotTracked(EntityId),

    #[error("The entity type {0} does not take part in this soft delete configuration")]
    NotSoftDeletable(String),

    #[error("The cascade below {0} is deeper than a soft delete level can record")]
    CascadeTooDeep(EntityId),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SoftDeleteError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}
