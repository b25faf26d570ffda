//! Store Object - entity persistence layer for Softhaus
//!
//! This crate provides the entity traits, model metadata, query filters and the unit of
//! work abstraction the soft delete services operate on, plus an in-memory store that
//! implements it.

pub mod errors;
pub mod id_type;
pub mod memory_store;
pub mod metadata;
pub mod prelude;
pub mod query_builder;
pub mod traits;
pub mod validation;

pub use errors::StoreError;
pub use id_type::{EntityId, EntityKey, IntoKeyValue, KeyKind, KeyValue};
pub use memory_store::{MemoryDatabase, MemorySession};
pub use metadata::{
    Cardinality, DeleteBehavior, EdgeDirection, EntityModel, ModelMetadata, Navigation,
    NavigationShape, Relationship, RelationshipEdge,
};
pub use query_builder::{QueryBuilder, QueryFilter, QueryOperator};
pub use traits::*;
pub use validation::{ValidatedEntityName, ValidatedFieldName, ValidationError};

// Used by code generated with `#[derive(Entity)]`
pub use serde_json;
