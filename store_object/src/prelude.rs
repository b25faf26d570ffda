//! Convenience re-exports for common store-object usage

pub use crate::traits::{Entity, EntityType, GraphMetadataProvider, KeyField, UnitOfWork};

pub use crate::errors::StoreError;

pub use crate::id_type::{EntityId, EntityKey, KeyKind, KeyValue};

pub use crate::metadata::{DeleteBehavior, EntityModel, ModelMetadata, NavigationShape, Relationship};

pub use crate::memory_store::{MemoryDatabase, MemorySession};

pub use crate::query_builder::{QueryBuilder, QueryFilter};

pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
pub use uuid::Uuid;
