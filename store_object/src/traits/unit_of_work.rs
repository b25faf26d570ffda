//! Unit of work
//!
//! A unit of work tracks loaded entities by identity, records changes made through
//! `entity_mut` and `remove`, and persists them atomically on `commit`.

use crate::errors::StoreError;
use crate::id_type::{EntityId, KeyValue};
use crate::metadata::RelationshipEdge;
use crate::query_builder::{QueryBuilder, QueryFilter};
use crate::traits::entity::Entity;
use crate::traits::metadata::GraphMetadataProvider;
use async_trait::async_trait;

#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn metadata(&self) -> &dyn GraphMetadataProvider;

    /// A tracked entity
    fn entity(&self, id: &EntityId) -> Option<&dyn Entity>;

    /// A tracked entity, marking it modified
    fn entity_mut(&mut self, id: &EntityId) -> Option<&mut dyn Entity>;

    /// Whether `id` is tracked and not marked for removal
    fn is_tracked(&self, id: &EntityId) -> bool {
        self.entity(id).is_some()
    }

    /// Targets of a navigation as currently held in memory
    ///
    /// `None` when the navigation has never been loaded for this entity.
    fn loaded_navigation(&self, id: &EntityId, navigation: &str) -> Option<Vec<EntityId>>;

    /// Load one entity by primary key values, in key order
    ///
    /// The type's visibility filter applies unless `bypass_visibility_filter` is set.
    async fn load_by_keys(
        &mut self,
        entity_type: &str,
        keys: &[KeyValue],
        bypass_visibility_filter: bool,
    ) -> Result<Option<EntityId>, StoreError>;

    /// Load every entity of `entity_type` matching the query
    async fn query(
        &mut self,
        entity_type: &str,
        query: &QueryBuilder,
        bypass_visibility_filter: bool,
    ) -> Result<Vec<EntityId>, StoreError>;

    /// Load the entities reached from `id` through `edge`
    ///
    /// Always ignores visibility filters; `filter` is applied to the targets instead.
    async fn load_navigation(
        &mut self,
        id: &EntityId,
        edge: &RelationshipEdge,
        filter: Option<&QueryFilter>,
    ) -> Result<Vec<EntityId>, StoreError>;

    /// Mark a tracked entity for removal
    fn remove(&mut self, id: &EntityId) -> Result<(), StoreError>;

    /// Persist all pending changes, returning the number of rows written
    async fn commit(&mut self) -> Result<usize, StoreError>;

    /// Drop every pending change, restoring modified and removed entities to their
    /// committed state
    async fn discard_changes(&mut self);
}
