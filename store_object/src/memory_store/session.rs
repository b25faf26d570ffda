//! Unit of work over a `MemoryDatabase`
//!
//! Loaded entities are tracked by identity: loading a row that is already tracked returns
//! the tracked instance, including any uncommitted changes. Filters are evaluated against
//! committed rows.

use crate::errors::StoreError;
use crate::id_type::{EntityId, EntityKey, KeyValue};
use crate::memory_store::database::{MemoryDatabase, Rows};
use crate::memory_store::evaluate;
use crate::metadata::{DeleteBehavior, RelationshipEdge};
use crate::query_builder::{QueryBuilder, QueryFilter};
use crate::traits::{Entity, EntityType, GraphMetadataProvider, KeyField, UnitOfWork};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

pub struct MemorySession {
    database: Arc<MemoryDatabase>,
    tracked: BTreeMap<EntityId, Box<dyn Entity>>,
    loaded: HashSet<(EntityId, String)>,
    removed: BTreeSet<EntityId>,
    dirty: BTreeSet<EntityId>,
    reads: usize,
}

impl std::fmt::Debug for MemorySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySession")
            .field("tracked", &self.tracked.len())
            .field("removed", &self.removed)
            .field("dirty", &self.dirty)
            .field("reads", &self.reads)
            .finish()
    }
}

/// Read the foreign key of `entity` as a principal key
fn foreign_key_of(entity: &dyn Entity, foreign_key: &[String], principal_key: &[KeyField]) -> Option<EntityKey> {
    let values = foreign_key
        .iter()
        .zip(principal_key)
        .map(|(field, key)| key.kind.parse(&entity.field(field)?))
        .collect::<Option<Vec<KeyValue>>>()?;
    Some(EntityKey::new(values))
}

impl MemorySession {
    pub(crate) fn new(database: Arc<MemoryDatabase>) -> Self {
        Self {
            database,
            tracked: BTreeMap::new(),
            loaded: HashSet::new(),
            removed: BTreeSet::new(),
            dirty: BTreeSet::new(),
            reads: 0,
        }
    }

    pub fn database(&self) -> &Arc<MemoryDatabase> {
        &self.database
    }

    /// Number of reads that went to the database
    pub fn query_count(&self) -> usize {
        self.reads
    }

    /// Whether there are changes waiting for `commit`
    pub fn has_changes(&self) -> bool {
        !self.dirty.is_empty() || !self.removed.is_empty()
    }

    /// Load an entity of type `T` by its key values
    pub async fn find<T: EntityType>(&mut self, keys: &[KeyValue]) -> Result<Option<EntityId>, StoreError> {
        self.load_by_keys(T::type_name(), keys, false).await
    }

    /// Borrow a tracked entity as its concrete type
    pub fn get<T: Entity>(&self, id: &EntityId) -> Option<&T> {
        self.entity(id)?.downcast_ref::<T>()
    }

    /// Borrow a tracked entity as its concrete type, marking it modified
    pub fn get_mut<T: Entity>(&mut self, id: &EntityId) -> Option<&mut T> {
        self.entity_mut(id)?.downcast_mut::<T>()
    }

    /// Load a navigation by name, respecting the target's visibility filter
    pub async fn include(&mut self, id: &EntityId, navigation: &str) -> Result<Vec<EntityId>, StoreError> {
        let edge = self.edge_by_navigation(id.entity_type(), navigation)?;
        let visibility = self.database.visibility_filter(&edge.target_type).cloned();
        self.load_navigation(id, &edge, visibility.as_ref()).await
    }

    fn edge_by_navigation(&self, entity_type: &str, navigation: &str) -> Result<RelationshipEdge, StoreError> {
        self.database
            .metadata
            .relationships(entity_type)
            .iter()
            .find(|edge| edge.navigation_name() == Some(navigation))
            .cloned()
            .ok_or_else(|| StoreError::unknown_field(entity_type, navigation))
    }

    fn principal_key(&self, edge: &RelationshipEdge) -> Result<Vec<KeyField>, StoreError> {
        let principal = edge.principal_type();
        self.database
            .metadata
            .entity_model(principal)
            .map(|model| model.key.clone())
            .ok_or_else(|| StoreError::UnknownEntityType(principal.to_string()))
    }

    fn track(&mut self, row: &dyn Entity) -> EntityId {
        let id = row.id();
        if !self.tracked.contains_key(&id) {
            self.tracked.insert(id.clone(), row.clone_entity());
        }
        id
    }

    fn visible(&self, entity_type: &str, bypass_visibility_filter: bool) -> Option<QueryFilter> {
        if bypass_visibility_filter {
            None
        } else {
            self.database.visibility_filter(entity_type).cloned()
        }
    }

    /// Dependents of `key` reached through `edge` among `rows`
    fn dependents_in<'r>(
        rows: impl Iterator<Item = &'r Box<dyn Entity>>,
        edge: &RelationshipEdge,
        key: &EntityKey,
        principal_key: &[KeyField],
    ) -> Vec<&'r dyn Entity> {
        rows.map(|row| &**row)
            .filter(|row| row.entity_type() == edge.dependent_type())
            .filter(|row| foreign_key_of(*row, &edge.foreign_key, principal_key).as_ref() == Some(key))
            .collect()
    }

    /// Entities removed when `roots` are deleted, following cascading foreign keys
    fn cascade_closure(&self, rows: &Rows, roots: &BTreeSet<EntityId>) -> Result<BTreeSet<EntityId>, StoreError> {
        let mut doomed = BTreeSet::new();
        let mut pending: Vec<EntityId> = roots.iter().cloned().collect();

        while let Some(id) = pending.pop() {
            if !rows.contains_key(&id) || !doomed.insert(id.clone()) {
                continue;
            }
            for edge in self.database.metadata.dependent_edges(id.entity_type()) {
                if !edge.delete_behavior.is_cascade() {
                    continue;
                }
                let principal_key = self.principal_key(&edge)?;
                for dependent in Self::dependents_in(rows.values(), &edge, id.key(), &principal_key) {
                    pending.push(dependent.id());
                }
            }
        }

        Ok(doomed)
    }
}

#[async_trait]
impl UnitOfWork for MemorySession {
    fn metadata(&self) -> &dyn GraphMetadataProvider {
        &self.database.metadata
    }

    fn entity(&self, id: &EntityId) -> Option<&dyn Entity> {
        if self.removed.contains(id) {
            return None;
        }
        self.tracked.get(id).map(|entity| &**entity)
    }

    fn entity_mut(&mut self, id: &EntityId) -> Option<&mut dyn Entity> {
        if self.removed.contains(id) {
            return None;
        }
        let entity = self.tracked.get_mut(id)?;
        self.dirty.insert(id.clone());
        Some(&mut **entity)
    }

    fn loaded_navigation(&self, id: &EntityId, navigation: &str) -> Option<Vec<EntityId>> {
        let edge = self.edge_by_navigation(id.entity_type(), navigation).ok()?;
        let principal_key = self.principal_key(&edge).ok()?;
        let live = self
            .tracked
            .iter()
            .filter(|(tracked_id, _)| !self.removed.contains(*tracked_id))
            .map(|(_, entity)| entity);

        let targets: Vec<EntityId> = if edge.leads_to_dependent() {
            Self::dependents_in(live, &edge, id.key(), &principal_key)
                .into_iter()
                .map(|dependent| dependent.id())
                .collect()
        } else {
            let entity = self.entity(id)?;
            foreign_key_of(entity, &edge.foreign_key, &principal_key)
                .map(|key| EntityId::new(edge.target_type.clone(), key))
                .filter(|principal| self.entity(principal).is_some())
                .into_iter()
                .collect()
        };

        if targets.is_empty() && !self.loaded.contains(&(id.clone(), navigation.to_string())) {
            return None;
        }
        Some(targets)
    }

    async fn load_by_keys(
        &mut self,
        entity_type: &str,
        keys: &[KeyValue],
        bypass_visibility_filter: bool,
    ) -> Result<Option<EntityId>, StoreError> {
        let model = self
            .database
            .metadata
            .entity_model(entity_type)
            .ok_or_else(|| StoreError::UnknownEntityType(entity_type.to_string()))?;
        if model.key.is_empty() {
            return Err(StoreError::NoPrimaryKey(entity_type.to_string()));
        }
        if keys.len() != model.key.len() {
            return Err(StoreError::KeyCountMismatch {
                provided: keys.len(),
                expected: model.key.len(),
            });
        }
        for (index, (provided, expected)) in keys.iter().zip(&model.key).enumerate() {
            if provided.kind() != expected.kind {
                return Err(StoreError::KeyTypeMismatch {
                    position: index + 1,
                    count: keys.len(),
                    provided: provided.kind(),
                    expected: expected.kind,
                });
            }
        }

        let id = EntityId::new(entity_type, EntityKey::new(keys.to_vec()));
        let filter = self.visible(entity_type, bypass_visibility_filter);
        let database = Arc::clone(&self.database);
        let rows = database.rows.read().await;
        self.reads += 1;

        let found = rows
            .get(&id)
            .map(|row| &**row)
            .filter(|row| filter.as_ref().map_or(true, |f| evaluate::matches(f, *row)));
        Ok(found.map(|row| self.track(row)))
    }

    async fn query(
        &mut self,
        entity_type: &str,
        query: &QueryBuilder,
        bypass_visibility_filter: bool,
    ) -> Result<Vec<EntityId>, StoreError> {
        if self.database.metadata.entity_model(entity_type).is_none() {
            return Err(StoreError::UnknownEntityType(entity_type.to_string()));
        }

        let filter = self.visible(entity_type, bypass_visibility_filter);
        let database = Arc::clone(&self.database);
        let rows = database.rows.read().await;
        self.reads += 1;

        let matching: Vec<&dyn Entity> = rows
            .iter()
            .filter(|(id, _)| id.entity_type() == entity_type)
            .map(|(_, row)| &**row)
            .filter(|row| filter.as_ref().map_or(true, |f| evaluate::matches(f, *row)))
            .filter(|row| evaluate::matches_all(query.conditions(), *row))
            .collect();

        tracing::debug!("[MEMORY_SESSION] query {} matched {}", entity_type, matching.len());
        Ok(matching.into_iter().map(|row| self.track(row)).collect())
    }

    async fn load_navigation(
        &mut self,
        id: &EntityId,
        edge: &RelationshipEdge,
        filter: Option<&QueryFilter>,
    ) -> Result<Vec<EntityId>, StoreError> {
        if edge.from_type != id.entity_type() {
            return Err(StoreError::Internal(format!(
                "Relationship edge starts at {} but the entity is {}",
                edge.from_type, id
            )));
        }
        let principal_key = self.principal_key(edge)?;
        let database = Arc::clone(&self.database);
        let rows = database.rows.read().await;
        self.reads += 1;

        let candidates: Vec<&dyn Entity> = if edge.leads_to_dependent() {
            Self::dependents_in(rows.values(), edge, id.key(), &principal_key)
        } else {
            let entity = self
                .entity(id)
                .ok_or_else(|| StoreError::NotTracked(id.clone()))?;
            foreign_key_of(entity, &edge.foreign_key, &principal_key)
                .and_then(|key| rows.get(&EntityId::new(edge.target_type.clone(), key)))
                .map(|row| &**row)
                .into_iter()
                .collect()
        };

        let targets: Vec<EntityId> = candidates
            .into_iter()
            .filter(|row| filter.map_or(true, |f| evaluate::matches(f, *row)))
            .map(|row| self.track(row))
            .collect();

        if let Some(navigation) = edge.navigation_name() {
            self.loaded.insert((id.clone(), navigation.to_string()));
        }
        Ok(targets)
    }

    fn remove(&mut self, id: &EntityId) -> Result<(), StoreError> {
        if !self.tracked.contains_key(id) {
            return Err(StoreError::NotTracked(id.clone()));
        }
        self.removed.insert(id.clone());
        Ok(())
    }

    async fn commit(&mut self) -> Result<usize, StoreError> {
        let database = Arc::clone(&self.database);
        let mut rows = database.rows.write().await;

        let doomed = self.cascade_closure(&rows, &self.removed)?;
        let mut staged: Rows = rows
            .iter()
            .map(|(id, row)| (id.clone(), row.clone_entity()))
            .collect();
        let mut written = 0;

        for id in &self.dirty {
            if doomed.contains(id) {
                continue;
            }
            if let Some(entity) = self.tracked.get(id) {
                staged.insert(id.clone(), entity.clone_entity());
                written += 1;
            }
        }

        for id in &doomed {
            for edge in self.database.metadata.dependent_edges(id.entity_type()) {
                if edge.delete_behavior.is_cascade() {
                    continue;
                }
                let principal_key = self.principal_key(&edge)?;
                let orphans: Vec<EntityId> = Self::dependents_in(staged.values(), &edge, id.key(), &principal_key)
                    .into_iter()
                    .map(|dependent| dependent.id())
                    .filter(|dependent| !doomed.contains(dependent))
                    .collect();

                for orphan in orphans {
                    match edge.delete_behavior {
                        DeleteBehavior::SetNull => {
                            if let Some(row) = staged.get_mut(&orphan) {
                                for field in &edge.foreign_key {
                                    row.set_field(field, Value::Null)?;
                                }
                                written += 1;
                            }
                        }
                        _ => {
                            return Err(StoreError::Constraint(format!(
                                "Deleting {} would orphan {}",
                                id, orphan
                            )));
                        }
                    }
                }
            }
        }

        for id in &doomed {
            staged.remove(id);
            written += 1;
        }

        *rows = staged;
        drop(rows);

        for id in &doomed {
            self.tracked.remove(id);
        }
        self.removed.clear();
        self.dirty.clear();

        tracing::debug!("[MEMORY_SESSION] commit wrote {} row(s), deleted {}", written, doomed.len());
        Ok(written)
    }

    async fn discard_changes(&mut self) {
        let pending: BTreeSet<EntityId> = self.dirty.union(&self.removed).cloned().collect();
        let rows = self.database.rows.read().await;
        for id in &pending {
            match rows.get(id) {
                Some(row) => {
                    self.tracked.insert(id.clone(), row.clone_entity());
                }
                None => {
                    self.tracked.remove(id);
                }
            }
        }
        drop(rows);

        self.removed.clear();
        self.dirty.clear();
        tracing::debug!("[MEMORY_SESSION] discarded {} pending change(s)", pending.len());
    }
}
