use crate::errors::StoreError;
use crate::id_type::EntityId;
use crate::memory_store::evaluate;
use crate::memory_store::session::MemorySession;
use crate::metadata::ModelMetadata;
use crate::query_builder::QueryFilter;
use crate::traits::{Entity, GraphMetadataProvider};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

pub(crate) type Rows = BTreeMap<EntityId, Box<dyn Entity>>;

/// Committed rows of every entity type, shared by all sessions
pub struct MemoryDatabase {
    pub(crate) metadata: ModelMetadata,
    pub(crate) rows: RwLock<Rows>,
    pub(crate) visibility_filters: HashMap<String, QueryFilter>,
}

impl std::fmt::Debug for MemoryDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDatabase")
            .field("visibility_filters", &self.visibility_filters)
            .finish()
    }
}

impl MemoryDatabase {
    pub fn new(metadata: ModelMetadata) -> Self {
        Self {
            metadata,
            rows: RwLock::new(BTreeMap::new()),
            visibility_filters: HashMap::new(),
        }
    }

    /// Filter applied to every query of `entity_type` unless it is explicitly bypassed
    pub fn with_visibility_filter(mut self, entity_type: &str, filter: QueryFilter) -> Self {
        self.visibility_filters
            .insert(entity_type.to_string(), filter);
        self
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn visibility_filter(&self, entity_type: &str) -> Option<&QueryFilter> {
        self.visibility_filters.get(entity_type)
    }

    /// Open a unit of work over this database
    pub fn session(self: &Arc<Self>) -> MemorySession {
        MemorySession::new(Arc::clone(self))
    }

    /// Insert or replace a committed row
    pub async fn insert<E: Entity>(&self, entity: E) -> Result<EntityId, StoreError> {
        let model = self
            .metadata
            .entity_model(entity.entity_type())
            .ok_or_else(|| StoreError::UnknownEntityType(entity.entity_type().to_string()))?;
        let id = EntityId::new(model.name.clone(), entity.key());
        if id.key().len() != model.key.len() {
            return Err(StoreError::KeyCountMismatch {
                provided: id.key().len(),
                expected: model.key.len(),
            });
        }

        tracing::debug!("[MEMORY_DB] insert {}", id);
        self.rows.write().await.insert(id.clone(), Box::new(entity));
        Ok(id)
    }

    /// Number of committed rows of a type
    pub async fn count(&self, entity_type: &str, bypass_visibility_filter: bool) -> usize {
        let filter = if bypass_visibility_filter {
            None
        } else {
            self.visibility_filter(entity_type)
        };
        self.rows
            .read()
            .await
            .iter()
            .filter(|(id, _)| id.entity_type() == entity_type)
            .filter(|(_, row)| filter.map_or(true, |f| evaluate::matches(f, &***row)))
            .count()
    }

    /// Snapshot of one committed row
    pub async fn get<T: Entity + Clone>(&self, id: &EntityId) -> Option<T> {
        let rows = self.rows.read().await;
        rows.get(id)
            .and_then(|row| row.downcast_ref::<T>())
            .cloned()
    }

    /// Snapshot of every committed row of type `T`, in key order
    pub async fn rows<T: Entity + Clone>(&self) -> Vec<T> {
        self.rows
            .read()
            .await
            .values()
            .filter_map(|row| row.downcast_ref::<T>())
            .cloned()
            .collect()
    }
}
