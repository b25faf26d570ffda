//! Navigation loading for the cascade walker
//!
//! A navigation is either taken from what the unit of work already holds in memory, or
//! reloaded from the store with visibility filters bypassed and narrowed to one soft
//! delete level.

use crate::configuration::SoftDeleteConfiguration;
use crate::errors::SoftDeleteError;
use crate::filter_builder::FilterExpressionBuilder;
use store_object::{EntityId, NavigationShape, RelationshipEdge, StoreError, UnitOfWork};

pub struct NavigationLoader<'c> {
    config: &'c SoftDeleteConfiguration<u8>,
    read_every_time: bool,
}

impl<'c> NavigationLoader<'c> {
    pub fn new(config: &'c SoftDeleteConfiguration<u8>, read_every_time: bool) -> Self {
        Self {
            config,
            read_every_time,
        }
    }

    pub fn read_every_time(&self) -> bool {
        self.read_every_time
    }

    /// Targets of `edge` from `id`
    ///
    /// A reload only returns targets whose level is `level`. The in-memory value, used
    /// when `read_every_time` is off and the navigation is loaded, is returned as is.
    pub async fn load<U>(
        &self,
        uow: &mut U,
        id: &EntityId,
        edge: &RelationshipEdge,
        level: u8,
    ) -> Result<Vec<EntityId>, SoftDeleteError>
    where
        U: UnitOfWork + ?Sized,
    {
        let Some(navigation) = edge.navigation.as_ref() else {
            return Ok(Vec::new());
        };
        if navigation.shape != NavigationShape::Property {
            return Err(SoftDeleteError::UnsupportedNavigation {
                entity_type: edge.from_type.clone(),
                navigation: navigation.name.clone(),
            });
        }

        let target = uow
            .metadata()
            .entity_model(&edge.target_type)
            .cloned()
            .ok_or_else(|| StoreError::UnknownEntityType(edge.target_type.clone()))?;
        if !self.config.participates(&target) {
            return Ok(Vec::new());
        }

        if !self.read_every_time {
            if let Some(loaded) = uow.loaded_navigation(id, &navigation.name) {
                return Ok(loaded);
            }
        }

        let filter = FilterExpressionBuilder::new(self.config).soft_deleted_filter_for(&target, level)?;
        crate::trace_log!(
            "[NAVIGATION_LOADER] reloading {}.{} at level {}",
            id,
            navigation.name,
            level
        );
        let targets = uow.load_navigation(id, edge, Some(filter.body())).await?;
        Ok(targets)
    }
}
