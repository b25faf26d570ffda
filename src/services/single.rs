//! Single soft delete service
//!
//! Soft deletes one entity at a time through a boolean value. Dependents are not touched;
//! they are expected to be hidden through their own visibility filters.

use crate::configuration::SoftDeleteConfiguration;
use crate::debug_log;
use crate::errors::SoftDeleteError;
use crate::filter_builder::FilterExpressionBuilder;
use crate::services::{commit_or_discard, current_value, find_by_keys, not_found, reject_one_to_one};
use crate::status::SoftDeleteStatus;
use store_object::{Entity, EntityId, EntityType, KeyValue, QueryBuilder, UnitOfWork};

pub struct SingleSoftDeleteService<'u, U: UnitOfWork + ?Sized> {
    uow: &'u mut U,
    config: SoftDeleteConfiguration<bool>,
}

impl<'u, U: UnitOfWork + ?Sized> SingleSoftDeleteService<'u, U> {
    pub fn new(uow: &'u mut U, config: SoftDeleteConfiguration<bool>) -> Self {
        Self { uow, config }
    }

    pub fn configuration(&self) -> &SoftDeleteConfiguration<bool> {
        &self.config
    }

    pub fn unit_of_work(&self) -> &U {
        &*self.uow
    }

    pub fn unit_of_work_mut(&mut self) -> &mut U {
        &mut *self.uow
    }

    /// Soft delete a tracked entity
    pub async fn set_soft_delete(&mut self, id: &EntityId) -> Result<SoftDeleteStatus<usize>, SoftDeleteError> {
        reject_one_to_one(&*self.uow, id)?;
        if current_value(&*self.uow, &self.config, id)? {
            return Ok(SoftDeleteStatus::failure(format!(
                "This entry is already {}.",
                self.config.soft_deleted_text()
            )));
        }

        let staged = self.write(id, true).map(|_| 1);
        commit_or_discard(&mut *self.uow, staged).await?;
        debug_log!("[SINGLE_SOFT_DELETE] soft deleted {}", id);

        Ok(SoftDeleteStatus::success(
            1,
            format!("Successfully {} this entry", self.config.soft_deleted_text()),
        ))
    }

    /// Make a soft deleted entity visible again
    ///
    /// Unlike `set_soft_delete` this accepts one-to-one dependents, so rows soft deleted
    /// outside the service can still be recovered.
    pub async fn reset_soft_delete(&mut self, id: &EntityId) -> Result<SoftDeleteStatus<usize>, SoftDeleteError> {
        if !current_value(&*self.uow, &self.config, id)? {
            return Ok(SoftDeleteStatus::failure(format!(
                "This entry isn't {}.",
                self.config.soft_deleted_text()
            )));
        }

        let staged = self.write(id, false).map(|_| 1);
        commit_or_discard(&mut *self.uow, staged).await?;
        debug_log!("[SINGLE_SOFT_DELETE] reset {}", id);

        Ok(SoftDeleteStatus::success(
            1,
            format!("Successfully {} on this entry", self.config.reset_soft_delete_text()),
        ))
    }

    /// Remove an entity that is already soft deleted
    pub async fn hard_delete_soft_deleted_entry(
        &mut self,
        id: &EntityId,
    ) -> Result<SoftDeleteStatus<usize>, SoftDeleteError> {
        if !current_value(&*self.uow, &self.config, id)? {
            return Ok(SoftDeleteStatus::failure(format!(
                "This entry isn't {}.",
                self.config.soft_deleted_text()
            )));
        }

        let staged = self.uow.remove(id).map(|_| 1).map_err(SoftDeleteError::from);
        commit_or_discard(&mut *self.uow, staged).await?;
        debug_log!("[SINGLE_SOFT_DELETE] hard deleted {}", id);

        Ok(SoftDeleteStatus::success(1, "Successfully hard deleted this entry"))
    }

    pub async fn set_soft_delete_by_keys<T: EntityType>(
        &mut self,
        keys: &[KeyValue],
    ) -> Result<SoftDeleteStatus<usize>, SoftDeleteError> {
        match find_by_keys::<T, _, _>(&mut *self.uow, &self.config, keys).await? {
            Some(id) => self.set_soft_delete(&id).await,
            None => Ok(not_found(&self.config)),
        }
    }

    pub async fn reset_soft_delete_by_keys<T: EntityType>(
        &mut self,
        keys: &[KeyValue],
    ) -> Result<SoftDeleteStatus<usize>, SoftDeleteError> {
        match find_by_keys::<T, _, _>(&mut *self.uow, &self.config, keys).await? {
            Some(id) => self.reset_soft_delete(&id).await,
            None => Ok(not_found(&self.config)),
        }
    }

    pub async fn hard_delete_by_keys<T: EntityType>(
        &mut self,
        keys: &[KeyValue],
    ) -> Result<SoftDeleteStatus<usize>, SoftDeleteError> {
        match find_by_keys::<T, _, _>(&mut *self.uow, &self.config, keys).await? {
            Some(id) => self.hard_delete_soft_deleted_entry(&id).await,
            None => Ok(not_found(&self.config)),
        }
    }

    /// Query for the soft deleted entities of `T`, to run with visibility filters bypassed
    pub fn soft_deleted_query<T: EntityType>(&self) -> Result<QueryBuilder, SoftDeleteError> {
        let filter = FilterExpressionBuilder::new(&self.config).soft_deleted_filter::<T>(true)?;
        Ok(filter.to_query())
    }

    /// Every soft deleted entity of `T` the supplementary filters let through
    pub async fn get_soft_deleted_entries<T>(&mut self) -> Result<Vec<T>, SoftDeleteError>
    where
        T: EntityType + Entity + Clone,
    {
        let query = self.soft_deleted_query::<T>()?;
        let ids = self.uow.query(T::type_name(), &query, true).await?;
        Ok(ids
            .iter()
            .filter_map(|id| self.uow.entity(id)?.downcast_ref::<T>().cloned())
            .collect())
    }

    fn write(&mut self, id: &EntityId, value: bool) -> Result<(), SoftDeleteError> {
        let entity = self
            .uow
            .entity_mut(id)
            .ok_or_else(|| SoftDeleteError::EntityNotTracked(id.clone()))?;
        self.config.write_value(entity, value)
    }
}
