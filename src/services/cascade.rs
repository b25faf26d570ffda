//! Cascade soft delete service
//!
//! The soft delete equivalent of a cascading delete: the entity gets level 1, and every
//! dependent a cascading delete would remove gets the level of its distance from it.

use crate::cascade_walker::{CascadeWalker, WalkMode};
use crate::configuration::SoftDeleteConfiguration;
use crate::debug_log;
use crate::errors::SoftDeleteError;
use crate::filter_builder::FilterExpressionBuilder;
use crate::services::{commit_or_discard, current_value, find_by_keys, not_found, reject_one_to_one};
use crate::status::SoftDeleteStatus;
use store_object::{Entity, EntityId, EntityType, KeyValue, QueryBuilder, UnitOfWork};

/// Level given to the entity a cascade soft delete starts from
pub const ROOT_LEVEL: u8 = 1;

pub struct CascadeSoftDeleteService<'u, U: UnitOfWork + ?Sized> {
    uow: &'u mut U,
    config: SoftDeleteConfiguration<u8>,
}

impl<'u, U: UnitOfWork + ?Sized> CascadeSoftDeleteService<'u, U> {
    pub fn new(uow: &'u mut U, config: SoftDeleteConfiguration<u8>) -> Self {
        Self { uow, config }
    }

    pub fn configuration(&self) -> &SoftDeleteConfiguration<u8> {
        &self.config
    }

    /// Mutable access, e.g. to switch `read_every_time` between operations
    pub fn configuration_mut(&mut self) -> &mut SoftDeleteConfiguration<u8> {
        &mut self.config
    }

    pub fn unit_of_work(&self) -> &U {
        &*self.uow
    }

    pub fn unit_of_work_mut(&mut self) -> &mut U {
        &mut *self.uow
    }

    /// Cascade soft delete an entity, reading navigations as the configuration says
    pub async fn set_cascade_soft_delete(&mut self, id: &EntityId) -> Result<SoftDeleteStatus<usize>, SoftDeleteError> {
        let read_every_time = self.config.read_every_time();
        self.set_cascade_soft_delete_with(id, read_every_time).await
    }

    /// Cascade soft delete an entity
    ///
    /// With `read_every_time` off, navigations already loaded in the unit of work are
    /// trusted. That is only correct when the loaded values are complete and current.
    pub async fn set_cascade_soft_delete_with(
        &mut self,
        id: &EntityId,
        read_every_time: bool,
    ) -> Result<SoftDeleteStatus<usize>, SoftDeleteError> {
        reject_one_to_one(&*self.uow, id)?;
        if current_value(&*self.uow, &self.config, id)? != 0 {
            return Ok(SoftDeleteStatus::failure(format!(
                "This entry is already {}",
                self.config.soft_deleted_text()
            )));
        }

        let staged = CascadeWalker::new(&mut *self.uow, &self.config, WalkMode::SoftDelete, read_every_time)
            .walk(id, ROOT_LEVEL)
            .await;
        let found = commit_or_discard(&mut *self.uow, staged).await?;
        debug_log!("[CASCADE_SOFT_DELETE] soft deleted {} entities from {}", found, id);

        Ok(self.result(WalkMode::SoftDelete, found))
    }

    /// Reset a cascade soft delete, starting from the entity it was made on
    pub async fn reset_cascade_soft_delete(&mut self, id: &EntityId) -> Result<SoftDeleteStatus<usize>, SoftDeleteError> {
        reject_one_to_one(&*self.uow, id)?;
        let level = current_value(&*self.uow, &self.config, id)?;
        if level == 0 {
            return Ok(SoftDeleteStatus::failure(format!(
                "This entry isn't {}",
                self.config.soft_deleted_text()
            )));
        }
        if level > ROOT_LEVEL {
            let above = level - ROOT_LEVEL;
            return Ok(SoftDeleteStatus::failure(format!(
                "This entry was {} {} level{} above here",
                self.config.soft_deleted_text(),
                above,
                if above > 1 { "s" } else { "" }
            )));
        }

        // Parts of the subtree may be soft deleted already, so every navigation is reloaded
        let staged = CascadeWalker::new(&mut *self.uow, &self.config, WalkMode::ResetSoftDelete, true)
            .walk(id, ROOT_LEVEL)
            .await;
        let found = commit_or_discard(&mut *self.uow, staged).await?;
        debug_log!("[CASCADE_SOFT_DELETE] reset {} entities from {}", found, id);

        Ok(self.result(WalkMode::ResetSoftDelete, found))
    }

    /// Count what `hard_delete_soft_deleted_entries` would remove, without changing anything
    pub async fn check_cascade_soft_delete(&mut self, id: &EntityId) -> Result<SoftDeleteStatus<usize>, SoftDeleteError> {
        let level = current_value(&*self.uow, &self.config, id)?;
        if level == 0 {
            return Ok(SoftDeleteStatus::failure(format!(
                "This entry isn't {}",
                self.config.soft_deleted_text()
            )));
        }

        let found = CascadeWalker::new(&mut *self.uow, &self.config, WalkMode::CheckWillDelete, true)
            .walk(id, level)
            .await?;

        Ok(self.result(WalkMode::CheckWillDelete, found))
    }

    /// Remove a soft deleted entity and the dependents soft deleted with it
    pub async fn hard_delete_soft_deleted_entries(
        &mut self,
        id: &EntityId,
    ) -> Result<SoftDeleteStatus<usize>, SoftDeleteError> {
        let level = current_value(&*self.uow, &self.config, id)?;
        if level == 0 {
            return Ok(SoftDeleteStatus::failure(format!(
                "This entry isn't {}",
                self.config.soft_deleted_text()
            )));
        }

        let staged = CascadeWalker::new(&mut *self.uow, &self.config, WalkMode::HardDeleteSoftDeleted, true)
            .walk(id, level)
            .await;
        let found = commit_or_discard(&mut *self.uow, staged).await?;
        debug_log!("[CASCADE_SOFT_DELETE] hard deleted {} entities from {}", found, id);

        Ok(self.result(WalkMode::HardDeleteSoftDeleted, found))
    }

    pub async fn set_cascade_soft_delete_by_keys<T: EntityType>(
        &mut self,
        keys: &[KeyValue],
    ) -> Result<SoftDeleteStatus<usize>, SoftDeleteError> {
        match find_by_keys::<T, _, _>(&mut *self.uow, &self.config, keys).await? {
            Some(id) => self.set_cascade_soft_delete(&id).await,
            None => Ok(not_found(&self.config)),
        }
    }

    pub async fn reset_cascade_soft_delete_by_keys<T: EntityType>(
        &mut self,
        keys: &[KeyValue],
    ) -> Result<SoftDeleteStatus<usize>, SoftDeleteError> {
        match find_by_keys::<T, _, _>(&mut *self.uow, &self.config, keys).await? {
            Some(id) => self.reset_cascade_soft_delete(&id).await,
            None => Ok(not_found(&self.config)),
        }
    }

    pub async fn check_cascade_soft_delete_by_keys<T: EntityType>(
        &mut self,
        keys: &[KeyValue],
    ) -> Result<SoftDeleteStatus<usize>, SoftDeleteError> {
        match find_by_keys::<T, _, _>(&mut *self.uow, &self.config, keys).await? {
            Some(id) => self.check_cascade_soft_delete(&id).await,
            None => Ok(not_found(&self.config)),
        }
    }

    pub async fn hard_delete_soft_deleted_entries_by_keys<T: EntityType>(
        &mut self,
        keys: &[KeyValue],
    ) -> Result<SoftDeleteStatus<usize>, SoftDeleteError> {
        match find_by_keys::<T, _, _>(&mut *self.uow, &self.config, keys).await? {
            Some(id) => self.hard_delete_soft_deleted_entries(&id).await,
            None => Ok(not_found(&self.config)),
        }
    }

    /// Query for the entities of `T` a reset can start from, i.e. those at level 1
    pub fn soft_deleted_query<T: EntityType>(&self) -> Result<QueryBuilder, SoftDeleteError> {
        let filter = FilterExpressionBuilder::new(&self.config).soft_deleted_filter::<T>(ROOT_LEVEL)?;
        Ok(filter.to_query())
    }

    /// Entities of `T` soft deleted directly, not through a cascade from a principal
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

    fn result(&self, mode: WalkMode, found: usize) -> SoftDeleteStatus<usize> {
        let message = match mode {
            WalkMode::SoftDelete => form_message(self.config.soft_deleted_text(), found),
            WalkMode::ResetSoftDelete => form_message(self.config.reset_soft_delete_text(), found),
            WalkMode::CheckWillDelete if found == 0 => "No entries will be hard deleted".to_string(),
            WalkMode::CheckWillDelete => format!(
                "Are you sure you want to hard delete this entity{}",
                dependents_suffix(found)
            ),
            WalkMode::HardDeleteSoftDeleted => form_message("hard deleted", found),
        };
        SoftDeleteStatus::success(found, message)
    }
}

fn form_message(what: &str, found: usize) -> String {
    if found == 0 {
        format!("No entries have been {}", what)
    } else {
        format!("You have {} an entity{}", what, dependents_suffix(found))
    }
}

fn dependents_suffix(found: usize) -> String {
    match found {
        0 | 1 => String::new(),
        2 => " and its 1 dependent".to_string(),
        n => format!(" and its {} dependents", n - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_message() {
        assert_eq!(form_message("soft deleted", 0), "No entries have been soft deleted");
        assert_eq!(form_message("soft deleted", 1), "You have soft deleted an entity");
        assert_eq!(form_message("recovered", 2), "You have recovered an entity and its 1 dependent");
        assert_eq!(
            form_message("hard deleted", 13),
            "You have hard deleted an entity and its 12 dependents"
        );
    }
}
