//! Soft delete services
//!
//! `SingleSoftDeleteService` flips a boolean on one entity, `CascadeSoftDeleteService`
//! walks the cascade graph below it with a level. Both commit once per operation and
//! report business outcomes through a `SoftDeleteStatus`.

pub mod cascade;
pub mod single;

pub use cascade::CascadeSoftDeleteService;
pub use single::SingleSoftDeleteService;

use crate::configuration::{SoftDeleteConfiguration, SoftDeleteValue};
use crate::debug_log;
use crate::errors::SoftDeleteError;
use crate::filter_builder::FilterExpressionBuilder;
use crate::status::SoftDeleteStatus;
use store_object::{EntityId, EntityType, KeyValue, QueryFilter, StoreError, UnitOfWork};

pub(crate) const NOT_FOUND_MESSAGE: &str = "Could not find the entry you ask for.";

/// The tracked entity's soft delete value, failing for untracked or non-participating entities
pub(crate) fn current_value<U, V>(
    uow: &U,
    config: &SoftDeleteConfiguration<V>,
    id: &EntityId,
) -> Result<V, SoftDeleteError>
where
    U: UnitOfWork + ?Sized,
    V: SoftDeleteValue,
{
    let entity = uow
        .entity(id)
        .ok_or_else(|| SoftDeleteError::EntityNotTracked(id.clone()))?;
    if !config.is_participant(entity) {
        return Err(SoftDeleteError::NotSoftDeletable(entity.entity_type().to_string()));
    }
    config.read_value(entity)
}

/// Every foreign key on the entity must have a collection at one end
pub(crate) fn reject_one_to_one<U>(uow: &U, id: &EntityId) -> Result<(), SoftDeleteError>
where
    U: UnitOfWork + ?Sized,
{
    let one_to_one = uow
        .metadata()
        .principal_edges(id.entity_type())
        .iter()
        .any(|edge| edge.is_one_to_one());
    if one_to_one {
        return Err(SoftDeleteError::OneToOneRelationship {
            entity_type: id.entity_type().to_string(),
        });
    }
    Ok(())
}

/// Load an entity of `T` by primary key, ignoring its visibility filter
///
/// The configuration's supplementary filters for `T` still apply, so a lookup cannot
/// reach another owner's entity.
pub(crate) async fn find_by_keys<T, U, V>(
    uow: &mut U,
    config: &SoftDeleteConfiguration<V>,
    keys: &[KeyValue],
) -> Result<Option<EntityId>, SoftDeleteError>
where
    T: EntityType,
    U: UnitOfWork + ?Sized,
    V: SoftDeleteValue,
{
    let model = uow
        .metadata()
        .entity_model(T::type_name())
        .cloned()
        .ok_or_else(|| StoreError::UnknownEntityType(T::type_name().to_string()))?;
    if !config.participates(&model) {
        return Err(SoftDeleteError::NotSoftDeletable(model.name));
    }

    let Some(id) = uow.load_by_keys(&model.name, keys, true).await? else {
        return Ok(None);
    };
    let Some(other_filters) = FilterExpressionBuilder::new(config).other_filters_only_for(&model)? else {
        return Ok(Some(id));
    };

    let key_filters = model
        .key
        .iter()
        .zip(keys)
        .map(|(field, value)| QueryFilter::eq(&field.name, value.to_json()))
        .collect();
    let query = other_filters.to_query().filters(key_filters);
    let matching = uow.query(&model.name, &query, true).await?;
    Ok(matching.into_iter().find(|found| *found == id))
}

/// Commit the changes staged in the unit of work, returning `staged`'s count
///
/// When staging or the commit fails, every pending change is discarded so a later
/// commit on the same unit of work cannot persist half of the operation.
pub(crate) async fn commit_or_discard<U>(
    uow: &mut U,
    staged: Result<usize, SoftDeleteError>,
) -> Result<usize, SoftDeleteError>
where
    U: UnitOfWork + ?Sized,
{
    let outcome = match staged {
        Ok(found) => uow.commit().await.map(|_| found).map_err(SoftDeleteError::from),
        Err(error) => Err(error),
    };
    if outcome.is_err() {
        uow.discard_changes().await;
        debug_log!("[SOFT_DELETE] discarded pending changes after a failed operation");
    }
    outcome
}

/// Status for a by-key lookup that found nothing
pub(crate) fn not_found<V: SoftDeleteValue>(config: &SoftDeleteConfiguration<V>) -> SoftDeleteStatus<usize> {
    if config.not_found_is_not_an_error() {
        SoftDeleteStatus::success(0, NOT_FOUND_MESSAGE)
    } else {
        SoftDeleteStatus::failure(NOT_FOUND_MESSAGE)
    }
}
