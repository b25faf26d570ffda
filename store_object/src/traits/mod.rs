//! Traits for entity persistence
//!
//! This module contains the traits the soft delete services are written against: the
//! entity view, the model metadata provider and the unit of work.

pub mod entity;
pub mod metadata;
pub mod unit_of_work;

pub use entity::{Entity, EntityType, KeyField};
pub use metadata::GraphMetadataProvider;
pub use unit_of_work::UnitOfWork;
