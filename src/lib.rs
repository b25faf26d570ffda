//! # Softhaus
//!
//! Soft delete and cascade soft delete services over a graph of related entities.
//!
//! A single soft delete hides one entity through a boolean. A cascade soft delete gives
//! the entity level 1 and every dependent a cascading delete would remove the level of
//! its distance from it, so the whole subtree can later be reset or hard deleted.
//! Queries for soft deleted or visible entities are built as filter expressions the store
//! translates, composed with any tenant or owner filters the configuration registers.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use softhaus::prelude::*;
//! use std::sync::Arc;
//!
//! #[model]
//! #[entity(name = "employees", contracts("CascadeSoftDelete"))]
//! pub struct Employee {
//!     #[key]
//!     pub id: i64,
//!     pub name: String,
//!     pub manager_id: Option<i64>,
//!     pub soft_delete_level: u8,
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let metadata = ModelMetadata::builder()
//!         .entity::<Employee>()
//!         .relationship(Relationship::one_to_many::<Employee, Employee>("work_for_me", &["manager_id"]))
//!         .build()?;
//!     let database = Arc::new(MemoryDatabase::new(metadata));
//!     database
//!         .insert(Employee { id: 1, name: "CEO".to_string(), manager_id: None, soft_delete_level: 0 })
//!         .await?;
//!
//!     let config = SoftDeleteConfiguration::<u8>::builder("CascadeSoftDelete")
//!         .value_field("soft_delete_level")
//!         .build()?;
//!
//!     let mut session = database.session();
//!     let ceo = session.find::<Employee>(&[KeyValue::from(1)]).await?.expect("seeded");
//!     let mut service = CascadeSoftDeleteService::new(&mut session, config);
//!
//!     let status = service.set_cascade_soft_delete(&ceo).await?;
//!     println!("{}", status.message());
//!
//!     Ok(())
//! }
//! ```

// Lets `#[derive(Entity)]` output resolve `::softhaus` inside this crate too
extern crate self as softhaus;

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod cascade_walker;
pub mod configuration;
pub mod errors;
pub mod filter_builder;
pub mod navigation_loader;
pub mod prelude;
pub mod services;
pub mod status;

// Re-export the main public types for convenience
pub use cascade_walker::{CascadeWalker, WalkMode};
pub use configuration::{SoftDeleteConfiguration, SoftDeleteValue};
pub use errors::SoftDeleteError;
pub use filter_builder::{FilterExpression, FilterExpressionBuilder};
pub use navigation_loader::NavigationLoader;
pub use services::{CascadeSoftDeleteService, SingleSoftDeleteService};
pub use status::SoftDeleteStatus;

// Re-export centralized config
pub use config::{AppConfig, ConfigError, SoftDeleteSettings};

// Re-export internal crates used by macros and public API
// These MUST be public for the generated macro code to work correctly
pub use store_object;
pub use entity_derive;
pub use config;

// Re-export external dependencies used in public API
pub use async_trait;
