//! Convenience re-exports for common Softhaus usage
//!
//! This prelude module re-exports the services, configuration and store types needed to
//! soft delete entities with a single use statement.
//!
//! # Example
//!
//! ```rust
//! use softhaus::prelude::*;
//!
//! // Now you have access to the soft delete services and the store traits
//! ```

// Soft delete services and their building blocks
pub use crate::cascade_walker::{CascadeWalker, WalkMode};
pub use crate::configuration::{SoftDeleteConfiguration, SoftDeleteConfigurationBuilder, SoftDeleteValue};
pub use crate::errors::SoftDeleteError;
pub use crate::filter_builder::{FilterExpression, FilterExpressionBuilder};
pub use crate::navigation_loader::NavigationLoader;
pub use crate::services::{CascadeSoftDeleteService, SingleSoftDeleteService};
pub use crate::status::SoftDeleteStatus;

// Re-export centralized config
pub use config::{AppConfig, SoftDeleteSettings};

// Re-export commonly used store-object types for convenience
pub use store_object::prelude::*;

// Re-export store_object module for macro-generated code
pub use store_object;

// Entity derive for model creation
pub use entity_derive::{Entity, model};

// Common external dependencies
pub use anyhow;
pub use tokio;
