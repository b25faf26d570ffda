//! Entity model metadata
//!
//! Describes entity types, their primary keys and contracts, and the foreign key
//! relationships between them.

pub mod model;
pub mod relationship;


pub use model::{EntityModel, ModelMetadata, ModelMetadataBuilder};
pub use relationship::{
    Cardinality, DeleteBehavior, EdgeDirection, Navigation, NavigationShape, Relationship,
    RelationshipEdge,
};
