use crate::metadata::{EntityModel, RelationshipEdge};

/// Read access to the entity model: types, keys and relationships
pub trait GraphMetadataProvider: Send + Sync {
    fn entity_model(&self, entity_type: &str) -> Option<&EntityModel>;

    /// All relationship edges that start at `entity_type`, in declaration order
    fn relationships(&self, entity_type: &str) -> &[RelationshipEdge];

    /// Edges from `entity_type` to its dependents
    fn dependent_edges(&self, entity_type: &str) -> Vec<RelationshipEdge> {
        self.relationships(entity_type)
            .iter()
            .filter(|edge| edge.leads_to_dependent())
            .cloned()
            .collect()
    }

    /// Edges from `entity_type` to its principals
    fn principal_edges(&self, entity_type: &str) -> Vec<RelationshipEdge> {
        self.relationships(entity_type)
            .iter()
            .filter(|edge| !edge.leads_to_dependent())
            .cloned()
            .collect()
    }
}
