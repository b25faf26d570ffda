use crate::errors::StoreError;
use crate::metadata::relationship::{Relationship, RelationshipEdge};
use crate::traits::entity::{EntityType, KeyField};
use crate::traits::metadata::GraphMetadataProvider;
use crate::validation::{ValidatedEntityName, ValidatedFieldName};
use std::collections::HashMap;

/// Registered entity type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityModel {
    pub name: String,
    pub key: Vec<KeyField>,
    pub contracts: Vec<String>,
}

impl EntityModel {
    pub fn new(name: &str, key: Vec<KeyField>, contracts: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            key,
            contracts: contracts.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn of<T: EntityType>() -> Self {
        Self::new(T::type_name(), T::key_fields(), T::type_contracts())
    }

    /// Whether the type is `type_key` itself or implements the contract `type_key`
    pub fn is_assignable_to(&self, type_key: &str) -> bool {
        self.name == type_key || self.contracts.iter().any(|c| c == type_key)
    }
}

/// The complete model: entity types plus relationship edges per type
#[derive(Debug, Clone, Default)]
pub struct ModelMetadata {
    entities: HashMap<String, EntityModel>,
    edges: HashMap<String, Vec<RelationshipEdge>>,
}

impl ModelMetadata {
    pub fn builder() -> ModelMetadataBuilder {
        ModelMetadataBuilder::default()
    }

    pub fn entity_types(&self) -> impl Iterator<Item = &EntityModel> {
        self.entities.values()
    }
}

impl GraphMetadataProvider for ModelMetadata {
    fn entity_model(&self, entity_type: &str) -> Option<&EntityModel> {
        self.entities.get(entity_type)
    }

    fn relationships(&self, entity_type: &str) -> &[RelationshipEdge] {
        self.edges
            .get(entity_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Debug, Default)]
pub struct ModelMetadataBuilder {
    entities: Vec<EntityModel>,
    relationships: Vec<Relationship>,
}

impl ModelMetadataBuilder {
    pub fn entity<T: EntityType>(self) -> Self {
        self.entity_model(EntityModel::of::<T>())
    }

    pub fn entity_model(mut self, model: EntityModel) -> Self {
        self.entities.push(model);
        self
    }

    pub fn relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    /// Validate names and keys and derive both edges of every relationship
    pub fn build(self) -> Result<ModelMetadata, StoreError> {
        let mut metadata = ModelMetadata::default();

        for model in self.entities {
            ValidatedEntityName::new(&model.name)
                .map_err(|e| StoreError::InvalidModel(e.to_string()))?;
            for field in &model.key {
                ValidatedFieldName::new(&field.name)
                    .map_err(|e| StoreError::InvalidModel(format!("{}: {}", model.name, e)))?;
            }
            if metadata.entities.contains_key(&model.name) {
                return Err(StoreError::InvalidModel(format!(
                    "Entity type {} is registered twice",
                    model.name
                )));
            }
            metadata.edges.entry(model.name.clone()).or_default();
            metadata.entities.insert(model.name.clone(), model);
        }

        for relationship in self.relationships {
            let principal = metadata
                .entities
                .get(&relationship.principal)
                .ok_or_else(|| StoreError::UnknownEntityType(relationship.principal.clone()))?;
            if !metadata.entities.contains_key(&relationship.dependent) {
                return Err(StoreError::UnknownEntityType(relationship.dependent.clone()));
            }
            if principal.key.is_empty() {
                return Err(StoreError::NoPrimaryKey(principal.name.clone()));
            }
            if relationship.foreign_key.len() != principal.key.len() {
                return Err(StoreError::InvalidModel(format!(
                    "Foreign key {}.({}) has {} field(s) but the key of {} has {}",
                    relationship.dependent,
                    relationship.foreign_key.join(", "),
                    relationship.foreign_key.len(),
                    principal.name,
                    principal.key.len()
                )));
            }
            for field in &relationship.foreign_key {
                ValidatedFieldName::new(field).map_err(|e| {
                    StoreError::InvalidModel(format!("{}: {}", relationship.dependent, e))
                })?;
            }

            let (to_dependent, to_principal) = relationship.edges();
            metadata
                .edges
                .entry(to_dependent.from_type.clone())
                .or_default()
                .push(to_dependent);
            metadata
                .edges
                .entry(to_principal.from_type.clone())
                .or_default()
                .push(to_principal);
        }

        Ok(metadata)
    }
}
