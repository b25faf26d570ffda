//! Relationship metadata
//!
//! A `Relationship` is declared once per foreign key. Each relationship is seen from both
//! ends as a `RelationshipEdge`: from the principal towards its dependents, and from the
//! dependent towards its principal.

use crate::traits::EntityType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Single,
    Collection,
}

/// What removing the principal does to its dependents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteBehavior {
    Cascade,
    ClientCascade,
    SetNull,
    Restrict,
    NoAction,
}

impl DeleteBehavior {
    pub fn is_cascade(&self) -> bool {
        matches!(self, DeleteBehavior::Cascade | DeleteBehavior::ClientCascade)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDirection {
    ToDependent,
    ToPrincipal,
}

/// How a navigation is exposed on the entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationShape {
    /// Readable and writable through the entity's field accessors
    Property,
    /// Only reachable through a private backing field
    BackingField,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub name: String,
    pub cardinality: Cardinality,
    pub shape: NavigationShape,
}

impl Navigation {
    pub fn new(name: &str, cardinality: Cardinality) -> Self {
        Self {
            name: name.to_string(),
            cardinality,
            shape: NavigationShape::Property,
        }
    }

    pub fn is_collection(&self) -> bool {
        self.cardinality == Cardinality::Collection
    }
}

/// One relationship seen from `from_type`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipEdge {
    pub from_type: String,
    pub target_type: String,
    /// Navigation declared on `from_type`, if any
    pub navigation: Option<Navigation>,
    /// Navigation declared on `target_type` pointing back, if any
    pub inverse: Option<Navigation>,
    /// Foreign key fields on the dependent, in principal key order
    pub foreign_key: Vec<String>,
    pub delete_behavior: DeleteBehavior,
    pub direction: EdgeDirection,
}

impl RelationshipEdge {
    pub fn leads_to_dependent(&self) -> bool {
        self.direction == EdgeDirection::ToDependent
    }

    /// Edges a cascading delete would follow
    pub fn is_cascade_to_dependent(&self) -> bool {
        self.leads_to_dependent() && self.delete_behavior.is_cascade()
    }

    /// Neither end of the foreign key is a collection
    pub fn is_one_to_one(&self) -> bool {
        let collection = |nav: &Option<Navigation>| nav.as_ref().is_some_and(Navigation::is_collection);
        !collection(&self.navigation) && !collection(&self.inverse)
    }

    pub fn navigation_name(&self) -> Option<&str> {
        self.navigation.as_ref().map(|nav| nav.name.as_str())
    }

    pub fn principal_type(&self) -> &str {
        match self.direction {
            EdgeDirection::ToDependent => &self.from_type,
            EdgeDirection::ToPrincipal => &self.target_type,
        }
    }

    pub fn dependent_type(&self) -> &str {
        match self.direction {
            EdgeDirection::ToDependent => &self.target_type,
            EdgeDirection::ToPrincipal => &self.from_type,
        }
    }
}

/// Declaration of one foreign key relationship
#[derive(Debug, Clone)]
pub struct Relationship {
    pub(crate) principal: String,
    pub(crate) dependent: String,
    pub(crate) foreign_key: Vec<String>,
    pub(crate) principal_navigation: Option<Navigation>,
    pub(crate) dependent_navigation: Option<Navigation>,
    pub(crate) delete_behavior: DeleteBehavior,
}

impl Relationship {
    /// A relationship without navigations; delete behaviour defaults to cascade
    pub fn between(principal: &str, dependent: &str, foreign_key: &[&str]) -> Self {
        Self {
            principal: principal.to_string(),
            dependent: dependent.to_string(),
            foreign_key: foreign_key.iter().map(|f| f.to_string()).collect(),
            principal_navigation: None,
            dependent_navigation: None,
            delete_behavior: DeleteBehavior::Cascade,
        }
    }

    /// Principal `P` holds a collection of `D`
    pub fn one_to_many<P: EntityType, D: EntityType>(collection: &str, foreign_key: &[&str]) -> Self {
        let mut relationship = Self::between(P::type_name(), D::type_name(), foreign_key);
        relationship.principal_navigation = Some(Navigation::new(collection, Cardinality::Collection));
        relationship
    }

    /// Principal `P` holds at most one `D`
    pub fn one_to_one<P: EntityType, D: EntityType>(reference: &str, foreign_key: &[&str]) -> Self {
        let mut relationship = Self::between(P::type_name(), D::type_name(), foreign_key);
        relationship.principal_navigation = Some(Navigation::new(reference, Cardinality::Single));
        relationship
    }

    /// Add the navigation from the dependent back to its principal
    pub fn with_inverse(mut self, reference: &str) -> Self {
        self.dependent_navigation = Some(Navigation::new(reference, Cardinality::Single));
        self
    }

    pub fn on_delete(mut self, behavior: DeleteBehavior) -> Self {
        self.delete_behavior = behavior;
        self
    }

    /// Change how the principal's navigation is exposed
    pub fn navigation_shape(mut self, shape: NavigationShape) -> Self {
        if let Some(nav) = self.principal_navigation.as_mut() {
            nav.shape = shape;
        }
        self
    }

    pub(crate) fn edges(&self) -> (RelationshipEdge, RelationshipEdge) {
        let to_dependent = RelationshipEdge {
            from_type: self.principal.clone(),
            target_type: self.dependent.clone(),
            navigation: self.principal_navigation.clone(),
            inverse: self.dependent_navigation.clone(),
            foreign_key: self.foreign_key.clone(),
            delete_behavior: self.delete_behavior,
            direction: EdgeDirection::ToDependent,
        };
        let to_principal = RelationshipEdge {
            from_type: self.dependent.clone(),
            target_type: self.principal.clone(),
            navigation: self.dependent_navigation.clone(),
            inverse: self.principal_navigation.clone(),
            foreign_key: self.foreign_key.clone(),
            delete_behavior: self.delete_behavior,
            direction: EdgeDirection::ToPrincipal,
        };
        (to_dependent, to_principal)
    }
}
