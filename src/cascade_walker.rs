//! Cascade walker
//!
//! Visits every entity reachable from a root through relationships whose delete behaviour
//! cascades, applying the rule of one `WalkMode` to each of them exactly once.
//!
//! A node whose state does not fit the rule is left alone together with everything below
//! it. For a soft delete this keeps entities deleted earlier, and their dependents, at
//! their own level; for a reset it keeps independently deleted subtrees deleted.

use crate::configuration::SoftDeleteConfiguration;
use crate::errors::SoftDeleteError;
use crate::navigation_loader::NavigationLoader;
use crate::{debug_log, trace_log};
use futures::future::BoxFuture;
use std::collections::HashSet;
use store_object::{EntityId, RelationshipEdge, UnitOfWork};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalkMode {
    /// Set the level of active entities to their depth
    SoftDelete,
    /// Set entities back to 0 when their level is their depth
    ResetSoftDelete,
    /// Count soft deleted entities, changing nothing
    CheckWillDelete,
    /// Remove soft deleted entities
    HardDeleteSoftDeleted,
}

impl WalkMode {
    /// The level a navigation reload looks for when the children sit at `child_level`
    ///
    /// Children found by a soft delete have not been touched yet, so they are active.
    pub fn level_to_look_for(&self, child_level: u8) -> u8 {
        match self {
            WalkMode::SoftDelete => 0,
            _ => child_level,
        }
    }
}

pub struct CascadeWalker<'w, U: UnitOfWork + ?Sized> {
    uow: &'w mut U,
    config: &'w SoftDeleteConfiguration<u8>,
    mode: WalkMode,
    loader: NavigationLoader<'w>,
    visited: HashSet<EntityId>,
    found: usize,
}

impl<'w, U: UnitOfWork + ?Sized> CascadeWalker<'w, U> {
    pub fn new(
        uow: &'w mut U,
        config: &'w SoftDeleteConfiguration<u8>,
        mode: WalkMode,
        read_every_time: bool,
    ) -> Self {
        Self {
            uow,
            config,
            mode,
            loader: NavigationLoader::new(config, read_every_time),
            visited: HashSet::new(),
            found: 0,
        }
    }

    pub fn mode(&self) -> WalkMode {
        self.mode
    }

    /// Entities changed so far, or for `CheckWillDelete` the entities found
    pub fn found(&self) -> usize {
        self.found
    }

    /// Walk from `root`, treating it as sitting at `level`
    pub async fn walk(mut self, root: &EntityId, level: u8) -> Result<usize, SoftDeleteError> {
        if !self.uow.is_tracked(root) {
            return Err(SoftDeleteError::EntityNotTracked(root.clone()));
        }

        debug_log!("[CASCADE_WALKER] {:?} from {} at level {}", self.mode, root, level);
        self.visit(root.clone(), level).await?;
        debug_log!("[CASCADE_WALKER] {:?} from {} found {}", self.mode, root, self.found);

        Ok(self.found)
    }

    fn visit(&mut self, id: EntityId, level: u8) -> BoxFuture<'_, Result<(), SoftDeleteError>> {
        Box::pin(async move {
            let participant = self
                .uow
                .entity(&id)
                .is_some_and(|entity| self.config.is_participant(entity));
            if !participant || !self.visited.insert(id.clone()) {
                return Ok(());
            }

            if !self.apply(&id, level)? {
                return Ok(());
            }
            self.found += 1;

            for edge in self.cascade_edges(&id) {
                let child_level = level
                    .checked_add(1)
                    .ok_or_else(|| SoftDeleteError::CascadeTooDeep(id.clone()))?;
                let look_for = self.mode.level_to_look_for(child_level);
                let targets = self.loader.load(&mut *self.uow, &id, &edge, look_for).await?;
                for target in targets {
                    self.visit(target, child_level).await?;
                }
            }

            Ok(())
        })
    }

    /// Dependent edges a cascading delete follows and that have a navigation to walk
    fn cascade_edges(&self, id: &EntityId) -> Vec<RelationshipEdge> {
        self.uow
            .metadata()
            .dependent_edges(id.entity_type())
            .into_iter()
            .filter(|edge| edge.is_cascade_to_dependent() && edge.navigation.is_some())
            .collect()
    }

    /// Apply the mode's rule, returning false when the node and its subtree are left alone
    fn apply(&mut self, id: &EntityId, level: u8) -> Result<bool, SoftDeleteError> {
        let current = {
            let entity = self
                .uow
                .entity(id)
                .ok_or_else(|| SoftDeleteError::EntityNotTracked(id.clone()))?;
            self.config.read_value(entity)?
        };

        match self.mode {
            WalkMode::SoftDelete => {
                if current != 0 {
                    return Ok(false);
                }
                self.write_level(id, level)?;
            }
            WalkMode::ResetSoftDelete => {
                if current != level {
                    return Ok(false);
                }
                self.write_level(id, 0)?;
            }
            WalkMode::CheckWillDelete => {
                if current == 0 {
                    return Ok(false);
                }
            }
            WalkMode::HardDeleteSoftDeleted => {
                if current == 0 {
                    return Ok(false);
                }
                self.uow.remove(id)?;
            }
        }

        trace_log!("[CASCADE_WALKER] {:?} {} (level {} at depth {})", self.mode, id, current, level);
        Ok(true)
    }

    fn write_level(&mut self, id: &EntityId, level: u8) -> Result<(), SoftDeleteError> {
        let entity = self
            .uow
            .entity_mut(id)
            .ok_or_else(|| SoftDeleteError::EntityNotTracked(id.clone()))?;
        self.config.write_value(entity, level)
    }
}
