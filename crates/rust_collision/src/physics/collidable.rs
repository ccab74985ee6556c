//! Owner-side handle to a registered collider

use std::sync::Arc;

use log::debug;

use crate::foundation::math::{Vec2, WorldPosition};
use crate::physics::{ColliderDesc, ColliderId, CollisionError, LayerRegistry, MoveOutcome};

/// A collider owned by a game object
///
/// Registers on construction and deregisters when dropped, so the registry
/// never holds colliders whose owner is gone.
pub struct Collidable {
    registry: Arc<LayerRegistry>,
    id: ColliderId,
}

impl Collidable {
    /// Register `desc` in `registry`
    pub fn new(registry: Arc<LayerRegistry>, desc: ColliderDesc) -> Result<Self, CollisionError> {
        let id = registry.register(desc)?;
        Ok(Self { registry, id })
    }

    /// Registry handle
    pub fn id(&self) -> ColliderId {
        self.id
    }

    /// Registry this collider lives in
    pub fn registry(&self) -> &Arc<LayerRegistry> {
        &self.registry
    }

    /// Current center
    pub fn position(&self) -> Result<WorldPosition, CollisionError> {
        self.registry
            .position(self.id)
            .ok_or(CollisionError::ColliderNotFound(self.id))
    }

    /// Move toward `target`, returning the committed center
    pub fn move_to(&self, target: WorldPosition) -> Result<WorldPosition, CollisionError> {
        Ok(self.registry.move_collider(self.id, target)?.position)
    }

    /// Move by `delta` with full outcome details
    pub fn move_by(&self, delta: Vec2) -> Result<MoveOutcome, CollisionError> {
        self.registry.move_collider_by(self.id, delta)
    }

    /// Move toward `target`, sliding along blocking walls
    pub fn slide_to(&self, target: WorldPosition) -> Result<MoveOutcome, CollisionError> {
        self.registry.slide_collider(self.id, target)
    }
}

impl Drop for Collidable {
    fn drop(&mut self) {
        if self.registry.deregister(self.id).is_none() {
            debug!("Collider {:?} was already removed", self.id);
        }
    }
}
