//! Layer registry: every spatial layer plus the collider store
//!
//! The registry owns one [`GridLayer`] per configured tag and a distinguished
//! layer holding every collider regardless of its tags. All of it sits behind a
//! single mutex; a move holds that mutex for its whole duration so it always
//! scans a consistent snapshot of every layer.

use std::collections::HashMap;

use log::{debug, trace};
use parking_lot::{Mutex, MutexGuard};
use slotmap::SlotMap;

use crate::config::{CollisionConfig, Config, DEFAULT_PARALLEL_SCAN_THRESHOLD};
use crate::foundation::math::WorldPosition;
use crate::physics::{Collider, ColliderDesc, ColliderId, CollisionError, OwnerId, Tags};
use crate::spatial::GridLayer;

/// Registry contents, reachable through [`LayerRegistry::lock`]
pub struct RegistryState {
    colliders: SlotMap<ColliderId, Collider>,
    layers: HashMap<Tags, GridLayer>,
    all_colliders: GridLayer,
}

impl RegistryState {
    fn new() -> Self {
        Self {
            colliders: SlotMap::with_key(),
            layers: HashMap::new(),
            all_colliders: GridLayer::default(),
        }
    }

    /// Layer indexed by a single tag
    pub fn lookup(&self, tag: Tags) -> Result<&GridLayer, CollisionError> {
        self.layers.get(&tag).ok_or(CollisionError::UnknownLayer(tag))
    }

    /// Layer holding every registered collider
    pub fn all_colliders(&self) -> &GridLayer {
        &self.all_colliders
    }

    /// Registered collider by handle
    pub fn collider(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.get(id)
    }

    /// All registered colliders
    pub fn colliders(&self) -> impl Iterator<Item = &Collider> {
        self.colliders.values()
    }

    /// Tags that have a layer, as one set
    pub fn layer_tags(&self) -> Tags {
        self.layers.keys().fold(Tags::empty(), |acc, &tag| acc | tag)
    }

    /// Number of registered colliders
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Check whether no collider is registered
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    fn add_layer(&mut self, tag: Tags) -> Result<bool, CollisionError> {
        if !tag.is_single() {
            return Err(CollisionError::NotASingleTag(tag));
        }
        if self.layers.contains_key(&tag) {
            return Ok(false);
        }

        let mut layer = GridLayer::default();
        for collider in self.colliders.values().filter(|c| c.tags().contains(tag)) {
            layer.insert(collider.id(), &collider.aabb());
        }
        self.layers.insert(tag, layer);
        Ok(true)
    }

    fn insert(&mut self, desc: ColliderDesc) -> Result<ColliderId, CollisionError> {
        if !desc.has_valid_size() {
            return Err(CollisionError::InvalidDimensions {
                width: desc.width,
                height: desc.height,
            });
        }

        let id = self.colliders.insert_with_key(|id| Collider::from_desc(id, desc));
        let collider = &self.colliders[id];
        let aabb = collider.aabb();

        for tag in collider.tags().singles() {
            match self.layers.get_mut(&tag) {
                Some(layer) => layer.insert(id, &aabb),
                None => trace!("No layer for tag {:?}, indexing {:?} in all-colliders only", tag, id),
            }
        }
        self.all_colliders.insert(id, &aabb);

        Ok(id)
    }

    fn remove(&mut self, id: ColliderId) -> Option<Collider> {
        let collider = self.colliders.remove(id)?;
        let aabb = collider.aabb();

        for tag in collider.tags().singles() {
            if let Some(layer) = self.layers.get_mut(&tag) {
                layer.remove(id, &aabb);
            }
        }
        self.all_colliders.remove(id, &aabb);

        Some(collider)
    }

    /// Write a committed center and move the collider's index entries with it
    pub(crate) fn commit_center(
        &mut self,
        id: ColliderId,
        center: WorldPosition,
    ) -> Result<(), CollisionError> {
        let collider = self
            .colliders
            .get_mut(id)
            .ok_or(CollisionError::ColliderNotFound(id))?;
        let previous = collider.center;
        collider.center = center;
        self.reindex(id, previous)
    }

    /// Move a collider's entries from the chunks of `previous_center` to the
    /// chunks of its current center, in every layer it belongs to
    pub(crate) fn reindex(
        &mut self,
        id: ColliderId,
        previous_center: WorldPosition,
    ) -> Result<(), CollisionError> {
        let collider = self
            .colliders
            .get(id)
            .ok_or(CollisionError::ColliderNotFound(id))?;
        let previous = collider.aabb_at(previous_center);
        let current = collider.aabb();

        for tag in collider.tags().singles() {
            if let Some(layer) = self.layers.get_mut(&tag) {
                layer.relocate(id, &previous, &current);
            }
        }
        self.all_colliders.relocate(id, &previous, &current);

        trace!(
            "Reindexed {:?} from ({}, {}) to ({}, {})",
            id,
            previous_center.x,
            previous_center.y,
            collider.center.x,
            collider.center.y,
        );
        Ok(())
    }
}

/// Thread-safe owner of every collision layer
///
/// Share it between game objects as `Arc<LayerRegistry>`.
pub struct LayerRegistry {
    state: Mutex<RegistryState>,
    parallel_scan_threshold: usize,
}

impl LayerRegistry {
    /// Registry with only the all-colliders layer
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RegistryState::new()),
            parallel_scan_threshold: DEFAULT_PARALLEL_SCAN_THRESHOLD,
        }
    }

    /// Registry with one layer for every tag in `layers`
    pub fn with_layers(layers: Tags) -> Self {
        let mut state = RegistryState::new();
        for tag in layers.singles() {
            state.layers.insert(tag, GridLayer::default());
        }
        Self {
            state: Mutex::new(state),
            parallel_scan_threshold: DEFAULT_PARALLEL_SCAN_THRESHOLD,
        }
    }

    /// Registry built from a configuration
    pub fn from_config(config: &CollisionConfig) -> Self {
        debug!("Creating LayerRegistry with config: {:?}", config);
        Self::with_layers(config.layers).with_parallel_scan_threshold(config.parallel_scan_threshold)
    }

    /// Registry built from a `.toml` or `.ron` configuration file
    pub fn from_config_file(path: &str) -> Result<Self, CollisionError> {
        let config = CollisionConfig::load_from_file(path)?;
        Ok(Self::from_config(&config))
    }

    /// Set the candidate count at which edge tests move to worker threads
    pub fn with_parallel_scan_threshold(mut self, threshold: usize) -> Self {
        self.parallel_scan_threshold = threshold.max(1);
        self
    }

    /// Candidate count at which edge tests move to worker threads
    pub fn parallel_scan_threshold(&self) -> usize {
        self.parallel_scan_threshold
    }

    /// Lock the registry for read-only inspection
    ///
    /// Moves, registrations and removals wait while the guard is alive.
    pub fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock()
    }

    /// Create a layer for a single tag, indexing already registered bearers
    ///
    /// Returns `false` when the layer already existed.
    pub fn add_layer(&self, tag: Tags) -> Result<bool, CollisionError> {
        let added = self.state.lock().add_layer(tag)?;
        if added {
            debug!("Added collision layer {:?}", tag);
        }
        Ok(added)
    }

    /// Register a collider in every layer matching its tags and in the
    /// all-colliders layer
    pub fn register(&self, desc: ColliderDesc) -> Result<ColliderId, CollisionError> {
        let id = self.state.lock().insert(desc)?;
        debug!("Registered collider {:?}", id);
        Ok(id)
    }

    /// Remove a collider from every layer, returning it
    pub fn deregister(&self, id: ColliderId) -> Option<Collider> {
        let removed = self.state.lock().remove(id);
        if removed.is_some() {
            debug!("Deregistered collider {:?}", id);
        }
        removed
    }

    /// Remove every collider belonging to `owner`, returning how many were removed
    pub fn deregister_owner(&self, owner: OwnerId) -> usize {
        let mut state = self.state.lock();
        let owned: Vec<ColliderId> = state
            .colliders()
            .filter(|c| c.owner() == owner)
            .map(Collider::id)
            .collect();
        for &id in &owned {
            state.remove(id);
        }
        debug!("Deregistered {} collider(s) of {:?}", owned.len(), owner);
        owned.len()
    }

    /// Snapshot of a registered collider
    pub fn collider(&self, id: ColliderId) -> Option<Collider> {
        self.state.lock().collider(id).cloned()
    }

    /// Current center of a registered collider
    pub fn position(&self, id: ColliderId) -> Option<WorldPosition> {
        self.state.lock().collider(id).map(Collider::center)
    }

    /// Number of registered colliders
    pub fn len(&self) -> usize {
        self.state.lock().len()
    }

    /// Check whether no collider is registered
    pub fn is_empty(&self) -> bool {
        self.state.lock().is_empty()
    }
}

impl Default for LayerRegistry {
    fn default() -> Self {
        Self::from_config(&CollisionConfig::default())
    }
}
