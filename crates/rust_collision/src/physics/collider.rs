//! Rectangular collider entity and its owner-supplied collision handler

use std::fmt;
use std::sync::Arc;

use slotmap::new_key_type;

use crate::foundation::math::{Aabb, WorldPosition};
use crate::physics::collision_layers::Tags;

new_key_type! {
    /// Stable handle of a collider registered in a [`crate::physics::LayerRegistry`]
    pub struct ColliderId;
}

/// Opaque identity of the game object owning a collider
///
/// Never dereferenced; only compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct OwnerId(pub u64);

/// Receiver of trigger notifications for one collider
///
/// Handlers run on the thread that issued the move, after the registry lock has
/// been released, so they may call back into the registry.
pub trait CollisionHandler: Send + Sync {
    /// Called when `other` starts touching this collider
    fn on_enter(&self, other: &Collider) {
        let _ = other;
    }

    /// Called when `other` stops touching this collider
    fn on_exit(&self, other: &Collider) {
        let _ = other;
    }
}

/// Handler that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHandler;

impl CollisionHandler for NoopHandler {}

/// Adapter turning a pair of closures into a [`CollisionHandler`]
pub struct FnHandler<E, X> {
    enter: E,
    exit: X,
}

impl<E, X> FnHandler<E, X>
where
    E: Fn(&Collider) + Send + Sync,
    X: Fn(&Collider) + Send + Sync,
{
    /// Wrap an enter and an exit closure
    pub fn new(enter: E, exit: X) -> Self {
        Self { enter, exit }
    }
}

impl<E, X> CollisionHandler for FnHandler<E, X>
where
    E: Fn(&Collider) + Send + Sync,
    X: Fn(&Collider) + Send + Sync,
{
    fn on_enter(&self, other: &Collider) {
        (self.enter)(other);
    }

    fn on_exit(&self, other: &Collider) {
        (self.exit)(other);
    }
}

/// Axis-aligned rectangular collider
///
/// Instances handed to handlers are snapshots taken when the move that
/// produced the event finished.
#[derive(Clone)]
pub struct Collider {
    pub(crate) id: ColliderId,
    pub(crate) center: WorldPosition,
    width: f32,
    height: f32,
    tags: Tags,
    block: Tags,
    ignore: Tags,
    owner: OwnerId,
    pub(crate) handler: Arc<dyn CollisionHandler>,
}

impl Collider {
    pub(crate) fn from_desc(id: ColliderId, desc: ColliderDesc) -> Self {
        Self {
            id,
            center: desc.center,
            width: desc.width,
            height: desc.height,
            tags: desc.tags,
            block: desc.block,
            ignore: desc.ignore,
            owner: desc.owner,
            handler: desc.handler,
        }
    }

    /// Registry handle of this collider
    pub fn id(&self) -> ColliderId {
        self.id
    }

    /// Current center in world units
    pub fn center(&self) -> WorldPosition {
        self.center
    }

    /// Full width
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Full height
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Tags deciding which layers this collider is indexed in
    pub fn tags(&self) -> Tags {
        self.tags
    }

    /// Layers that stop this collider when it moves
    pub fn block(&self) -> Tags {
        self.block
    }

    /// Tags whose bearers never produce notifications for this collider's moves
    pub fn ignore(&self) -> Tags {
        self.ignore
    }

    /// Owning game object
    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Bounding box at the current center
    pub fn aabb(&self) -> Aabb {
        self.aabb_at(self.center)
    }

    /// Bounding box this collider would have if centered at `center`
    pub fn aabb_at(&self, center: WorldPosition) -> Aabb {
        Aabb::from_center(center, self.width, self.height)
    }

    /// Value comparison by center, size, tags and owner
    ///
    /// Two distinct colliders stacked on the same spot with the same owner compare
    /// equal here, so the registry never uses this for identity. Kept for
    /// diagnostics and tests.
    #[allow(clippy::float_cmp)]
    pub fn same_shape_as(&self, other: &Self) -> bool {
        self.center == other.center
            && self.width == other.width
            && self.height == other.height
            && self.tags == other.tags
            && self.owner == other.owner
    }
}

impl fmt::Debug for Collider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collider")
            .field("id", &self.id)
            .field("center", &(self.center.x, self.center.y))
            .field("width", &self.width)
            .field("height", &self.height)
            .field("tags", &self.tags)
            .field("block", &self.block)
            .field("ignore", &self.ignore)
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

/// Construction parameters for a collider
///
/// Everything except the center is fixed once the collider is registered.
#[derive(Clone)]
pub struct ColliderDesc {
    /// Initial center
    pub center: WorldPosition,
    /// Full width (> 0)
    pub width: f32,
    /// Full height (> 0)
    pub height: f32,
    /// Layers this collider is indexed in
    pub tags: Tags,
    /// Layers that stop this collider
    pub block: Tags,
    /// Tags excluded from trigger notifications
    pub ignore: Tags,
    /// Owning game object
    pub owner: OwnerId,
    /// Enter/exit receiver
    pub handler: Arc<dyn CollisionHandler>,
}

impl ColliderDesc {
    /// Untagged, non-blocking collider with a no-op handler
    pub fn new(center: WorldPosition, width: f32, height: f32) -> Self {
        Self {
            center,
            width,
            height,
            tags: Tags::empty(),
            block: Tags::empty(),
            ignore: Tags::empty(),
            owner: OwnerId::default(),
            handler: Arc::new(NoopHandler),
        }
    }

    /// Set the tags
    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    /// Set the blocking layers
    pub fn with_block(mut self, block: Tags) -> Self {
        self.block = block;
        self
    }

    /// Set the ignored tags
    pub fn with_ignore(mut self, ignore: Tags) -> Self {
        self.ignore = ignore;
        self
    }

    /// Set the owner identity
    pub fn with_owner(mut self, owner: OwnerId) -> Self {
        self.owner = owner;
        self
    }

    /// Set the collision handler
    pub fn with_handler(mut self, handler: impl CollisionHandler + 'static) -> Self {
        self.handler = Arc::new(handler);
        self
    }

    /// Set a collision handler shared with other colliders or the test harness
    pub fn with_shared_handler(mut self, handler: Arc<dyn CollisionHandler>) -> Self {
        self.handler = handler;
        self
    }

    pub(crate) fn has_valid_size(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl fmt::Debug for ColliderDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColliderDesc")
            .field("center", &(self.center.x, self.center.y))
            .field("width", &self.width)
            .field("height", &self.height)
            .field("tags", &self.tags)
            .field("block", &self.block)
            .field("ignore", &self.ignore)
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}
