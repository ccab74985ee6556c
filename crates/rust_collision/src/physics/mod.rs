//! Physics module for 2D collision detection and swept movement
//!
//! Colliders are axis-aligned rectangles indexed in a chunked spatial hash per
//! tag. Movement is discretized into fixed steps; each step tests the mover's
//! leading faces against nearby colliders to stop it at blocking layers and to
//! raise enter/exit notifications.

pub mod collidable;
pub mod collider;
pub mod collision_layers;
pub mod edges;
pub mod error;
pub mod movement;
pub mod registry;
pub mod scan;

#[cfg(test)]
mod tests;

pub use collidable::Collidable;
pub use collider::{
    Collider,
    ColliderDesc,
    ColliderId,
    CollisionHandler,
    FnHandler,
    NoopHandler,
    OwnerId,
};
pub use collision_layers::Tags;
pub use edges::{
    horizontal_edge_intersects,
    vertical_edge_intersects,
    Contact,
    HorizontalEdge,
    LeadingEdges,
    VerticalEdge,
};
pub use error::CollisionError;
pub use movement::{MoveOutcome, MoveStatus, StepPath};
pub use registry::{LayerRegistry, RegistryState};
pub use scan::scan_candidates;
