//! Collision error types

use thiserror::Error;

use crate::config::ConfigError;
use crate::physics::{ColliderId, Tags};

/// Errors surfaced by the layer registry and the movement engine
///
/// An unknown layer named in a collider's `block` set is not an error for a
/// move: it is logged and that layer is skipped.
#[derive(Error, Debug)]
pub enum CollisionError {
    /// The handle does not name a registered collider
    #[error("Collider not registered: {0:?}")]
    ColliderNotFound(ColliderId),

    /// No layer exists for the tag
    #[error("No layer registered for tag {0:?}")]
    UnknownLayer(Tags),

    /// Layers are keyed by exactly one tag bit
    #[error("Expected a single tag, got {0:?}")]
    NotASingleTag(Tags),

    /// Width and height must be finite and positive
    #[error("Invalid collider dimensions: {width} x {height}")]
    InvalidDimensions {
        /// Requested width
        width: f32,
        /// Requested height
        height: f32,
    },

    /// Move targets must be finite
    #[error("Move target is not finite: ({x}, {y})")]
    NonFiniteTarget {
        /// Target x
        x: f32,
        /// Target y
        y: f32,
    },

    /// A candidate scan worker thread panicked
    #[error("Candidate scan worker panicked")]
    ScanWorkerPanicked,

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
