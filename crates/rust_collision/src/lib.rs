//! # Rust Collision
//!
//! 2D axis-aligned collision and swept movement for game objects.
//!
//! ## Features
//!
//! - **Swept Movement**: Colliders advance toward a target in fixed steps, so
//!   nothing can be tunnelled through regardless of the travel distance
//! - **Layered Spatial Hash**: One chunked hash grid per gameplay tag plus a
//!   grid holding every collider
//! - **Blocking and Trigger Collisions**: Tag-based block/ignore filtering with
//!   exactly-once enter/exit notifications
//! - **Thread Safe**: Moves may be issued from many threads; each move sees a
//!   consistent snapshot of every layer
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use rust_collision::prelude::*;
//!
//! fn main() -> Result<(), CollisionError> {
//!     let registry = Arc::new(LayerRegistry::with_layers(Tags::ENVIRONMENT));
//!
//!     let _wall = Collidable::new(
//!         Arc::clone(&registry),
//!         ColliderDesc::new(WorldPosition::new(150.0, 0.0), 128.0, 128.0)
//!             .with_tags(Tags::ENVIRONMENT),
//!     )?;
//!
//!     let player = Collidable::new(
//!         Arc::clone(&registry),
//!         ColliderDesc::new(WorldPosition::origin(), 32.0, 32.0)
//!             .with_block(Tags::ENVIRONMENT)
//!             .with_handler(FnHandler::new(
//!                 |other| println!("touched {:?}", other.tags()),
//!                 |other| println!("left {:?}", other.tags()),
//!             )),
//!     )?;
//!
//!     let stopped_at = player.move_to(WorldPosition::new(250.0, 0.0))?;
//!     assert_eq!(stopped_at.x, 70.0);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod physics;
pub mod spatial;

/// Compile-time tuning constants shared by the index and the movement engine
pub mod consts {
    /// Length of one discretized movement step, in world units
    pub const RAY_STEP: f32 = 1.0;

    /// Width and height of one spatial hash cell, in world units
    pub const CHUNK_SIZE: f32 = 64.0;

    /// Candidate count per step at which density is reported as abnormal
    pub const MAX_CANDIDATES_PER_STEP: usize = 100;
}

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        config::{CollisionConfig, Config, ConfigError},
        foundation::math::{Aabb, Vec2, WorldPosition},
        physics::{
            Collidable, Collider, ColliderDesc, ColliderId, CollisionError, CollisionHandler,
            FnHandler, LayerRegistry, MoveOutcome, MoveStatus, OwnerId, Tags,
        },
        spatial::{CellKey, GridLayer},
    };
}
