//! Spatial partitioning data structures
//!
//! Provides the chunked hash grid used to find collision candidates near a
//! moving collider.

mod grid_layer;

pub use grid_layer::{CellKey, GridLayer};
