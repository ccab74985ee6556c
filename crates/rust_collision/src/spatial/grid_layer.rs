//! Chunked spatial hash grid for one gameplay layer
//!
//! Based on Game Engine Architecture 3rd Edition, Section 13.3.2:
//! "Spatial partitioning schemes... allow us to quickly cull out pairs of
//! objects that cannot possibly be colliding."
//!
//! World space is cut into fixed-size chunks. A collider is listed in every
//! chunk its bounding box touches, so any two colliders that touch share at
//! least one chunk.

use std::collections::{HashMap, HashSet};

use crate::consts::CHUNK_SIZE;
use crate::foundation::math::{Aabb, WorldPosition};
use crate::physics::ColliderId;

/// Integer coordinate of one grid chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    /// Chunk column
    pub x: i32,
    /// Chunk row
    pub y: i32,
}

impl CellKey {
    /// Create a key from chunk coordinates
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Spatial hash for a single layer
#[derive(Debug, Clone)]
pub struct GridLayer {
    chunk_width: f32,
    chunk_height: f32,
    cells: HashMap<CellKey, Vec<ColliderId>>,
}

impl GridLayer {
    /// Create an empty layer with the given chunk size
    pub fn new(chunk_width: f32, chunk_height: f32) -> Self {
        Self {
            chunk_width,
            chunk_height,
            cells: HashMap::new(),
        }
    }

    /// Chunk width in world units
    pub fn chunk_width(&self) -> f32 {
        self.chunk_width
    }

    /// Chunk height in world units
    pub fn chunk_height(&self) -> f32 {
        self.chunk_height
    }

    /// Chunk containing a world position
    #[allow(clippy::cast_possible_truncation)]
    pub fn cell_of(&self, position: WorldPosition) -> CellKey {
        CellKey::new(
            (position.x / self.chunk_width).floor() as i32,
            (position.y / self.chunk_height).floor() as i32,
        )
    }

    /// Every chunk touched by a box, column by column
    pub fn cells_covering(&self, aabb: &Aabb) -> impl Iterator<Item = CellKey> {
        let low = self.cell_of(aabb.min);
        let high = self.cell_of(aabb.max);
        (low.x..=high.x).flat_map(move |x| (low.y..=high.y).map(move |y| CellKey::new(x, y)))
    }

    /// Add a collider to every chunk its box touches
    pub fn insert(&mut self, id: ColliderId, aabb: &Aabb) {
        for key in self.cells_covering(aabb).collect::<Vec<_>>() {
            let cell = self.cells.entry(key).or_default();
            if !cell.contains(&id) {
                cell.push(id);
            }
        }
    }

    /// Remove a collider from every chunk the given box touches
    ///
    /// Chunks left empty are dropped so the map only grows with occupied space.
    pub fn remove(&mut self, id: ColliderId, aabb: &Aabb) {
        for key in self.cells_covering(aabb).collect::<Vec<_>>() {
            if let Some(cell) = self.cells.get_mut(&key) {
                cell.retain(|&other| other != id);
                if cell.is_empty() {
                    self.cells.remove(&key);
                }
            }
        }
    }

    /// Move a collider from the chunks of `previous` to the chunks of `current`
    pub fn relocate(&mut self, id: ColliderId, previous: &Aabb, current: &Aabb) {
        self.remove(id, previous);
        self.insert(id, current);
    }

    /// Colliders listed in one chunk
    pub fn cell(&self, key: CellKey) -> &[ColliderId] {
        self.cells.get(&key).map_or(&[], Vec::as_slice)
    }

    /// Unique colliders listed in any chunk touched by a box
    ///
    /// This is a broad-phase answer: the colliders share a chunk with the box,
    /// they do not necessarily touch it.
    pub fn query(&self, aabb: &Aabb) -> Vec<ColliderId> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();
        for key in self.cells_covering(aabb) {
            for &id in self.cell(key) {
                if seen.insert(id) {
                    found.push(id);
                }
            }
        }
        found
    }

    /// Number of occupied chunks
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Check whether a collider is listed anywhere in this layer
    pub fn contains(&self, id: ColliderId) -> bool {
        self.cells.values().any(|cell| cell.contains(&id))
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

impl Default for GridLayer {
    fn default() -> Self {
        Self::new(CHUNK_SIZE, CHUNK_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn ids(count: usize) -> Vec<ColliderId> {
        let mut map: SlotMap<ColliderId, ()> = SlotMap::with_key();
        (0..count).map(|_| map.insert(())).collect()
    }

    fn square(x: f32, y: f32, size: f32) -> Aabb {
        Aabb::from_center(WorldPosition::new(x, y), size, size)
    }

    #[test]
    fn test_cell_of_floors_negative_coordinates() {
        let layer = GridLayer::default();
        assert_eq!(layer.cell_of(WorldPosition::new(0.0, 0.0)), CellKey::new(0, 0));
        assert_eq!(layer.cell_of(WorldPosition::new(63.9, 64.0)), CellKey::new(0, 1));
        assert_eq!(layer.cell_of(WorldPosition::new(-0.1, -64.0)), CellKey::new(-1, -1));
        assert_eq!(layer.cell_of(WorldPosition::new(-64.1, 200.0)), CellKey::new(-2, 3));
    }

    #[test]
    fn test_box_spanning_chunks() {
        let layer = GridLayer::default();
        // x: -16..16 -> columns -1, 0 ; y: 48..80 -> rows 0, 1
        let cells: Vec<_> = layer.cells_covering(&square(0.0, 64.0, 32.0)).collect();

        assert_eq!(
            cells,
            vec![
                CellKey::new(-1, 0),
                CellKey::new(-1, 1),
                CellKey::new(0, 0),
                CellKey::new(0, 1),
            ]
        );
    }

    #[test]
    fn test_insert_lists_collider_once_per_chunk() {
        let mut layer = GridLayer::default();
        let id = ids(1)[0];
        let aabb = square(0.0, 0.0, 32.0);

        layer.insert(id, &aabb);
        layer.insert(id, &aabb);

        assert_eq!(layer.occupied_cells(), 4);
        assert_eq!(layer.cell(CellKey::new(0, 0)), &[id]);
        assert_eq!(layer.query(&aabb), vec![id]);
    }

    #[test]
    fn test_relocate_clears_old_chunks() {
        let mut layer = GridLayer::default();
        let id = ids(1)[0];
        let before = square(10.0, 10.0, 8.0);
        let after = square(500.0, 10.0, 8.0);

        layer.insert(id, &before);
        layer.relocate(id, &before, &after);

        assert!(layer.query(&before).is_empty());
        assert_eq!(layer.query(&after), vec![id]);
        assert_eq!(layer.occupied_cells(), 1);
    }

    #[test]
    fn test_remove_keeps_neighbours() {
        let mut layer = GridLayer::default();
        let all = ids(2);
        let aabb = square(20.0, 20.0, 8.0);

        layer.insert(all[0], &aabb);
        layer.insert(all[1], &aabb);
        layer.remove(all[0], &aabb);

        assert!(!layer.contains(all[0]));
        assert_eq!(layer.query(&aabb), vec![all[1]]);
    }

    #[test]
    fn test_query_deduplicates_across_chunks() {
        let mut layer = GridLayer::default();
        let id = ids(1)[0];
        let big = square(0.0, 0.0, 300.0);

        layer.insert(id, &big);

        assert!(layer.occupied_cells() > 1);
        assert_eq!(layer.query(&big), vec![id]);
    }
}
