//! Gameplay tags used to partition colliders into layers
//!
//! Based on Game Engine Architecture 3rd Edition, Section 13.3.8:
//! "Most games need to filter collisions... This is typically done via
//! collision layers or groups."
//!
//! A single bit is one tag. A collider's `tags` decide which layers it is
//! indexed in, its `block` set names the layers that stop it, and its `ignore`
//! set names tags it never receives trigger notifications for.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Set of gameplay tags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Tags: u32 {
        // Standard game entity tags (bits 0-7)
        /// Player character
        const PLAYER = 1 << 0;
        /// Enemy character
        const ENEMY = 1 << 1;
        /// Projectiles (bullets, missiles, etc.)
        const PROJECTILE = 1 << 2;
        /// Static environment geometry
        const ENVIRONMENT = 1 << 3;
        /// Trigger volumes (no physical response)
        const TRIGGER = 1 << 4;
        /// Debris and small physics objects
        const DEBRIS = 1 << 5;
        /// Interactive props
        const PROP = 1 << 6;
        /// Pickups and collectibles
        const PICKUP = 1 << 7;

        // User-defined custom tags (bits 8-15)
        /// Custom tag 8
        const CUSTOM_8 = 1 << 8;
        /// Custom tag 9
        const CUSTOM_9 = 1 << 9;
        /// Custom tag 10
        const CUSTOM_10 = 1 << 10;
        /// Custom tag 11
        const CUSTOM_11 = 1 << 11;
        /// Custom tag 12
        const CUSTOM_12 = 1 << 12;
        /// Custom tag 13
        const CUSTOM_13 = 1 << 13;
        /// Custom tag 14
        const CUSTOM_14 = 1 << 14;
        /// Custom tag 15
        const CUSTOM_15 = 1 << 15;
    }
}

impl Tags {
    /// Check whether this set holds exactly one tag
    pub const fn is_single(self) -> bool {
        self.bits().count_ones() == 1
    }

    /// Iterate over the individual tags in this set, lowest bit first
    pub fn singles(self) -> impl Iterator<Item = Tags> {
        self.iter()
    }

    /// Check whether a collider bearing `tags` is excluded by this ignore set
    ///
    /// # Example
    /// ```
    /// use rust_collision::physics::Tags;
    ///
    /// let ignore = Tags::PICKUP | Tags::DEBRIS;
    /// assert!(ignore.excludes(Tags::PICKUP | Tags::TRIGGER));
    /// assert!(!ignore.excludes(Tags::ENEMY));
    /// ```
    pub const fn excludes(self, tags: Tags) -> bool {
        self.intersects(tags)
    }
}

impl Default for Tags {
    fn default() -> Self {
        Self::empty()
    }
}
