//! Arena module: the world set.
//!
//! The Arena is the container for every live entity of a game session. It
//! provides:
//! - Entity storage with deterministic iteration order (`BTreeMap`)
//! - Entity lifecycle management (spawn, prune)
//! - Role queries used by the update engine (hostiles, projectiles, pickups)
//!
//! # Ordering
//!
//! Entity IDs are handed out monotonically and stored in a `BTreeMap`, so
//! iteration order is insertion order. That order is the draw order and the
//! order in which collision pairs are checked.
//!
//! # Example
//!
//! ```
//! use starfall_core::arena::Arena;
//! use starfall_core::entity::{EntityInner, EnemyState};
//! use glam::Vec2;
//!
//! let mut arena = Arena::new();
//! let first = arena.spawn(Vec2::new(0.0, 0.0), EntityInner::Enemy(EnemyState::grunt()));
//! let second = arena.spawn(Vec2::new(98.0, 0.0), EntityInner::Enemy(EnemyState::grunt()));
//!
//! let ids: Vec<_> = arena.entity_ids_sorted().collect();
//! assert_eq!(ids, vec![first, second]);
//! assert!(arena.has_live_hostiles());
//! ```

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId, EntityInner, EntityTag};

/// Container of all entities in a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    /// Monotonically increasing entity ID counter.
    next_id: u64,
    /// Entity storage, iterated in ID (= insertion) order.
    entities: BTreeMap<EntityId, Entity>,
}

impl Arena {
    /// Creates a new empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entities: BTreeMap::new(),
        }
    }

    /// Spawns a new entity at `position` and returns its ID.
    ///
    /// The sprite size is taken from the kind of `inner`.
    pub fn spawn(&mut self, position: Vec2, inner: EntityInner) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, Entity::new(id, position, inner));
        id
    }

    /// Returns a reference to an entity by ID.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns a mutable reference to an entity by ID.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Returns `true` if `id` exists and has not been marked dead.
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(|e| !e.is_dead())
    }

    /// Returns an iterator over entity IDs in insertion order.
    pub fn entity_ids_sorted(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    /// Returns an iterator over entities in insertion order.
    pub fn entities_sorted(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Returns an iterator over mutable entities in insertion order.
    pub fn entities_sorted_mut(&mut self) -> impl Iterator<Item = &mut Entity> + '_ {
        self.entities.values_mut()
    }

    /// Collects the IDs of every entity whose tag satisfies `filter`,
    /// dead or alive, in insertion order.
    #[must_use]
    pub fn ids_where(&self, filter: impl Fn(EntityTag) -> bool) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| filter(e.tag()))
            .map(Entity::id)
            .collect()
    }

    /// IDs of all entities of one kind, in insertion order.
    #[must_use]
    pub fn ids_of(&self, tag: EntityTag) -> Vec<EntityId> {
        self.ids_where(|t| t == tag)
    }

    /// Number of enemies and bosses not yet marked dead.
    #[must_use]
    pub fn live_hostile_count(&self) -> usize {
        self.entities
            .values()
            .filter(|e| e.is_hostile() && !e.is_dead())
            .count()
    }

    /// Returns `true` while at least one enemy or boss is alive.
    #[must_use]
    pub fn has_live_hostiles(&self) -> bool {
        self.live_hostile_count() > 0
    }

    /// Removes every entity marked dead and returns their IDs in order.
    pub fn prune_dead(&mut self) -> Vec<EntityId> {
        let dead: Vec<EntityId> = self
            .entities
            .values()
            .filter(|e| e.is_dead())
            .map(Entity::id)
            .collect();
        for id in &dead {
            self.entities.remove(id);
        }
        dead
    }

    /// Returns the number of entities in the arena.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the arena has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
