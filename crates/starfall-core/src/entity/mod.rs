//! Entity model for the shooter.
//!
//! This module provides the closed set of entity kinds:
//! - [`EntityId`]: Unique, monotonically assigned identifier
//! - [`EntityTag`]: Kind classification (hero, enemy, boss, projectiles, pickups)
//! - [`EntityInner`]: Type-safe storage for kind-specific state
//! - [`Entity`]: The complete entity container (id + body + inner state)
//!
//! Behaviour is not attached to entities. Motion lives in
//! [`motion`](crate::motion), collision handling in [`engine`](crate::engine)
//! and [`rules`](crate::rules); all of them dispatch on the tag.
//!
//! # Example
//!
//! ```
//! use starfall_core::entity::{Entity, EntityId, EntityInner, EntityTag};
//! use starfall_core::entity::components::HeroState;
//! use glam::Vec2;
//!
//! let hero = Entity::new(
//!     EntityId::new(7),
//!     Vec2::new(100.0, 500.0),
//!     EntityInner::Hero(HeroState::new(3)),
//! );
//!
//! assert_eq!(hero.id().as_u64(), 7);
//! assert_eq!(hero.tag(), EntityTag::Hero);
//! assert_eq!(hero.body().size.width, 99);
//! ```

pub mod components;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use components::{Body, EnemyState, HeroState, MeteorState, Rect, Size};

/// Unique identifier for an entity.
///
/// IDs are handed out in increasing order by the [`Arena`](crate::arena::Arena),
/// so ordering by ID is the same as ordering by insertion.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Entity kind.
///
/// The tag fixes the sprite size and the motion pattern of an entity, and
/// decides which collision groups it belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// Player ship
    Hero,
    /// Wave enemy
    Enemy,
    /// Final-stage boss
    Boss,
    /// Hero projectile, travels up
    Laser,
    /// Boss projectile, travels down
    EnemyLaser,
    /// Shield pickup dropped by defeated enemies
    ShieldItem,
    /// Area-clear effect
    Meteor,
}

impl EntityTag {
    /// Sprite size for this kind.
    #[must_use]
    pub const fn size(self) -> Size {
        match self {
            Self::Hero => Size::new(99, 75),
            Self::Enemy => Size::new(98, 50),
            Self::Boss => Size::new(120, 120),
            Self::Laser | Self::EnemyLaser => Size::new(9, 33),
            Self::ShieldItem => Size::new(30, 30),
            Self::Meteor => Size::new(128, 128),
        }
    }

    /// Returns `true` for kinds that count toward the enemy population.
    #[must_use]
    pub const fn is_hostile(self) -> bool {
        matches!(self, Self::Enemy | Self::Boss)
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hero => write!(f, "Hero"),
            Self::Enemy => write!(f, "Enemy"),
            Self::Boss => write!(f, "Boss"),
            Self::Laser => write!(f, "Laser"),
            Self::EnemyLaser => write!(f, "EnemyLaser"),
            Self::ShieldItem => write!(f, "ShieldItem"),
            Self::Meteor => write!(f, "Meteor"),
        }
    }
}

/// Kind-specific entity state.
///
/// Projectiles and pickups carry no state beyond their [`Body`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityInner {
    /// Player ship state
    Hero(HeroState),
    /// Wave enemy state
    Enemy(EnemyState),
    /// Boss state (same shape as an enemy)
    Boss(EnemyState),
    /// Hero projectile
    Laser,
    /// Boss projectile
    EnemyLaser,
    /// Shield pickup
    ShieldItem,
    /// Area-clear effect state
    Meteor(MeteorState),
}

impl EntityInner {
    /// Returns the corresponding `EntityTag` for this inner storage.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        match self {
            Self::Hero(_) => EntityTag::Hero,
            Self::Enemy(_) => EntityTag::Enemy,
            Self::Boss(_) => EntityTag::Boss,
            Self::Laser => EntityTag::Laser,
            Self::EnemyLaser => EntityTag::EnemyLaser,
            Self::ShieldItem => EntityTag::ShieldItem,
            Self::Meteor(_) => EntityTag::Meteor,
        }
    }
}

/// A complete entity: identity, body and kind-specific state.
///
/// The tag is derived from the inner storage, so the two can never
/// disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    body: Body,
    inner: EntityInner,
}

impl Entity {
    /// Creates a live entity at `position`, sized for its kind.
    #[must_use]
    pub fn new(id: EntityId, position: Vec2, inner: EntityInner) -> Self {
        let size = inner.tag().size();
        Self {
            id,
            body: Body::new(position, size),
            inner,
        }
    }

    /// Returns the entity's unique identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity's kind.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        self.inner.tag()
    }

    /// Returns the shared body state.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Returns the shared body state mutably.
    #[must_use]
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Returns the kind-specific state.
    #[must_use]
    pub const fn inner(&self) -> &EntityInner {
        &self.inner
    }

    /// Returns the kind-specific state mutably.
    #[must_use]
    pub fn inner_mut(&mut self) -> &mut EntityInner {
        &mut self.inner
    }

    /// Top-left corner.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.body.position
    }

    /// Collision rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    /// Returns `true` once the entity has been marked for removal.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.body.dead
    }

    /// Marks the entity for removal at the end of the tick.
    pub fn mark_dead(&mut self) {
        self.body.dead = true;
    }

    /// Returns `true` for enemies and the boss.
    #[must_use]
    pub const fn is_hostile(&self) -> bool {
        self.tag().is_hostile()
    }

    /// Returns the hero state, if this is the hero.
    #[must_use]
    pub const fn as_hero(&self) -> Option<&HeroState> {
        match &self.inner {
            EntityInner::Hero(hero) => Some(hero),
            _ => None,
        }
    }

    /// Returns the hero state mutably, if this is the hero.
    #[must_use]
    pub fn as_hero_mut(&mut self) -> Option<&mut HeroState> {
        match &mut self.inner {
            EntityInner::Hero(hero) => Some(hero),
            _ => None,
        }
    }

    /// Returns the enemy state for enemies and the boss.
    #[must_use]
    pub const fn as_enemy(&self) -> Option<&EnemyState> {
        match &self.inner {
            EntityInner::Enemy(enemy) | EntityInner::Boss(enemy) => Some(enemy),
            _ => None,
        }
    }

    /// Returns the enemy state mutably for enemies and the boss.
    #[must_use]
    pub fn as_enemy_mut(&mut self) -> Option<&mut EnemyState> {
        match &mut self.inner {
            EntityInner::Enemy(enemy) | EntityInner::Boss(enemy) => Some(enemy),
            _ => None,
        }
    }

    /// Returns the meteor state, if this is a meteor.
    #[must_use]
    pub const fn as_meteor(&self) -> Option<&MeteorState> {
        match &self.inner {
            EntityInner::Meteor(meteor) => Some(meteor),
            _ => None,
        }
    }

    /// Returns the meteor state mutably, if this is a meteor.
    #[must_use]
    pub fn as_meteor_mut(&mut self) -> Option<&mut MeteorState> {
        match &mut self.inner {
            EntityInner::Meteor(meteor) => Some(meteor),
            _ => None,
        }
    }
}
