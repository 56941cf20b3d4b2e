//! Component structs carried by entities.
//!
//! Every entity owns a [`Body`] (position, size, liveness). The
//! per-type state lives in the structs below and is stored inside
//! [`EntityInner`](super::EntityInner).

use glam::Vec2;
use serde::{Deserialize, Serialize};

// =============================================================================
// Geometry
// =============================================================================

/// Sprite dimensions in screen units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent
    pub width: u32,
    /// Vertical extent
    pub height: u32,
}

impl Size {
    /// Creates a new size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width as a float, for position arithmetic.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn w(self) -> f32 {
        self.width as f32
    }

    /// Height as a float, for position arithmetic.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn h(self) -> f32 {
        self.height as f32
    }
}

/// Axis-aligned rectangle in screen space (y grows downward).
///
/// # Example
///
/// ```
/// use starfall_core::entity::components::Rect;
///
/// let a = Rect::new(0.0, 0.0, 10.0, 10.0);
/// let b = Rect::new(10.0, 10.0, 5.0, 5.0);
/// // Touching edges count as overlap.
/// assert!(a.intersects(&b));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top edge (`y`)
    pub top: f32,
    /// Left edge (`x`)
    pub left: f32,
    /// Bottom edge (`y + height`)
    pub bottom: f32,
    /// Right edge (`x + width`)
    pub right: f32,
}

impl Rect {
    /// Builds a rectangle from its top-left corner and extents.
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            top: y,
            left: x,
            bottom: y + height,
            right: x + width,
        }
    }

    /// Returns `true` unless the rectangles are separated on some side.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        !(other.left > self.right
            || other.right < self.left
            || other.top > self.bottom
            || other.bottom < self.top)
    }
}

/// State shared by every entity: where it is, how big it is, and whether
/// it has been marked for removal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub position: Vec2,
    /// Sprite dimensions
    pub size: Size,
    /// Set once the entity should be pruned at the end of the tick
    pub dead: bool,
}

impl Body {
    /// Creates a live body at `position`.
    #[must_use]
    pub const fn new(position: Vec2, size: Size) -> Self {
        Self {
            position,
            size,
            dead: false,
        }
    }

    /// Returns the collision rectangle of this body.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.size.w(),
            self.size.h(),
        )
    }
}

// =============================================================================
// Per-type state
// =============================================================================

/// Player ship state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroState {
    /// Remaining lives. Reaching 0 ends the game.
    pub life: u32,
    /// Score, never decreases.
    pub points: u64,
    /// Remaining fire cooldown in milliseconds (0 means ready).
    pub cooldown_ms: u32,
    /// Whether incoming damage is currently ignored.
    pub shielded: bool,
    /// Ticks of shield left.
    pub shield_timer: u32,
}

impl HeroState {
    /// Creates a hero with the given number of lives.
    #[must_use]
    pub const fn new(life: u32) -> Self {
        Self {
            life,
            points: 0,
            cooldown_ms: 0,
            shielded: false,
            shield_timer: 0,
        }
    }

    /// Returns `true` if the fire cooldown has fully decayed.
    #[must_use]
    pub const fn can_fire(&self) -> bool {
        self.cooldown_ms == 0
    }

    /// Removes one life unless shielded.
    ///
    /// Returns `true` exactly when this call took the last life.
    pub fn decrement_life(&mut self) -> bool {
        if self.shielded || self.life == 0 {
            return false;
        }
        self.life -= 1;
        self.life == 0
    }

    /// Adds to the score.
    pub fn add_points(&mut self, value: u64) {
        self.points = self.points.saturating_add(value);
    }

    /// Turns the shield on, restarting its timer.
    pub fn raise_shield(&mut self, ticks: u32) {
        self.shielded = true;
        self.shield_timer = ticks;
    }

    /// Counts the shield down by one tick and drops it when expired.
    pub fn update_shield(&mut self) {
        if self.shielded {
            self.shield_timer = self.shield_timer.saturating_sub(1);
            if self.shield_timer == 0 {
                self.shielded = false;
            }
        }
    }

    /// Lowers the cooldown by `step` milliseconds.
    ///
    /// Returns `true` once the cooldown has reached zero.
    pub fn decay_cooldown(&mut self, step: u32) -> bool {
        self.cooldown_ms = self.cooldown_ms.saturating_sub(step);
        self.cooldown_ms == 0
    }
}

/// Hit points and descent speed of an enemy or the boss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyState {
    /// Hit points; the entity dies once this is `<= 0`.
    pub hp: i32,
    /// Vertical distance moved per motion step.
    pub speed: f32,
}

impl EnemyState {
    /// Regular wave enemy.
    pub const GRUNT_HP: i32 = 1;
    /// Regular wave enemy speed.
    pub const GRUNT_SPEED: f32 = 5.0;
    /// Final-stage boss.
    pub const BOSS_HP: i32 = 20;
    /// Final-stage boss speed.
    pub const BOSS_SPEED: f32 = 2.0;

    /// Creates a standard wave enemy.
    #[must_use]
    pub const fn grunt() -> Self {
        Self {
            hp: Self::GRUNT_HP,
            speed: Self::GRUNT_SPEED,
        }
    }

    /// Creates the boss.
    #[must_use]
    pub const fn boss() -> Self {
        Self {
            hp: Self::BOSS_HP,
            speed: Self::BOSS_SPEED,
        }
    }
}

/// Area-clear effect state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeteorState {
    /// Set once the strike has zeroed the enemy population.
    pub used: bool,
    /// Frames shown since the strike.
    pub frames_shown: u32,
}

impl MeteorState {
    /// Frames the meteor stays visible after striking.
    pub const LINGER_FRAMES: u32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    mod rect_tests {
        use super::*;

        #[test]
        fn overlapping_rects_intersect() {
            let a = Rect::new(0.0, 0.0, 10.0, 10.0);
            let b = Rect::new(5.0, 5.0, 10.0, 10.0);
            assert!(a.intersects(&b));
            assert!(b.intersects(&a));
        }

        #[test]
        fn separated_rects_do_not_intersect() {
            let a = Rect::new(0.0, 0.0, 10.0, 10.0);
            assert!(!a.intersects(&Rect::new(11.0, 0.0, 5.0, 5.0)));
            assert!(!a.intersects(&Rect::new(0.0, 11.0, 5.0, 5.0)));
            assert!(!a.intersects(&Rect::new(-6.0, 0.0, 5.0, 5.0)));
            assert!(!a.intersects(&Rect::new(0.0, -6.0, 5.0, 5.0)));
        }

        #[test]
        fn contained_rect_intersects() {
            let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
            let inner = Rect::new(40.0, 40.0, 2.0, 2.0);
            assert!(outer.intersects(&inner));
            assert!(inner.intersects(&outer));
        }

        #[test]
        fn body_rect_uses_position_and_size() {
            let body = Body::new(Vec2::new(3.0, 4.0), Size::new(9, 33));
            let rect = body.rect();
            assert_eq!(rect.left, 3.0);
            assert_eq!(rect.top, 4.0);
            assert_eq!(rect.right, 12.0);
            assert_eq!(rect.bottom, 37.0);
        }
    }

    mod hero_tests {
        use super::*;

        #[test]
        fn third_hit_is_fatal() {
            let mut hero = HeroState::new(3);
            assert!(!hero.decrement_life());
            assert!(!hero.decrement_life());
            assert!(hero.decrement_life());
            assert_eq!(hero.life, 0);
        }

        #[test]
        fn life_never_underflows() {
            let mut hero = HeroState::new(1);
            assert!(hero.decrement_life());
            assert!(!hero.decrement_life());
            assert_eq!(hero.life, 0);
        }

        #[test]
        fn shield_blocks_damage() {
            let mut hero = HeroState::new(3);
            hero.raise_shield(50);
            assert!(!hero.decrement_life());
            assert_eq!(hero.life, 3);
        }

        #[test]
        fn shield_expires_after_its_duration() {
            let mut hero = HeroState::new(3);
            hero.raise_shield(2);
            hero.update_shield();
            assert!(hero.shielded);
            hero.update_shield();
            assert!(!hero.shielded);
        }

        #[test]
        fn raising_shield_again_resets_timer() {
            let mut hero = HeroState::new(3);
            hero.raise_shield(50);
            for _ in 0..40 {
                hero.update_shield();
            }
            hero.raise_shield(50);
            assert_eq!(hero.shield_timer, 50);
        }

        #[test]
        fn cooldown_decays_to_zero() {
            let mut hero = HeroState::new(3);
            hero.cooldown_ms = 500;
            assert!(!hero.can_fire());
            for _ in 0..4 {
                assert!(!hero.decay_cooldown(100));
            }
            assert!(hero.decay_cooldown(100));
            assert!(hero.can_fire());
        }
    }

    #[test]
    fn component_structs_are_serializable() {
        let hero = HeroState::new(3);
        let json = serde_json::to_string(&hero).unwrap();
        let back: HeroState = serde_json::from_str(&json).unwrap();
        assert_eq!(hero, back);
    }
}
