//! Presentation boundary.
//!
//! The core never draws anything itself. Front ends implement [`Renderer`]
//! and [`AssetCatalog`]; the session hands them entities in draw order and a
//! [`Hud`] snapshot.

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityTag};
use crate::state::{GameState, Outcome};

/// Every image the game can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sprite {
    /// Player ship
    Hero,
    /// Wave enemy
    Enemy,
    /// Boss
    Boss,
    /// Hero laser
    LaserRed,
    /// Enemy laser
    LaserGreen,
    /// Shield pickup and the hero's shield overlay
    Shield,
    /// Area-clear meteor
    Meteor,
    /// HUD life icon
    Life,
    /// Backdrop tile
    Background,
}

impl Sprite {
    /// Every sprite, in load order.
    pub const ALL: [Sprite; 9] = [
        Sprite::Hero,
        Sprite::Enemy,
        Sprite::Boss,
        Sprite::LaserRed,
        Sprite::LaserGreen,
        Sprite::Shield,
        Sprite::Meteor,
        Sprite::Life,
        Sprite::Background,
    ];

    /// Sprite used to draw an entity of kind `tag`.
    #[must_use]
    pub const fn for_tag(tag: EntityTag) -> Self {
        match tag {
            EntityTag::Hero => Self::Hero,
            EntityTag::Enemy => Self::Enemy,
            EntityTag::Boss => Self::Boss,
            EntityTag::Laser => Self::LaserRed,
            EntityTag::EnemyLaser => Self::LaserGreen,
            EntityTag::ShieldItem => Self::Shield,
            EntityTag::Meteor => Self::Meteor,
        }
    }

    /// Conventional asset path relative to the asset root.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Hero => "player.png",
            Self::Enemy => "enemyShip.png",
            Self::Boss => "enemyUFO.png",
            Self::LaserRed => "laserRed.png",
            Self::LaserGreen => "laserGreen.png",
            Self::Shield => "shield.png",
            Self::Meteor => "meteorBig.png",
            Self::Life => "life.png",
            Self::Background => "starBackground.png",
        }
    }
}

/// Source of loaded images. A session refuses to start unless every
/// [`Sprite`] is available.
pub trait AssetCatalog {
    /// Returns `true` if `sprite` is loaded.
    fn has_sprite(&self, sprite: Sprite) -> bool;
}

/// Drawing backend.
pub trait Renderer {
    /// Draws one entity. Called in arena (insertion) order.
    fn draw_entity(&mut self, entity: &Entity, sprite: Sprite);

    /// Draws the overlay (points, lives, stage, charge meter).
    fn draw_hud(&mut self, hud: &Hud);

    /// Draws the win or loss screen.
    fn draw_end_screen(&mut self, outcome: Outcome);
}

/// Read-only snapshot of the overlay values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    /// Remaining lives
    pub life: u32,
    /// Score
    pub points: u64,
    /// Current stage
    pub stage: u32,
    /// Total number of stages
    pub total_stages: u32,
    /// Meteor charge in `[0, 1]`
    pub charge: f32,
    /// Whether the hero shield is up
    pub shielded: bool,
    /// Set once the game has ended
    pub outcome: Option<Outcome>,
}

impl Hud {
    /// Captures the overlay values of `state`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn capture(state: &GameState) -> Self {
        let hero = state.hero();
        let charge_max = state.config().charge_max.max(1);
        Self {
            life: hero.map_or(0, |h| h.life),
            points: hero.map_or(0, |h| h.points),
            stage: state.stage(),
            total_stages: state.config().total_stages,
            charge: state.charge() as f32 / charge_max as f32,
            shielded: hero.is_some_and(|h| h.shielded),
            outcome: state.outcome(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn every_tag_has_a_sprite() {
        let tags = [
            EntityTag::Hero,
            EntityTag::Enemy,
            EntityTag::Boss,
            EntityTag::Laser,
            EntityTag::EnemyLaser,
            EntityTag::ShieldItem,
            EntityTag::Meteor,
        ];
        let sprites: BTreeSet<Sprite> = tags.into_iter().map(Sprite::for_tag).collect();
        assert_eq!(sprites.len(), tags.len());
        assert!(sprites.iter().all(|s| Sprite::ALL.contains(s)));
    }

    #[test]
    fn file_names_are_distinct() {
        let names: BTreeSet<&str> = Sprite::ALL.iter().map(|s| s.file_name()).collect();
        assert_eq!(names.len(), Sprite::ALL.len());
    }

    #[test]
    fn hud_roundtrips_through_json() {
        let hud = Hud {
            life: 2,
            points: 700,
            stage: 2,
            total_stages: 3,
            charge: 0.5,
            shielded: true,
            outcome: Some(Outcome::Win),
        };
        let json = serde_json::to_string(&hud).unwrap();
        let back: Hud = serde_json::from_str(&json).unwrap();
        assert_eq!(hud, back);
    }
}
