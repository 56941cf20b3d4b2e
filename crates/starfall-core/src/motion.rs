//! Per-kind motion rules.
//!
//! Every moving entity except the hero advances on its own timer. Each
//! firing applies one vertical step from [`MotionRule`]; when the entity
//! reaches its terminal condition it either stops (enemies, boss) or is
//! marked dead (projectiles, pickups, meteor). Either way its timer is
//! finished and the caller cancels it.
//!
//! The hero instead moves once per driver tick from the held
//! [`Direction`]s, clamped to the screen ([`steer`]).
//!
//! | kind | period | step | terminal |
//! |---|---|---|---|
//! | Enemy | 300 ms | +speed | halts at `y >= H - height` |
//! | Boss | 300 ms | +speed | halts at `y >= H - height` |
//! | Laser | 100 ms | -15 | dead once `y <= 0` |
//! | EnemyLaser | 100 ms | +10 | dead once `y >= H` |
//! | ShieldItem | 100 ms | +3 | dead once `y >= H - height` |
//! | Meteor | 100 ms | +20 | dead once `y >= H` |

use crate::arena::Arena;
use crate::entity::{Body, EntityId, EntityTag};
use crate::input::Direction;

/// What happens when an entity reaches the end of its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    /// Stops at the bottom edge and stays alive.
    Halt,
    /// Marked dead.
    Expire,
}

/// Where the path ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// Top edge reached (`y <= 0`).
    Top,
    /// Body rests on the bottom edge (`y >= H - height`).
    Floor,
    /// Body has left through the bottom edge (`y >= H`).
    Bottom,
}

/// Motion parameters for one kind of entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionRule {
    /// Timer period in milliseconds.
    pub period_ms: u64,
    /// Vertical step per firing. `None` uses the entity's own speed.
    pub step: Option<f32>,
    /// End of the path.
    pub limit: Limit,
    /// Behaviour at the end of the path.
    pub terminal: Terminal,
}

impl MotionRule {
    /// Rule for `tag`, or `None` for the hero (input driven).
    #[must_use]
    pub fn for_tag(tag: EntityTag) -> Option<Self> {
        let rule = match tag {
            EntityTag::Hero => return None,
            EntityTag::Enemy | EntityTag::Boss => Self {
                period_ms: 300,
                step: None,
                limit: Limit::Floor,
                terminal: Terminal::Halt,
            },
            EntityTag::Laser => Self {
                period_ms: 100,
                step: Some(-15.0),
                limit: Limit::Top,
                terminal: Terminal::Expire,
            },
            EntityTag::EnemyLaser => Self {
                period_ms: 100,
                step: Some(10.0),
                limit: Limit::Bottom,
                terminal: Terminal::Expire,
            },
            EntityTag::ShieldItem => Self {
                period_ms: 100,
                step: Some(3.0),
                limit: Limit::Floor,
                terminal: Terminal::Expire,
            },
            EntityTag::Meteor => Self {
                period_ms: 100,
                step: Some(20.0),
                limit: Limit::Bottom,
                terminal: Terminal::Expire,
            },
        };
        Some(rule)
    }

    fn reached(&self, body: &Body, screen_height: f32) -> bool {
        let y = body.position.y;
        match self.limit {
            Limit::Top => y <= 0.0,
            Limit::Floor => y >= screen_height - body.size.h(),
            Limit::Bottom => y >= screen_height,
        }
    }
}

/// Result of one motion step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Moved; keep the timer.
    Moved,
    /// At the floor; the entity stays but the timer is done.
    Halted,
    /// End of path; the entity was marked dead.
    Expired,
    /// The entity no longer exists or is already dead.
    Gone,
}

impl Step {
    /// Returns `true` if the timer driving this motion should be cancelled.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::Moved)
    }
}

/// Applies one motion step to `id`.
///
/// The terminal check runs before moving, so a fast entity may overshoot
/// its limit by up to one step.
pub fn advance(arena: &mut Arena, id: EntityId, screen_height: f32) -> Step {
    let Some(entity) = arena.get_mut(id) else {
        return Step::Gone;
    };
    if entity.is_dead() {
        return Step::Gone;
    }
    let Some(rule) = MotionRule::for_tag(entity.tag()) else {
        return Step::Halted;
    };
    if rule.reached(entity.body(), screen_height) {
        return match rule.terminal {
            Terminal::Halt => Step::Halted,
            Terminal::Expire => {
                entity.mark_dead();
                Step::Expired
            }
        };
    }
    let dy = rule
        .step
        .or_else(|| entity.as_enemy().map(|enemy| enemy.speed))
        .unwrap_or(0.0);
    entity.body_mut().position.y += dy;
    Step::Moved
}

/// Moves a body by `step` along every held direction, clamped so it stays
/// inside the screen.
pub fn steer(body: &mut Body, held: Direction, step: f32, width: f32, height: f32) {
    let max_x = (width - body.size.w()).max(0.0);
    let max_y = (height - body.size.h()).max(0.0);
    let pos = &mut body.position;
    if held.contains(Direction::UP) {
        pos.y = (pos.y - step).max(0.0);
    }
    if held.contains(Direction::DOWN) {
        pos.y = (pos.y + step).min(max_y);
    }
    if held.contains(Direction::LEFT) {
        pos.x = (pos.x - step).max(0.0);
    }
    if held.contains(Direction::RIGHT) {
        pos.x = (pos.x + step).min(max_x);
    }
}
