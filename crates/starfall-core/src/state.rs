//! Mutable game state shared by the update engine, timers and handlers.
//!
//! [`GameState`] is the context type of the session's
//! [`EventBus`](crate::event::EventBus). It owns the arena, the scheduler,
//! the progression counters and the seeded RNG, so a session has no ambient
//! globals.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::arena::Arena;
use crate::config::GameConfig;
use crate::entity::{EntityId, EntityInner, EntityTag, HeroState};
use crate::input::Direction;
use crate::motion::MotionRule;
use crate::scheduler::{Scheduler, TimerTask};

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Every stage cleared.
    Win,
    /// Hero out of lives.
    Loss,
}

/// Session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// The world is live.
    Playing,
    /// The world is frozen until a restart.
    Ended(Outcome),
}

/// Everything a running game mutates.
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) config: GameConfig,
    pub(crate) arena: Arena,
    pub(crate) scheduler: Scheduler,
    pub(crate) hero: EntityId,
    /// Last hero state seen before the hero was pruned.
    pub(crate) fallen_hero: Option<HeroState>,
    pub(crate) stage: u32,
    pub(crate) charge: u32,
    pub(crate) phase: Phase,
    pub(crate) directions: Direction,
    rng: ChaCha8Rng,
}

impl GameState {
    /// Creates an empty state for `config`. Call
    /// [`rules::start`](crate::rules::start) to populate it.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            config,
            arena: Arena::new(),
            scheduler: Scheduler::new(),
            hero: EntityId::new(0),
            fallen_hero: None,
            stage: 1,
            charge: 0,
            phase: Phase::Playing,
            directions: Direction::empty(),
            rng,
        }
    }

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The world set.
    #[must_use]
    pub const fn arena(&self) -> &Arena {
        &self.arena
    }

    /// The timer queue.
    #[must_use]
    pub const fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// ID of the current hero.
    #[must_use]
    pub const fn hero_id(&self) -> EntityId {
        self.hero
    }

    /// Hero state, including the final state of a hero already removed
    /// from the arena.
    #[must_use]
    pub fn hero(&self) -> Option<&HeroState> {
        self.arena
            .get(self.hero)
            .and_then(|e| e.as_hero())
            .or(self.fallen_hero.as_ref())
    }

    /// Mutable hero state, only while the hero is in the arena.
    pub fn hero_mut(&mut self) -> Option<&mut HeroState> {
        self.arena.get_mut(self.hero).and_then(|e| e.as_hero_mut())
    }

    /// Current stage, starting at 1.
    #[must_use]
    pub const fn stage(&self) -> u32 {
        self.stage
    }

    /// Meteor charge, always within `0..=charge_max`.
    #[must_use]
    pub const fn charge(&self) -> u32 {
        self.charge
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns `true` while the world is live.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        matches!(self.phase, Phase::Playing)
    }

    /// The final outcome once the game has ended.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Playing => None,
            Phase::Ended(outcome) => Some(outcome),
        }
    }

    /// Directions sampled by the next driver tick.
    #[must_use]
    pub const fn directions(&self) -> Direction {
        self.directions
    }

    /// Adds charge, saturating at `charge_max`.
    pub fn add_charge(&mut self, amount: u32) {
        self.charge = self
            .charge
            .saturating_add(amount)
            .min(self.config.charge_max);
    }

    /// Returns `true` once the meteor can be launched.
    #[must_use]
    pub const fn charge_full(&self) -> bool {
        self.charge >= self.config.charge_max
    }

    /// Rolls for a shield drop.
    pub fn roll_shield_drop(&mut self) -> bool {
        self.rng.gen_bool(self.config.shield_drop_chance)
    }

    /// Spawns an entity and starts its timers.
    ///
    /// Kinds with a [`MotionRule`] get a motion timer; the boss also gets a
    /// fire timer. Both are owned by the new entity.
    pub fn spawn(&mut self, position: Vec2, inner: EntityInner) -> EntityId {
        let tag = inner.tag();
        let id = self.arena.spawn(position, inner);
        if let Some(rule) = MotionRule::for_tag(tag) {
            self.scheduler
                .schedule_repeating(TimerTask::Motion(id), rule.period_ms, Some(id));
        }
        if tag == EntityTag::Boss {
            self.scheduler.schedule_repeating(
                TimerTask::BossFire(id),
                self.config.boss_fire_period_ms,
                Some(id),
            );
        }
        debug!(entity = %id, %tag, x = position.x, y = position.y, "spawned");
        id
    }

    /// Removes dead entities and cancels the timers they owned.
    ///
    /// Keeps a copy of the hero's final state for the HUD.
    pub fn prune(&mut self) -> Vec<EntityId> {
        if let Some(hero) = self.arena.get(self.hero) {
            if hero.is_dead() {
                self.fallen_hero = hero.as_hero().cloned();
            }
        }
        let pruned = self.arena.prune_dead();
        for id in &pruned {
            let cancelled = self.scheduler.cancel_owned_by(*id);
            if cancelled > 0 {
                debug!(entity = %id, cancelled, "cancelled timers of pruned entity");
            }
        }
        pruned
    }

    /// Drops all entities, timers and progress, keeping config and RNG.
    pub(crate) fn reset(&mut self) {
        self.scheduler.clear();
        self.arena = Arena::new();
        self.fallen_hero = None;
        self.stage = 1;
        self.charge = 0;
        self.phase = Phase::Playing;
    }
}
