//! Per-tick update engine.
//!
//! [`update`] runs once per driver tick, in a fixed order:
//!
//! 1. Move the hero along the held directions, clamped to the screen.
//! 2. Snapshot the collision groups (hostiles, hero lasers, enemy lasers,
//!    shield pickups). Entities spawned later in the tick join next tick.
//! 3. Laser vs hostile pairs emit `CollisionEnemyLaser`.
//! 4. Hostile vs hero pairs emit `CollisionEnemyHero`.
//! 5. Enemy laser vs hero pairs emit `CollisionHeroEnemyLaser`.
//! 6. Shield pickup vs hero pairs emit `CollisionHeroShield`.
//! 7. Meteor strike: an on-screen meteor zeroes every hostile once, then
//!    lingers for a few frames.
//! 8. Sweep: hostiles at `hp <= 0` are marked dead.
//! 9. The hero's shield counts down.
//! 10. Dead entities are pruned and their timers cancelled.
//!
//! A pair is only reported while both sides are alive, so an entity that
//! dies mid-tick stops colliding immediately. If a handler ends the game the
//! remaining steps still run on the frozen world.

use tracing::{info, trace};

use crate::entity::{EntityId, EntityTag, MeteorState};
use crate::event::Message;
use crate::motion;
use crate::rules::{self, GameBus};
use crate::state::GameState;

/// Collision groups captured at the start of a tick.
#[derive(Debug, Default)]
struct Groups {
    hostiles: Vec<EntityId>,
    lasers: Vec<EntityId>,
    enemy_lasers: Vec<EntityId>,
    shields: Vec<EntityId>,
}

impl Groups {
    fn capture(state: &GameState) -> Self {
        let arena = &state.arena;
        Self {
            hostiles: arena.ids_where(EntityTag::is_hostile),
            lasers: arena.ids_of(EntityTag::Laser),
            enemy_lasers: arena.ids_of(EntityTag::EnemyLaser),
            shields: arena.ids_of(EntityTag::ShieldItem),
        }
    }
}

/// Runs one driver tick.
pub fn update(bus: &mut GameBus, state: &mut GameState) {
    steer_hero(state);

    let groups = Groups::capture(state);
    let hero = state.hero;

    for &laser in &groups.lasers {
        for &enemy in &groups.hostiles {
            if overlapping(state, laser, enemy) {
                bus.emit(state, Message::CollisionEnemyLaser { laser, enemy });
            }
        }
    }
    for &enemy in &groups.hostiles {
        if overlapping(state, enemy, hero) {
            bus.emit(state, Message::CollisionEnemyHero { enemy });
        }
    }
    for &laser in &groups.enemy_lasers {
        if overlapping(state, laser, hero) {
            bus.emit(state, Message::CollisionHeroEnemyLaser { laser });
        }
    }
    for &shield in &groups.shields {
        if overlapping(state, shield, hero) {
            bus.emit(state, Message::CollisionHeroShield { shield });
        }
    }

    strike_meteors(state);
    sweep_hostiles(state);
    if let Some(hero) = state.hero_mut() {
        hero.update_shield();
    }
    let pruned = state.prune();

    trace!(
        entities = state.arena.entity_count(),
        hostiles = state.arena.live_hostile_count(),
        pruned = pruned.len(),
        "tick"
    );
}

fn steer_hero(state: &mut GameState) {
    let held = state.directions;
    if held.is_empty() {
        return;
    }
    let step = state.config.hero_step;
    let (width, height) = (state.config.width(), state.config.height());
    if let Some(hero) = state.arena.get_mut(state.hero) {
        if !hero.is_dead() {
            motion::steer(hero.body_mut(), held, step, width, height);
        }
    }
}

/// Returns `true` if both entities exist, are alive and their rectangles
/// overlap.
fn overlapping(state: &GameState, a: EntityId, b: EntityId) -> bool {
    let (Some(a), Some(b)) = (state.arena.get(a), state.arena.get(b)) else {
        return false;
    };
    !a.is_dead() && !b.is_dead() && a.rect().intersects(&b.rect())
}

fn strike_meteors(state: &mut GameState) {
    for id in state.arena.ids_of(EntityTag::Meteor) {
        let Some(meteor) = state.arena.get_mut(id) else {
            continue;
        };
        if meteor.is_dead() {
            continue;
        }
        let on_screen = meteor.position().y > 0.0;
        let Some(effect) = meteor.as_meteor_mut() else {
            continue;
        };

        if effect.used {
            effect.frames_shown += 1;
            if effect.frames_shown > MeteorState::LINGER_FRAMES {
                meteor.mark_dead();
            }
        } else if on_screen {
            effect.used = true;
            clear_hostiles(state);
        }
    }
}

/// Zeroes every hostile. Schedules the stage advance if this emptied a
/// non-empty population.
fn clear_hostiles(state: &mut GameState) {
    let had_hostiles = state.arena.has_live_hostiles();
    let mut cleared = 0_usize;
    for entity in state.arena.entities_sorted_mut() {
        if !entity.is_hostile() || entity.is_dead() {
            continue;
        }
        if let Some(stats) = entity.as_enemy_mut() {
            stats.hp = 0;
        }
        entity.mark_dead();
        cleared += 1;
    }
    info!(cleared, "meteor strike");
    if had_hostiles && state.is_playing() {
        rules::schedule_stage_advance(state);
    }
}

fn sweep_hostiles(state: &mut GameState) {
    for entity in state.arena.entities_sorted_mut() {
        let spent = entity.as_enemy().is_some_and(|stats| stats.hp <= 0);
        if spent && !entity.is_dead() {
            entity.mark_dead();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::entity::{EnemyState, EntityInner};
    use crate::input::Direction;
    use crate::scheduler::TimerTask;
    use glam::Vec2;

    fn started() -> (GameBus, GameState) {
        let mut bus = GameBus::new();
        let mut state = GameState::new(GameConfig::default());
        rules::start(&mut bus, &mut state);
        (bus, state)
    }

    fn hero_position(state: &GameState) -> Vec2 {
        state.arena.get(state.hero).unwrap().position()
    }

    mod movement_tests {
        use super::*;

        #[test]
        fn hero_moves_with_held_directions() {
            let (mut bus, mut state) = started();
            let before = hero_position(&state);
            state.directions = Direction::LEFT | Direction::UP;
            update(&mut bus, &mut state);
            assert_eq!(hero_position(&state), before + Vec2::new(-5.0, -5.0));
        }

        #[test]
        fn idle_hero_stays_put() {
            let (mut bus, mut state) = started();
            let before = hero_position(&state);
            update(&mut bus, &mut state);
            assert_eq!(hero_position(&state), before);
        }
    }

    mod collision_tests {
        use super::*;

        #[test]
        fn overlapping_laser_kills_enemy_and_is_pruned() {
            let (mut bus, mut state) = started();
            let enemy = state.arena.ids_of(EntityTag::Enemy)[0];
            let at = state.arena.get(enemy).unwrap().position();
            let laser = state.spawn(at + Vec2::new(10.0, 10.0), EntityInner::Laser);

            update(&mut bus, &mut state);

            assert!(state.arena.get(enemy).is_none());
            assert!(state.arena.get(laser).is_none());
            assert_eq!(state.scheduler().owned_count(laser), 0);
            assert_eq!(state.hero().unwrap().points, 100);
        }

        #[test]
        fn one_laser_kills_one_enemy_per_tick() {
            let (mut bus, mut state) = started();
            // Enemies 0 and 1 share a column, so a laser at the seam touches both.
            let enemy = state.arena.ids_of(EntityTag::Enemy)[0];
            let at = state.arena.get(enemy).unwrap().position();
            state.spawn(at + Vec2::new(10.0, 40.0), EntityInner::Laser);

            update(&mut bus, &mut state);

            assert_eq!(state.arena.live_hostile_count(), 9);
        }

        /// Puts a hostile with one hp left on top of the hero, with a hero
        /// laser inside it, and runs one tick.
        fn laser_and_hero_share_a_hostile(inner: EntityInner) -> (GameState, Vec<Message>) {
            let mut bus = GameBus::new();
            let mut state = GameState::new(GameConfig {
                shield_drop_chance: 0.0,
                ..GameConfig::default()
            });
            rules::start(&mut bus, &mut state);
            let at = hero_position(&state);
            let hostile = state.spawn(at, inner);
            if let Some(stats) = state.arena.get_mut(hostile).unwrap().as_enemy_mut() {
                stats.hp = 1;
            }
            state.spawn(at + Vec2::new(20.0, 5.0), EntityInner::Laser);

            update(&mut bus, &mut state);
            let messages = bus.take_messages();
            (state, messages)
        }

        fn count_where(messages: &[Message], pred: impl Fn(&Message) -> bool) -> usize {
            messages.iter().filter(|m| pred(m)).count()
        }

        #[test]
        fn grunt_shot_this_tick_does_not_ram() {
            let (state, messages) =
                laser_and_hero_share_a_hostile(EntityInner::Enemy(EnemyState::grunt()));

            assert_eq!(state.hero().unwrap().life, 3);
            assert_eq!(
                count_where(&messages, |m| matches!(m, Message::CollisionEnemyLaser { .. })),
                1
            );
            assert_eq!(
                count_where(&messages, |m| matches!(m, Message::CollisionEnemyHero { .. })),
                0
            );
        }

        #[test]
        fn boss_on_last_hp_shot_this_tick_does_not_ram() {
            let (state, messages) =
                laser_and_hero_share_a_hostile(EntityInner::Boss(EnemyState::boss()));

            assert_eq!(state.hero().unwrap().life, 3);
            assert_eq!(state.hero().unwrap().points, 100);
            assert!(state.arena.ids_of(EntityTag::Boss).is_empty());
            assert_eq!(messages.len(), 1);
            assert!(matches!(messages[0], Message::CollisionEnemyLaser { .. }));
        }

        #[test]
        fn enemy_laser_hits_hero_once() {
            let (mut bus, mut state) = started();
            let at = hero_position(&state);
            state.spawn(at, EntityInner::EnemyLaser);

            update(&mut bus, &mut state);
            update(&mut bus, &mut state);

            assert_eq!(state.hero().unwrap().life, 2);
            assert!(state.arena.ids_of(EntityTag::EnemyLaser).is_empty());
        }

        #[test]
        fn shield_wears_off() {
            let (mut bus, mut state) = started();
            let at = hero_position(&state);
            state.spawn(at, EntityInner::ShieldItem);

            update(&mut bus, &mut state);
            assert!(state.hero().unwrap().shielded);
            assert_eq!(state.hero().unwrap().shield_timer, 49);

            for _ in 0..49 {
                update(&mut bus, &mut state);
            }
            assert!(!state.hero().unwrap().shielded);
        }
    }

    mod meteor_tests {
        use super::*;

        fn meteor_at(state: &mut GameState, y: f32) -> EntityId {
            state.spawn(Vec2::new(448.0, y), EntityInner::Meteor(MeteorState::default()))
        }

        #[test]
        fn off_screen_meteor_waits() {
            let (mut bus, mut state) = started();
            meteor_at(&mut state, -20.0);
            update(&mut bus, &mut state);
            assert_eq!(state.arena.live_hostile_count(), 10);
        }

        #[test]
        fn strike_clears_population_and_schedules_advance() {
            let (mut bus, mut state) = started();
            let meteor = meteor_at(&mut state, 12.0);

            update(&mut bus, &mut state);

            assert_eq!(state.arena.live_hostile_count(), 0);
            assert!(state.arena.ids_where(EntityTag::is_hostile).is_empty());
            assert_eq!(state.scheduler().count_task(TimerTask::StageAdvance), 1);
            assert_eq!(state.stage(), 1);
            assert!(state.arena.get(meteor).unwrap().as_meteor().unwrap().used);
            assert_eq!(state.hero().unwrap().points, 0);
        }

        #[test]
        fn meteor_lingers_then_disappears() {
            let (mut bus, mut state) = started();
            let meteor = meteor_at(&mut state, 12.0);
            update(&mut bus, &mut state);

            for _ in 0..MeteorState::LINGER_FRAMES {
                update(&mut bus, &mut state);
                assert!(state.arena.get(meteor).is_some());
            }
            update(&mut bus, &mut state);
            assert!(state.arena.get(meteor).is_none());
        }

        #[test]
        fn strike_on_empty_field_schedules_nothing() {
            let (mut bus, mut state) = started();
            for id in state.arena.ids_where(EntityTag::is_hostile) {
                state.arena.get_mut(id).unwrap().mark_dead();
            }
            update(&mut bus, &mut state);
            meteor_at(&mut state, 12.0);

            update(&mut bus, &mut state);

            assert_eq!(state.scheduler().count_task(TimerTask::StageAdvance), 0);
        }
    }

    #[test]
    fn sweep_marks_spent_hostiles_dead() {
        let (mut bus, mut state) = started();
        let boss = state.spawn(Vec2::new(0.0, 300.0), EntityInner::Boss(EnemyState::boss()));
        if let Some(stats) = state.arena.get_mut(boss).unwrap().as_enemy_mut() {
            stats.hp = 0;
        }
        update(&mut bus, &mut state);
        assert!(state.arena.get(boss).is_none());
        assert_eq!(state.scheduler().owned_count(boss), 0);
    }
}
