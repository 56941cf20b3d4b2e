//! Gameplay rules: bus handlers and stage flow.
//!
//! [`install`] subscribes one handler per topic. Handlers mutate the
//! [`GameState`] they are given and may emit follow-up messages (a fatal hit
//! emits [`Message::GameEndLoss`], clearing the last stage emits
//! [`Message::GameEndWin`]).
//!
//! # Stage flow
//!
//! Stages `1..total_stages` spawn a 5x2 wave of enemies; stage
//! `total_stages` spawns the boss. Shooting the last enemy moves to the next
//! stage immediately; a meteor clear schedules the advance after a delay.
//! Advancing past the last stage wins the game, and so does ramming the last
//! enemy while the hero survives the hit.

use glam::Vec2;
use tracing::{debug, info};

use crate::config::{WAVE_COLUMNS, WAVE_ROWS};
use crate::entity::{
    EnemyState, EntityId, EntityInner, EntityTag, HeroState, MeteorState,
};
use crate::event::{EventBus, Message, Topic};
use crate::scheduler::TimerTask;
use crate::state::{GameState, Outcome, Phase};

/// The bus type used by a session.
pub type GameBus = EventBus<GameState>;

/// Subscribes every gameplay handler.
pub fn install(bus: &mut GameBus) {
    bus.on(Topic::FireRequested, |_, state, _| fire(state));
    bus.on(Topic::MeteorRequested, |_, state, _| launch_meteor(state));
    bus.on(Topic::RestartRequested, |bus, state, _| restart(bus, state));
    bus.on(Topic::CollisionEnemyLaser, |bus, state, msg| {
        if let Message::CollisionEnemyLaser { laser, enemy } = *msg {
            on_laser_hit(bus, state, laser, enemy);
        }
    });
    bus.on(Topic::CollisionEnemyHero, |bus, state, msg| {
        if let Message::CollisionEnemyHero { enemy } = *msg {
            on_ram(bus, state, enemy);
        }
    });
    bus.on(Topic::CollisionHeroEnemyLaser, |bus, state, msg| {
        if let Message::CollisionHeroEnemyLaser { laser } = *msg {
            on_hero_shot(bus, state, laser);
        }
    });
    bus.on(Topic::CollisionHeroShield, |_, state, msg| {
        if let Message::CollisionHeroShield { shield } = *msg {
            on_shield_pickup(state, shield);
        }
    });
    bus.on(Topic::GameEndWin, |_, state, _| end_game(state, Outcome::Win));
    bus.on(Topic::GameEndLoss, |_, state, _| end_game(state, Outcome::Loss));
}

/// Populates a fresh state: stage wave, hero, driver tick, handlers.
pub fn start(bus: &mut GameBus, state: &mut GameState) {
    spawn_wave(state);
    let hero_start = hero_spawn_point(state);
    let lives = state.config.hero_lives;
    state.hero = state.spawn(hero_start, EntityInner::Hero(HeroState::new(lives)));
    state
        .scheduler
        .schedule_repeating(TimerTask::Frame, state.config.tick_period_ms, None);
    install(bus);
}

/// Throws away the current game and starts a new one at stage 1.
pub fn restart(bus: &mut GameBus, state: &mut GameState) {
    bus.clear();
    state.reset();
    info!("restart");
    start(bus, state);
}

fn hero_spawn_point(state: &GameState) -> Vec2 {
    let (w, h) = (state.config.width(), state.config.height());
    Vec2::new(w / 2.0 - 45.0, h - h / 4.0)
}

/// Spawns the enemies of the current stage.
#[allow(clippy::cast_precision_loss)]
pub fn spawn_wave(state: &mut GameState) {
    let stage = state.stage;
    if stage < state.config.total_stages {
        let enemy = EntityTag::Enemy.size();
        let row_width = WAVE_COLUMNS * enemy.width;
        let start_x = (state.config.width() - row_width as f32) / 2.0;
        for col in 0..WAVE_COLUMNS {
            for row in 0..WAVE_ROWS {
                let position = Vec2::new(
                    start_x + (col * enemy.width) as f32,
                    (row * enemy.height) as f32,
                );
                state.spawn(position, EntityInner::Enemy(EnemyState::grunt()));
            }
        }
        info!(stage, count = WAVE_COLUMNS * WAVE_ROWS, "wave spawned");
    } else {
        let position = Vec2::new(state.config.width() / 2.0 - 60.0, 50.0);
        let boss = state.spawn(position, EntityInner::Boss(EnemyState::boss()));
        info!(stage, entity = %boss, "boss spawned");
    }
}

/// Moves to the next stage, or wins if the last stage was cleared.
pub fn advance_stage(bus: &mut GameBus, state: &mut GameState) {
    if !state.is_playing() {
        return;
    }
    state.stage += 1;
    if state.stage > state.config.total_stages {
        info!(stage = state.stage, "all stages cleared");
        bus.emit(state, Message::GameEndWin);
    } else {
        info!(stage = state.stage, "stage advanced");
        spawn_wave(state);
    }
}

/// Schedules [`advance_stage`] after the configured delay.
pub fn schedule_stage_advance(state: &mut GameState) {
    let delay = state.config.stage_advance_delay_ms;
    state
        .scheduler
        .schedule_once(TimerTask::StageAdvance, delay, None);
    info!(stage = state.stage, delay_ms = delay, "stage advance scheduled");
}

/// Fires a hero laser if the cooldown allows it.
pub fn fire(state: &mut GameState) {
    if !state.is_playing() {
        return;
    }
    let hero_id = state.hero;
    let Some(hero) = state.arena.get(hero_id) else {
        return;
    };
    let ready = !hero.is_dead() && hero.as_hero().is_some_and(HeroState::can_fire);
    if !ready {
        return;
    }
    let rect = hero.rect();
    let origin = Vec2::new(rect.left + (rect.right - rect.left) / 2.0 - 5.0, rect.top - 10.0);

    let cooldown = state.config.fire_cooldown_ms;
    if let Some(hero) = state.hero_mut() {
        hero.cooldown_ms = cooldown;
    }
    state.spawn(origin, EntityInner::Laser);
    state.scheduler.schedule_repeating(
        TimerTask::CooldownDecay(hero_id),
        state.config.cooldown_decay_ms,
        Some(hero_id),
    );
}

/// One cooldown decay step. Returns `true` when the timer is done.
pub fn decay_cooldown(state: &mut GameState, hero: EntityId) -> bool {
    let step = u32::try_from(state.config.cooldown_decay_ms).unwrap_or(u32::MAX);
    match state.arena.get_mut(hero).and_then(|e| e.as_hero_mut()) {
        Some(hero) => hero.decay_cooldown(step),
        None => true,
    }
}

/// Boss shot. Returns `false` if the boss is gone and the timer should stop.
pub fn boss_fire(state: &mut GameState, boss: EntityId) -> bool {
    let Some(entity) = state.arena.get(boss) else {
        return false;
    };
    if entity.is_dead() {
        return false;
    }
    let rect = entity.rect();
    let origin = Vec2::new(rect.left + (rect.right - rect.left) / 2.0 - 5.0, rect.bottom);
    state.spawn(origin, EntityInner::EnemyLaser);
    true
}

/// Launches the meteor when the charge is full and empties the charge.
pub fn launch_meteor(state: &mut GameState) {
    if !state.is_playing() || !state.charge_full() {
        return;
    }
    let position = Vec2::new(state.config.width() / 2.0 - 64.0, -128.0);
    let meteor = state.spawn(position, EntityInner::Meteor(MeteorState::default()));
    state.charge = 0;
    info!(entity = %meteor, "meteor launched");
}

fn on_laser_hit(bus: &mut GameBus, state: &mut GameState, laser: EntityId, enemy: EntityId) {
    if let Some(laser) = state.arena.get_mut(laser) {
        laser.mark_dead();
    }
    let Some(target) = state.arena.get_mut(enemy) else {
        return;
    };
    let Some(stats) = target.as_enemy_mut() else {
        return;
    };
    stats.hp -= 1;
    let hp = stats.hp;
    debug!(%laser, %enemy, hp, "laser hit");
    if hp > 0 {
        return;
    }
    target.mark_dead();
    let drop_at = target.position();

    let points = state.config.points_per_kill;
    if let Some(hero) = state.hero_mut() {
        hero.add_points(points);
    }
    state.add_charge(state.config.charge_per_kill);
    if state.roll_shield_drop() {
        let shield = state.spawn(drop_at, EntityInner::ShieldItem);
        debug!(entity = %shield, "shield dropped");
    }
    if !state.arena.has_live_hostiles() {
        advance_stage(bus, state);
    }
}

fn on_ram(bus: &mut GameBus, state: &mut GameState, enemy: EntityId) {
    let Some(target) = state.arena.get_mut(enemy) else {
        return;
    };
    let killed = match target.inner_mut() {
        EntityInner::Boss(stats) => {
            stats.hp -= 1;
            stats.hp <= 0
        }
        _ => true,
    };
    if killed {
        target.mark_dead();
    }
    debug!(%enemy, killed, "hero rammed");

    if damage_hero(bus, state) {
        return;
    }
    // A ram that empties the field ends the game outright, on any stage.
    if !state.arena.has_live_hostiles() {
        bus.emit(state, Message::GameEndWin);
    }
}

fn on_hero_shot(bus: &mut GameBus, state: &mut GameState, laser: EntityId) {
    if let Some(laser) = state.arena.get_mut(laser) {
        laser.mark_dead();
    }
    debug!(%laser, "hero hit by enemy laser");
    damage_hero(bus, state);
}

fn on_shield_pickup(state: &mut GameState, shield: EntityId) {
    if let Some(item) = state.arena.get_mut(shield) {
        item.mark_dead();
    }
    let ticks = state.config.shield_duration_ticks;
    if let Some(hero) = state.hero_mut() {
        hero.raise_shield(ticks);
        debug!(ticks, "shield raised");
    }
}

/// Takes one life from the hero. Returns `true` if that was the last one,
/// in which case the loss has already been emitted.
fn damage_hero(bus: &mut GameBus, state: &mut GameState) -> bool {
    let hero_id = state.hero;
    let Some(hero) = state.arena.get_mut(hero_id) else {
        return false;
    };
    let fatal = hero.as_hero_mut().is_some_and(HeroState::decrement_life);
    if fatal {
        hero.mark_dead();
        bus.emit(state, Message::GameEndLoss);
    }
    fatal
}

fn end_game(state: &mut GameState, outcome: Outcome) {
    if !state.is_playing() {
        debug!(?outcome, "ignoring second game end");
        return;
    }
    state.phase = Phase::Ended(outcome);
    state.scheduler.clear();
    let points = state.hero().map_or(0, |hero| hero.points);
    info!(?outcome, stage = state.stage, points, "game over");
}
