//! Test helpers for building sessions and poking at their arenas.

use glam::Vec2;

use crate::config::GameConfig;
use crate::entity::{Entity, EntityId, EntityInner, EntityTag, HeroState};
use crate::event::Message;
use crate::present::{AssetCatalog, Sprite};
use crate::session::Session;

// =============================================================================
// Session Setup
// =============================================================================

/// Catalog that has every sprite.
pub struct AllSprites;

impl AssetCatalog for AllSprites {
    fn has_sprite(&self, _: Sprite) -> bool {
        true
    }
}

/// Starts a session with `config`.
pub fn session_with(config: GameConfig) -> Session {
    Session::new(config, &AllSprites).unwrap()
}

/// Starts a session with the default config and the given seed.
pub fn seeded_session(seed: u64) -> Session {
    session_with(GameConfig::default().with_seed(seed))
}

/// Config with shield drops disabled, so kills are fully predictable.
pub fn no_drop_config() -> GameConfig {
    GameConfig {
        shield_drop_chance: 0.0,
        ..GameConfig::default()
    }
}

// =============================================================================
// Arena Shortcuts
// =============================================================================

/// Hero state of the session.
pub fn hero(session: &Session) -> &HeroState {
    session.state().hero().unwrap()
}

/// Position of the hero.
pub fn hero_position(session: &Session) -> Vec2 {
    let id = session.state().hero_id();
    session.arena().get(id).unwrap().position()
}

/// IDs of all live enemies and bosses.
pub fn live_hostiles(session: &Session) -> Vec<EntityId> {
    let arena = session.arena();
    arena
        .ids_where(EntityTag::is_hostile)
        .into_iter()
        .filter(|id| arena.is_alive(*id))
        .collect()
}

/// Spawns an entity with its timers, as gameplay would.
pub fn spawn(session: &mut Session, position: Vec2, inner: EntityInner) -> EntityId {
    session.state_mut().spawn(position, inner)
}

/// Moves an entity to `position`.
pub fn teleport(session: &mut Session, id: EntityId, position: Vec2) {
    session
        .state_mut()
        .arena
        .get_mut(id)
        .unwrap()
        .body_mut()
        .position = position;
}

/// Kills one hostile through the laser-collision path.
pub fn shoot(session: &mut Session, enemy: EntityId) {
    let laser = spawn(session, Vec2::ZERO, EntityInner::Laser);
    session.emit(Message::CollisionEnemyLaser { laser, enemy });
}

/// Shoots every live hostile once.
pub fn shoot_all(session: &mut Session) {
    for enemy in live_hostiles(session) {
        shoot(session, enemy);
    }
}

/// Clones the arena contents for comparison.
pub fn snapshot(session: &Session) -> Vec<Entity> {
    session.arena().entities_sorted().cloned().collect()
}

/// Counts messages of one kind.
pub fn count(messages: &[Message], wanted: &Message) -> usize {
    messages.iter().filter(|m| *m == wanted).count()
}
