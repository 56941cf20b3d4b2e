//! Game session: the single owner of all game state.
//!
//! A [`Session`] drives the deterministic loop. Callers feed it elapsed
//! logical time with [`Session::advance`] and player input with
//! [`Session::signal`] / [`Session::set_directions`] (or raw keys through
//! [`Session::key_down`] / [`Session::key_up`]). Every timed behaviour,
//! including the driver tick, fires from one scheduler queue.
//!
//! # Example
//!
//! ```
//! use starfall_core::config::GameConfig;
//! use starfall_core::input::Signal;
//! use starfall_core::present::{AssetCatalog, Sprite};
//! use starfall_core::session::Session;
//!
//! struct AllLoaded;
//! impl AssetCatalog for AllLoaded {
//!     fn has_sprite(&self, _: Sprite) -> bool {
//!         true
//!     }
//! }
//!
//! let mut session = Session::new(GameConfig::default(), &AllLoaded).unwrap();
//! session.signal(Signal::Fire);
//! session.advance(1_000);
//!
//! assert_eq!(session.now(), 1_000);
//! assert!(session.is_running());
//! assert_eq!(session.stage(), 1);
//! ```

use tracing::{debug, info};

use crate::arena::Arena;
use crate::config::GameConfig;
use crate::engine;
use crate::error::SessionError;
use crate::event::Message;
use crate::input::{Direction, InputState, Key, Signal};
use crate::motion;
use crate::present::{AssetCatalog, Hud, Renderer, Sprite};
use crate::rules::{self, GameBus};
use crate::scheduler::{FiredTimer, TimerTask};
use crate::state::{GameState, Outcome};

/// A running game.
#[derive(Debug)]
pub struct Session {
    bus: GameBus,
    state: GameState,
    input: InputState,
}

impl Session {
    /// Validates `config`, checks that every sprite is loaded and starts
    /// stage 1.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] for an invalid configuration and
    /// [`SessionError::MissingSprite`] for the first sprite the catalog
    /// lacks.
    pub fn new(config: GameConfig, catalog: &impl AssetCatalog) -> Result<Self, SessionError> {
        config.validate()?;
        if let Some(missing) = Sprite::ALL.into_iter().find(|s| !catalog.has_sprite(*s)) {
            return Err(SessionError::MissingSprite(missing));
        }

        let mut bus = GameBus::new();
        let mut state = GameState::new(config);
        rules::start(&mut bus, &mut state);
        info!(
            seed = state.config().seed,
            stages = state.config().total_stages,
            "session started"
        );
        Ok(Self {
            bus,
            state,
            input: InputState::new(),
        })
    }

    /// Moves logical time forward by `elapsed_ms`, firing every timer that
    /// comes due on the way, in order.
    pub fn advance(&mut self, elapsed_ms: u64) {
        let until = self.state.scheduler.now().saturating_add(elapsed_ms);
        while let Some(fired) = self.state.scheduler.pop_due(until) {
            self.run_timer(fired);
            self.state.scheduler.rearm(fired.id);
        }
        self.state.scheduler.advance_to(until);
    }

    /// Advances by exactly one driver period.
    pub fn tick_once(&mut self) {
        self.advance(self.state.config().tick_period_ms);
    }

    fn run_timer(&mut self, fired: FiredTimer) {
        let state = &mut self.state;
        let finished = match fired.task {
            TimerTask::Frame => {
                engine::update(&mut self.bus, state);
                false
            }
            TimerTask::Motion(id) => {
                let height = state.config().height();
                motion::advance(&mut state.arena, id, height).is_finished()
            }
            TimerTask::BossFire(boss) => !rules::boss_fire(state, boss),
            TimerTask::CooldownDecay(hero) => rules::decay_cooldown(state, hero),
            TimerTask::StageAdvance => {
                rules::advance_stage(&mut self.bus, state);
                false
            }
        };
        if finished && state.scheduler.cancel(fired.id) {
            debug!(task = ?fired.task, "timer finished");
        }
    }

    /// Replaces the held directions sampled by the next tick.
    pub fn set_directions(&mut self, directions: Direction) {
        self.state.directions = directions;
    }

    /// Publishes a player signal on the bus.
    pub fn signal(&mut self, signal: Signal) {
        let message = match signal {
            Signal::Fire => Message::FireRequested,
            Signal::Restart => Message::RestartRequested,
            Signal::Meteor => Message::MeteorRequested,
        };
        self.bus.emit(&mut self.state, message);
    }

    /// Handles a key press: arrows update the held directions, signal keys
    /// publish their signal, anything else is ignored.
    pub fn key_down(&mut self, key: Key) {
        let signal = self.input.key_down(key);
        self.state.directions = self.input.directions();
        if let Some(signal) = signal {
            self.signal(signal);
        }
    }

    /// Handles a key release.
    pub fn key_up(&mut self, key: Key) {
        self.input.key_up(key);
        self.state.directions = self.input.directions();
    }

    /// Draws the live arena in insertion order, then the HUD, then the end
    /// screen once the game is over.
    ///
    /// Entities already marked dead are skipped even if the next prune has
    /// not run yet.
    pub fn render(&self, renderer: &mut impl Renderer) {
        for entity in self.state.arena().entities_sorted() {
            if entity.is_dead() {
                continue;
            }
            renderer.draw_entity(entity, Sprite::for_tag(entity.tag()));
        }
        renderer.draw_hud(&self.hud());
        if let Some(outcome) = self.outcome() {
            renderer.draw_end_screen(outcome);
        }
    }

    /// Overlay snapshot.
    #[must_use]
    pub fn hud(&self) -> Hud {
        Hud::capture(&self.state)
    }

    /// The world set.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        self.state.arena()
    }

    /// Full game state, read only.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Final outcome, once the game has ended.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome()
    }

    /// Current stage.
    #[must_use]
    pub fn stage(&self) -> u32 {
        self.state.stage()
    }

    /// Current meteor charge.
    #[must_use]
    pub fn charge(&self) -> u32 {
        self.state.charge()
    }

    /// Returns `true` until the game ends.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.is_playing()
    }

    /// Logical time in milliseconds.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.state.scheduler().now()
    }

    /// Drains every message published since the last call.
    pub fn take_messages(&mut self) -> Vec<Message> {
        self.bus.take_messages()
    }

    /// Mutable game state for scenario tests.
    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Publishes an arbitrary message, as the engine or a handler would.
    #[cfg(test)]
    pub(crate) fn emit(&mut self, message: Message) {
        self.bus.emit(&mut self.state, message);
    }
}
