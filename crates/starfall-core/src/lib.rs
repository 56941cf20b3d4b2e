//! # Starfall Core
//!
//! Deterministic simulation core for Starfall, a single-player vertical
//! arcade shooter.
//!
//! The crate owns the whole game loop and nothing else: no window, no
//! images, no wall clock. Front ends implement the traits in [`present`],
//! feed logical time and key events into a [`Session`] and draw what it
//! hands back.
//!
//! ## Architecture
//!
//! - **Arena**: every live entity, iterated in insertion order
//! - **Scheduler**: one logical-time queue for the driver tick and every
//!   per-entity timer (motion, boss fire, cooldown, stage advance)
//! - **Engine**: the fixed per-tick update (movement, collisions, sweep,
//!   prune)
//! - **Event bus + rules**: collisions and player signals are messages;
//!   scoring, damage, stage flow and game end are handlers
//!
//! ## Usage
//!
//! ```
//! use starfall_core::{GameConfig, Session, Signal};
//! use starfall_core::present::{AssetCatalog, Sprite};
//!
//! struct Loaded;
//! impl AssetCatalog for Loaded {
//!     fn has_sprite(&self, _: Sprite) -> bool {
//!         true
//!     }
//! }
//!
//! let mut session = Session::new(GameConfig::default().with_seed(7), &Loaded)?;
//! session.signal(Signal::Fire);
//! for _ in 0..10 {
//!     session.tick_once();
//! }
//! println!("{:?}", session.hud());
//! # Ok::<(), starfall_core::SessionError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod config;
pub mod engine;
pub mod entity;
pub mod error;
pub mod event;
pub mod input;
pub mod motion;
pub mod present;
pub mod rules;
pub mod scheduler;
pub mod session;
pub mod state;

pub use arena::Arena;
pub use config::{ConfigError, GameConfig};
pub use entity::{Entity, EntityId, EntityTag};
pub use error::SessionError;
pub use event::{EventBus, Message, Topic};
pub use input::{Direction, Key, Signal};
pub use present::{AssetCatalog, Hud, Renderer, Sprite};
pub use session::Session;
pub use state::{GameState, Outcome, Phase};

#[cfg(test)]
mod tests;
