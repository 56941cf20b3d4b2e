//! Session start-up errors.
//!
//! Gameplay itself has no failure modes: losing and winning are state
//! transitions. Only building a session can fail.

use thiserror::Error;

use crate::config::ConfigError;
use crate::present::Sprite;

/// Reasons a [`Session`](crate::session::Session) cannot start.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The asset catalog lacks a sprite.
    #[error("sprite {0:?} ({file}) is not loaded", file = .0.file_name())]
    MissingSprite(Sprite),
}
