//! Player input.
//!
//! Held arrow keys become [`Direction`] flags that the update engine samples
//! once per tick. Space, Enter and `C` are edge-triggered [`Signal`]s.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Directions currently held down.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Direction: u8 {
        /// Move toward the top edge.
        const UP = 1 << 0;
        /// Move toward the bottom edge.
        const DOWN = 1 << 1;
        /// Move toward the left edge.
        const LEFT = 1 << 2;
        /// Move toward the right edge.
        const RIGHT = 1 << 3;
    }
}

/// One-shot player request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    /// Shoot a laser.
    Fire,
    /// Start a fresh game.
    Restart,
    /// Launch the meteor.
    Meteor,
}

/// Physical keys the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Up arrow
    ArrowUp,
    /// Down arrow
    ArrowDown,
    /// Left arrow
    ArrowLeft,
    /// Right arrow
    ArrowRight,
    /// Space bar
    Space,
    /// Enter
    Enter,
    /// The `C` key
    C,
    /// Anything else
    Other,
}

impl Key {
    /// Direction held by this key, if it is an arrow.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::ArrowUp => Some(Direction::UP),
            Self::ArrowDown => Some(Direction::DOWN),
            Self::ArrowLeft => Some(Direction::LEFT),
            Self::ArrowRight => Some(Direction::RIGHT),
            _ => None,
        }
    }

    /// Signal raised by pressing this key, if any.
    #[must_use]
    pub const fn signal(self) -> Option<Signal> {
        match self {
            Self::Space => Some(Signal::Fire),
            Self::Enter => Some(Signal::Restart),
            Self::C => Some(Signal::Meteor),
            _ => None,
        }
    }
}

/// Key tracker that turns raw key events into direction flags and signals.
///
/// # Example
///
/// ```
/// use starfall_core::input::{Direction, InputState, Key, Signal};
///
/// let mut input = InputState::new();
/// assert_eq!(input.key_down(Key::ArrowLeft), None);
/// assert_eq!(input.key_down(Key::Space), Some(Signal::Fire));
/// assert_eq!(input.directions(), Direction::LEFT);
///
/// input.key_up(Key::ArrowLeft);
/// assert!(input.directions().is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    held: Direction,
}

impl InputState {
    /// Creates a tracker with nothing held.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            held: Direction::empty(),
        }
    }

    /// Records a key press. Returns the signal it raises, if any.
    pub fn key_down(&mut self, key: Key) -> Option<Signal> {
        if let Some(direction) = key.direction() {
            self.held.insert(direction);
            return None;
        }
        key.signal()
    }

    /// Records a key release.
    pub fn key_up(&mut self, key: Key) {
        if let Some(direction) = key.direction() {
            self.held.remove(direction);
        }
    }

    /// Directions currently held.
    #[must_use]
    pub const fn directions(&self) -> Direction {
        self.held
    }
}
