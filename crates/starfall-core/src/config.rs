//! Session configuration.
//!
//! [`GameConfig`] gathers every gameplay constant in one serde-friendly
//! struct. The defaults reproduce the classic browser build; adapters can
//! override any field from JSON with [`GameConfig::from_json`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::EntityTag;

/// Number of enemies per wave row.
pub const WAVE_COLUMNS: u32 = 5;
/// Number of wave rows.
pub const WAVE_ROWS: u32 = 2;

/// Reasons a [`GameConfig`] is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `total_stages` was zero.
    #[error("total_stages must be at least 1")]
    NoStages,
    /// `hero_lives` was zero.
    #[error("hero_lives must be at least 1")]
    NoLives,
    /// `charge_max` was zero, so the meteor could never be gated.
    #[error("charge_max must be positive")]
    ZeroChargeMax,
    /// `charge_per_kill` was zero, so the meteor could never be earned.
    #[error("charge_per_kill must be positive")]
    ZeroChargePerKill,
    /// `shield_drop_chance` was not a probability.
    #[error("shield_drop_chance must lie in [0, 1], got {0}")]
    DropChanceOutOfRange(f64),
    /// `tick_period_ms` was zero.
    #[error("tick_period_ms must be positive")]
    ZeroTickPeriod,
    /// `cooldown_decay_ms` was zero, so the fire cooldown would never drain.
    #[error("cooldown_decay_ms must be positive")]
    ZeroCooldownDecay,
    /// `boss_fire_period_ms` was zero.
    #[error("boss_fire_period_ms must be positive")]
    ZeroBossFirePeriod,
    /// The screen cannot hold a wave row or the hero spawn point.
    #[error("screen {width}x{height} is smaller than the minimum {min_width}x{min_height}")]
    ScreenTooSmall {
        /// Configured width
        width: u32,
        /// Configured height
        height: u32,
        /// Smallest accepted width
        min_width: u32,
        /// Smallest accepted height
        min_height: u32,
    },
    /// The JSON document could not be parsed.
    #[error("invalid config document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Gameplay constants for one session.
///
/// Time values are in milliseconds of logical time; the shield duration is
/// counted in driver ticks.
///
/// # Example
///
/// ```
/// use starfall_core::config::GameConfig;
///
/// let config = GameConfig::from_json(r#"{ "total_stages": 5 }"#).unwrap();
/// assert_eq!(config.total_stages, 5);
/// assert_eq!(config.charge_max, 500);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Screen width
    pub screen_width: u32,
    /// Screen height
    pub screen_height: u32,
    /// Stages to clear for a win; the last one is the boss stage
    pub total_stages: u32,
    /// Charge needed to launch a meteor
    pub charge_max: u32,
    /// Charge gained per kill
    pub charge_per_kill: u32,
    /// Points gained per kill
    pub points_per_kill: u64,
    /// Starting lives
    pub hero_lives: u32,
    /// Hero movement per tick per held direction
    pub hero_step: f32,
    /// Shield duration in driver ticks
    pub shield_duration_ticks: u32,
    /// Probability that a kill drops a shield pickup
    pub shield_drop_chance: f64,
    /// Driver tick period
    pub tick_period_ms: u64,
    /// Cooldown set by each shot
    pub fire_cooldown_ms: u32,
    /// Period of the cooldown decay timer (it removes this much per firing)
    pub cooldown_decay_ms: u64,
    /// Delay between a meteor clear and the next stage
    pub stage_advance_delay_ms: u64,
    /// Boss fire period
    pub boss_fire_period_ms: u64,
    /// Seed for the shield-drop RNG
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 1024,
            screen_height: 768,
            total_stages: 3,
            charge_max: 500,
            charge_per_kill: 50,
            points_per_kill: 100,
            hero_lives: 3,
            hero_step: 5.0,
            shield_duration_ticks: 50,
            shield_drop_chance: 0.2,
            tick_period_ms: 100,
            fire_cooldown_ms: 500,
            cooldown_decay_ms: 100,
            stage_advance_delay_ms: 3000,
            boss_fire_period_ms: 1000,
            seed: 0,
        }
    }
}

impl GameConfig {
    /// Parses a (possibly partial) JSON document over the defaults and
    /// validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and any validation
    /// error from [`GameConfig::validate`].
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns a copy with a different RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Smallest screen that fits a full wave row and the hero spawn point.
    #[must_use]
    pub fn min_screen() -> (u32, u32) {
        let row = WAVE_COLUMNS * EntityTag::Enemy.size().width;
        let widest = EntityTag::Meteor.size().width.max(EntityTag::Boss.size().width);
        // The hero spawns a quarter screen above the bottom edge.
        let height = EntityTag::Hero.size().height * 4;
        (row.max(widest), height)
    }

    /// Checks that the configuration describes a playable game.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_stages == 0 {
            return Err(ConfigError::NoStages);
        }
        if self.hero_lives == 0 {
            return Err(ConfigError::NoLives);
        }
        if self.charge_max == 0 {
            return Err(ConfigError::ZeroChargeMax);
        }
        if self.charge_per_kill == 0 {
            return Err(ConfigError::ZeroChargePerKill);
        }
        if !(0.0..=1.0).contains(&self.shield_drop_chance) {
            return Err(ConfigError::DropChanceOutOfRange(self.shield_drop_chance));
        }
        if self.tick_period_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        if self.cooldown_decay_ms == 0 {
            return Err(ConfigError::ZeroCooldownDecay);
        }
        if self.boss_fire_period_ms == 0 {
            return Err(ConfigError::ZeroBossFirePeriod);
        }
        let (min_width, min_height) = Self::min_screen();
        if self.screen_width < min_width || self.screen_height < min_height {
            return Err(ConfigError::ScreenTooSmall {
                width: self.screen_width,
                height: self.screen_height,
                min_width,
                min_height,
            });
        }
        Ok(())
    }

    /// Screen width as a float.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn width(&self) -> f32 {
        self.screen_width as f32
    }

    /// Screen height as a float.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn height(&self) -> f32 {
        self.screen_height as f32
    }
}
