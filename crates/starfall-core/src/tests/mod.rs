//! Cross-module scenario tests.
//!
//! - `determinism.rs`: same seed and input script give identical games
//! - `integration.rs`: full-session scenarios driven through timers, keys
//!   and bus messages
//! - `helpers.rs`: session setup and arena shortcuts

mod helpers;

pub use helpers::*;
