//! Core engine types: players, RNG, configuration, errors.
//!
//! These are shared by the board and the game controller and carry no
//! game-flow logic of their own.

pub mod config;
pub mod error;
pub mod player;
pub mod rng;

pub use config::{GameConfig, GameMode, DEFAULT_MISMATCH_DELAY_MS, DEFAULT_SYMBOL_COUNT, MAX_SYMBOL_COUNT};
pub use error::{ConfigError, GameError, InvalidSelection};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
