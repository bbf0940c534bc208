//! Game configuration.
//!
//! A `GameConfig` fixes everything about a game that does not change between
//! rounds: how many pairs are dealt, how many players take turns, and how long
//! a mismatched pair stays visible. It can be built in code or loaded from
//! JSON, where every field is optional:
//!
//! ```
//! use memory_pairs::core::{GameConfig, GameMode};
//!
//! let config = GameConfig::from_json(r#"{ "players": 2, "mismatch_delay_ms": 750 }"#).unwrap();
//! assert_eq!(config.symbol_count, 8);
//! assert_eq!(config.mode(), GameMode::TwoPlayer);
//! assert_eq!(config.card_count(), 16);
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::ConfigError;

/// Default number of distinct pairs (a 4x4 grid).
pub const DEFAULT_SYMBOL_COUNT: usize = 8;

/// Default time a mismatched pair stays face-up.
pub const DEFAULT_MISMATCH_DELAY_MS: u64 = 1000;

/// Largest deck a `SymbolId` can address.
pub const MAX_SYMBOL_COUNT: usize = u16::MAX as usize;

/// Single-player practice or two players taking turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// One player; no turns, no winner.
    Single,
    /// Two players alternating on mismatches.
    TwoPlayer,
}

impl GameMode {
    /// Number of players in this mode.
    #[must_use]
    pub const fn player_count(self) -> usize {
        match self {
            GameMode::Single => 1,
            GameMode::TwoPlayer => 2,
        }
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of distinct pairs; the board holds twice as many cards.
    pub symbol_count: usize,

    /// Number of players, 1 or 2.
    pub players: usize,

    /// Delay before a non-matching pair is turned back over.
    pub mismatch_delay_ms: u64,

    /// Shuffle seed. `None` draws one from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            symbol_count: DEFAULT_SYMBOL_COUNT,
            players: 1,
            mismatch_delay_ms: DEFAULT_MISMATCH_DELAY_MS,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Default configuration: 8 pairs, one player, 1000ms mismatch delay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the number of distinct pairs.
    #[must_use]
    pub fn with_symbol_count(mut self, symbol_count: usize) -> Self {
        self.symbol_count = symbol_count;
        self
    }

    /// Set the number of players.
    #[must_use]
    pub fn with_players(mut self, players: usize) -> Self {
        self.players = players;
        self
    }

    /// Set the mismatch reveal window.
    #[must_use]
    pub fn with_mismatch_delay(mut self, delay: Duration) -> Self {
        self.mismatch_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Fix the shuffle seed for reproducible deals.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that a game can be started with this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbol_count == 0 {
            return Err(ConfigError::NoSymbols);
        }
        if self.symbol_count > MAX_SYMBOL_COUNT {
            return Err(ConfigError::TooManySymbols {
                count: self.symbol_count,
                max: MAX_SYMBOL_COUNT,
            });
        }
        if !(1..=2).contains(&self.players) {
            return Err(ConfigError::UnsupportedPlayers(self.players));
        }
        Ok(())
    }

    /// Game mode implied by the player count.
    #[must_use]
    pub fn mode(&self) -> GameMode {
        if self.players >= 2 {
            GameMode::TwoPlayer
        } else {
            GameMode::Single
        }
    }

    /// Number of cards on the board.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.symbol_count * 2
    }

    /// Mismatch reveal window as a `Duration`.
    #[must_use]
    pub fn mismatch_delay(&self) -> Duration {
        Duration::from_millis(self.mismatch_delay_ms)
    }
}
