//! Error taxonomy.
//!
//! - `ConfigError`: the game cannot start.
//! - `GameError`: a caller bug surfaced from a single call.
//! - `InvalidSelection`: a redundant click, reported inside
//!   `Outcome::Ignored` rather than as an `Err`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid configuration or deck layout. Fatal at construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("a round needs at least one symbol pair")]
    NoSymbols,

    #[error("{count} symbols requested, at most {max} are supported")]
    TooManySymbols { count: usize, max: usize },

    #[error("{0} players requested, only 1 or 2 are supported")]
    UnsupportedPlayers(usize),

    #[error("symbol {symbol} appears {count} times, expected exactly 2")]
    UnpairedSymbol { symbol: u16, count: usize },

    #[error("invalid configuration JSON: {0}")]
    Json(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err.to_string())
    }
}

/// Errors surfaced by controller calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("position {position} is out of range for a board of {len} cards")]
    PositionOutOfRange { position: usize, len: usize },
}

/// Why a selection was ignored. Never changes game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum InvalidSelection {
    #[error("the round is already complete")]
    RoundComplete,

    #[error("card is already matched")]
    AlreadyMatched,

    #[error("card is already the pending selection")]
    AlreadySelected,

    #[error("a mismatched pair is still waiting to be hidden")]
    AwaitingHide,
}
