//! # memory-pairs
//!
//! A matching-pairs ("memory") game engine: a grid of face-down cards, two
//! of each symbol, turned over two at a time until every pair is found.
//!
//! ## Design Principles
//!
//! 1. **Presentation-agnostic**: the engine never touches images, widgets or
//!    dialogs. A front end forwards clicks to `MemoryGame::select_card` and
//!    renders the returned `Outcome` and queued `GameEvent`s.
//!
//! 2. **Deterministic**: every game owns a seeded `GameRng`; the same seed
//!    deals the same rounds.
//!
//! 3. **No stale timers**: the hide of a mismatched pair is a cancellable
//!    task identified by `TaskId`. Resetting a round cancels it, and a late
//!    callback for an old task is ignored.
//!
//! ## Modules
//!
//! - `core`: players, RNG, configuration, errors
//! - `cards`: symbols and per-card state
//! - `board`: dealing, lookup and reshuffling of the grid
//! - `game`: the selection state machine, scores, deferred hides, events
//! - `runtime`: tokio timers driving the deferred hide (feature `async`)

pub mod board;
pub mod cards;
pub mod core;
pub mod game;
#[cfg(feature = "async")]
pub mod runtime;

// Re-export commonly used types
pub use crate::core::{
    ConfigError, GameConfig, GameError, GameMode, GameRng, GameRngState, InvalidSelection,
    PlayerId, PlayerMap,
};

pub use crate::cards::{Card, Face, SymbolId};

pub use crate::board::Board;

pub use crate::game::{
    GameEvent, GameSnapshot, HideScheduler, MemoryGame, Outcome, Phase, RoundResult,
    ScheduledHide, ScoreBoard, TaskId,
};

#[cfg(feature = "async")]
pub use crate::runtime::AsyncGame;
