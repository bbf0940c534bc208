//! Game flow: selection state machine, scoring, deferred hides, events.
//!
//! ## Key Types
//!
//! - `MemoryGame`: owns the board and all round state
//! - `Outcome`: what one selection did
//! - `GameEvent`: signals for the presentation layer
//! - `ScoreBoard`: matched pairs per player
//! - `HideScheduler`: the cancellable hide of a mismatched pair

pub mod controller;
pub mod event;
pub mod outcome;
pub mod scheduler;
pub mod score;

pub use controller::{GameSnapshot, MemoryGame, Phase};
pub use event::GameEvent;
pub use outcome::{Outcome, RoundResult};
pub use scheduler::{HideScheduler, ScheduledHide, TaskId};
pub use score::ScoreBoard;
