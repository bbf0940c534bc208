//! Signals emitted for the presentation layer.
//!
//! The controller queues events as it mutates the board; presentation drains
//! them after each call and renders them in order.

use serde::{Deserialize, Serialize};

use super::outcome::RoundResult;
use crate::cards::SymbolId;
use crate::core::error::InvalidSelection;
use crate::core::player::PlayerId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A card was turned face-up.
    CardRevealed { position: usize, symbol: SymbolId },

    /// A card was turned back face-down.
    CardHidden { position: usize },

    /// A card became part of a found pair.
    CardMatched { position: usize, player: PlayerId },

    /// The other player is now acting.
    TurnChanged { player: PlayerId },

    ScoreChanged { player: PlayerId, score: u32 },

    /// All pairs found. Fired once per round.
    RoundComplete(RoundResult),

    /// A fresh round was dealt.
    RoundStarted { round: u32 },

    /// A click was ignored; nothing changed.
    SelectionIgnored {
        position: usize,
        reason: InvalidSelection,
    },
}

impl GameEvent {
    /// Board position this event refers to, if any.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        match self {
            GameEvent::CardRevealed { position, .. }
            | GameEvent::CardHidden { position }
            | GameEvent::CardMatched { position, .. }
            | GameEvent::SelectionIgnored { position, .. } => Some(*position),
            GameEvent::TurnChanged { .. }
            | GameEvent::ScoreChanged { .. }
            | GameEvent::RoundComplete(_)
            | GameEvent::RoundStarted { .. } => None,
        }
    }
}
