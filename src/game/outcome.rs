//! Results of a selection and of a round.

use serde::{Deserialize, Serialize};

use super::scheduler::ScheduledHide;
use crate::cards::SymbolId;
use crate::core::error::InvalidSelection;
use crate::core::player::PlayerId;

/// How a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundResult {
    /// One player found strictly more pairs.
    Winner(PlayerId),
    /// Players finished level.
    Tie,
    /// Single-player round: completion only, no winner.
    Solo,
}

impl RoundResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        matches!(self, RoundResult::Winner(p) if *p == player)
    }

    /// The winning player, if there is one.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            RoundResult::Winner(p) => Some(*p),
            RoundResult::Tie | RoundResult::Solo => None,
        }
    }
}

/// What a single `select_card` call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Nothing changed; the click was redundant.
    Ignored(InvalidSelection),

    /// First card of a pair turned over.
    Revealed { position: usize, symbol: SymbolId },

    /// Second card matched the first. `round` is set when this was the last pair.
    Matched {
        player: PlayerId,
        positions: [usize; 2],
        round: Option<RoundResult>,
    },

    /// Second card did not match; both stay visible until `hide` fires.
    Mismatch {
        positions: [usize; 2],
        hide: ScheduledHide,
    },
}

impl Outcome {
    /// True for every outcome except `Ignored`.
    #[must_use]
    pub fn changed_state(&self) -> bool {
        !matches!(self, Outcome::Ignored(_))
    }
}
