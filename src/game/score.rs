//! Per-player matched-pair counts.

use serde::{Deserialize, Serialize};

use super::outcome::RoundResult;
use crate::core::config::GameMode;
use crate::core::player::{PlayerId, PlayerMap};

/// Matched pairs per player, maintained incrementally by the controller.
///
/// Counts only go up during a round; `clear` is the only way back to zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    pairs: PlayerMap<u32>,
}

impl ScoreBoard {
    /// All players at zero.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            pairs: PlayerMap::with_value(player_count, 0),
        }
    }

    /// Pairs found by `player`. Unknown players have found none.
    #[must_use]
    pub fn score_of(&self, player: PlayerId) -> u32 {
        self.pairs.get(player).copied().unwrap_or(0)
    }

    /// Credit `player` with one pair and return the new count.
    pub fn award(&mut self, player: PlayerId) -> u32 {
        match self.pairs.get_mut(player) {
            Some(score) => {
                *score += 1;
                *score
            }
            None => 0,
        }
    }

    /// Pairs found by everyone.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.pairs.iter().map(|(_, s)| *s).sum()
    }

    pub fn clear(&mut self) {
        self.pairs.values_mut().for_each(|s| *s = 0);
    }

    /// (player, score) in player order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, u32)> + '_ {
        self.pairs.iter().map(|(p, s)| (p, *s))
    }

    /// Winner by strictly higher count, or a tie.
    #[must_use]
    pub fn result(&self, mode: GameMode) -> RoundResult {
        if mode == GameMode::Single {
            return RoundResult::Solo;
        }
        let best = self.iter().map(|(_, s)| s).max().unwrap_or(0);
        let mut leaders = self.iter().filter(|&(_, s)| s == best);
        match (leaders.next(), leaders.next()) {
            (Some((player, _)), None) => RoundResult::Winner(player),
            _ => RoundResult::Tie,
        }
    }
}
