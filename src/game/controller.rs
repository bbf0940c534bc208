//! The game controller: a state machine over one board.
//!
//! ```text
//!            select                select (match)
//!   Idle ───────────▶ OneSelected ───────────────▶ Idle ──▶ … ──▶ RoundComplete
//!    ▲                     │
//!    │ hide fires          │ select (mismatch)
//!    └──── AwaitingHide ◀──┘
//! ```
//!
//! Evaluating the second card happens inside a single `select_card` call and
//! is never observable from outside.
//!
//! ## Ordering guarantee
//!
//! While a mismatched pair waits to be hidden every selection is ignored, so
//! at most two unmatched cards are ever face-up. `reset` cancels the pending
//! hide; a hide claimed with a stale `TaskId` does nothing.
//!
//! ## Example
//!
//! ```
//! use memory_pairs::board::Board;
//! use memory_pairs::cards::SymbolId;
//! use memory_pairs::core::{GameConfig, PlayerId};
//! use memory_pairs::game::{MemoryGame, Outcome, RoundResult};
//!
//! let (a, b) = (SymbolId::new(0), SymbolId::new(1));
//! let board = Board::from_symbols(&[a, b, a, b]).unwrap();
//! let mut game = MemoryGame::with_board(GameConfig::new().with_players(2), board).unwrap();
//!
//! game.select_card(0).unwrap();
//! game.select_card(2).unwrap();
//! game.select_card(1).unwrap();
//! let last = game.select_card(3).unwrap();
//!
//! assert!(matches!(
//!     last,
//!     Outcome::Matched { round: Some(RoundResult::Winner(PlayerId(1))), .. }
//! ));
//! ```

use im::Vector;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::event::GameEvent;
use super::outcome::{Outcome, RoundResult};
use super::scheduler::{HideScheduler, ScheduledHide, TaskId};
use super::score::ScoreBoard;
use crate::board::Board;
use crate::cards::Card;
use crate::core::config::{GameConfig, GameMode};
use crate::core::error::{GameError, InvalidSelection};
use crate::core::player::{PlayerId, PlayerMap};
use crate::core::rng::GameRng;

/// Selection state of the current round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No card pending.
    Idle,
    /// One face-up unmatched card waiting for its partner.
    OneSelected(usize),
    /// A mismatched pair is face-up until the scheduled hide fires.
    AwaitingHide([usize; 2]),
    /// Every pair is found. Terminal until `reset`.
    RoundComplete(RoundResult),
}

/// Read-only copy of the game for rendering.
///
/// Cloning the cards is O(1); the snapshot shares structure with the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub round: u32,
    pub mode: GameMode,
    pub current_player: PlayerId,
    pub phase: Phase,
    pub scores: PlayerMap<u32>,
    pub matched_pairs: usize,
    pub cards: Vector<Card>,
    pub pending_hide: Option<ScheduledHide>,
}

/// One game instance: board, turn, scores, and the deferred hide.
pub struct MemoryGame {
    config: GameConfig,
    rng: GameRng,
    board: Board,
    phase: Phase,
    current_player: PlayerId,
    scores: ScoreBoard,
    matched_pairs: usize,
    scheduler: HideScheduler,
    round: u32,
    events: Vec<GameEvent>,
}

impl MemoryGame {
    /// Validate `config` and deal the first round.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let rng = GameRng::from_seed_or_entropy(config.seed);
        let board = Board::build(config.symbol_count, &mut rng.for_context("deal"))?;
        Ok(Self::start(config, rng, board))
    }

    /// Start the first round on a fixed arrangement.
    ///
    /// The board decides the symbol count; later rounds are shuffled from
    /// the configured seed.
    pub fn with_board(config: GameConfig, board: Board) -> Result<Self, GameError> {
        board.check_pairs()?;
        let config = config.with_symbol_count(board.symbol_count());
        config.validate()?;
        let rng = GameRng::from_seed_or_entropy(config.seed);
        Ok(Self::start(config, rng, board))
    }

    fn start(config: GameConfig, rng: GameRng, board: Board) -> Self {
        let mode = config.mode();
        info!(
            "new game: {} pairs, {:?}, seed {}",
            config.symbol_count,
            mode,
            rng.seed()
        );
        Self {
            scores: ScoreBoard::new(mode.player_count()),
            config,
            rng: rng.for_context("reshuffle"),
            board,
            phase: Phase::Idle,
            current_player: PlayerId::FIRST,
            matched_pairs: 0,
            scheduler: HideScheduler::new(),
            round: 1,
            events: vec![GameEvent::RoundStarted { round: 1 }],
        }
    }

    /// Turn over the card at `position`.
    ///
    /// Redundant clicks come back as `Outcome::Ignored`; only an
    /// out-of-range position is an error.
    pub fn select_card(&mut self, position: usize) -> Result<Outcome, GameError> {
        let card = self.board.card_at(position)?;
        let symbol = card.symbol();
        let matched = card.is_matched();

        let phase = self.phase;
        let first = match phase {
            Phase::RoundComplete(_) => {
                return Ok(self.ignore(position, InvalidSelection::RoundComplete))
            }
            Phase::AwaitingHide(_) => {
                return Ok(self.ignore(position, InvalidSelection::AwaitingHide))
            }
            _ if matched => return Ok(self.ignore(position, InvalidSelection::AlreadyMatched)),
            Phase::OneSelected(first) if first == position => {
                return Ok(self.ignore(position, InvalidSelection::AlreadySelected))
            }
            Phase::OneSelected(first) => Some(first),
            Phase::Idle => None,
        };

        debug!("{} turns over card {}", self.current_player, position);
        self.board.card_mut(position)?.reveal();
        self.events.push(GameEvent::CardRevealed { position, symbol });

        match first {
            None => {
                self.phase = Phase::OneSelected(position);
                Ok(Outcome::Revealed { position, symbol })
            }
            Some(first) => self.evaluate(first, position),
        }
    }

    fn ignore(&mut self, position: usize, reason: InvalidSelection) -> Outcome {
        trace!("ignored card {}: {}", position, reason);
        self.events
            .push(GameEvent::SelectionIgnored { position, reason });
        Outcome::Ignored(reason)
    }

    fn evaluate(&mut self, first: usize, second: usize) -> Result<Outcome, GameError> {
        let positions = [first, second];
        let same = self.board.card_at(first)?.symbol() == self.board.card_at(second)?.symbol();

        if !same {
            let hide = self
                .scheduler
                .schedule(positions, self.config.mismatch_delay());
            debug!(
                "mismatch at {:?}, hiding at {:?} ({})",
                positions, hide.due, hide.task
            );
            self.phase = Phase::AwaitingHide(positions);
            return Ok(Outcome::Mismatch { positions, hide });
        }

        let player = self.current_player;
        let credit = match self.config.mode() {
            GameMode::TwoPlayer => Some(player),
            GameMode::Single => None,
        };
        for position in positions {
            self.board.card_mut(position)?.mark_matched(credit);
            self.events.push(GameEvent::CardMatched { position, player });
        }
        let score = self.scores.award(player);
        self.matched_pairs += 1;
        self.events.push(GameEvent::ScoreChanged { player, score });
        debug!("{} matched {:?}, score {}", player, positions, score);

        let round = if self.matched_pairs == self.config.symbol_count {
            let result = self.scores.result(self.config.mode());
            info!("round {} complete: {:?}", self.round, result);
            self.phase = Phase::RoundComplete(result);
            self.events.push(GameEvent::RoundComplete(result));
            Some(result)
        } else {
            self.phase = Phase::Idle;
            None
        };

        Ok(Outcome::Matched {
            player,
            positions,
            round,
        })
    }

    /// Move the logical clock forward, running the hide if it became due.
    ///
    /// Returns `true` when a pair was hidden.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        match self.scheduler.advance(elapsed) {
            Some(hide) => {
                self.resolve(hide);
                true
            }
            None => false,
        }
    }

    /// Run the hide scheduled as `task`, as a timer callback would.
    ///
    /// Stale or cancelled tasks are ignored and return `false`.
    pub fn fire(&mut self, task: TaskId) -> bool {
        match self.scheduler.take_if(task) {
            Some(hide) => {
                self.resolve(hide);
                true
            }
            None => {
                trace!("{} is stale, nothing to hide", task);
                false
            }
        }
    }

    /// Hide a pending mismatch now, without waiting for the delay.
    pub fn resolve_pending_hide(&mut self) -> bool {
        match self.scheduler.take() {
            Some(hide) => {
                self.resolve(hide);
                true
            }
            None => false,
        }
    }

    fn resolve(&mut self, hide: ScheduledHide) {
        for position in hide.positions {
            if let Ok(card) = self.board.card_mut(position) {
                card.hide();
                self.events.push(GameEvent::CardHidden { position });
            }
        }
        self.phase = Phase::Idle;
        debug!("hid {:?} ({})", hide.positions, hide.task);

        if self.config.mode() == GameMode::TwoPlayer {
            self.current_player = self.current_player.next(GameMode::TwoPlayer.player_count());
            self.events.push(GameEvent::TurnChanged {
                player: self.current_player,
            });
        }
    }

    /// Abandon the current round and deal a new one.
    ///
    /// Any pending hide is cancelled; it can no longer fire.
    pub fn reset(&mut self) {
        if let Some(hide) = self.scheduler.cancel() {
            debug!("cancelled {} on reset", hide.task);
        }
        self.board.reshuffle(&mut self.rng);
        self.scores.clear();
        self.matched_pairs = 0;
        self.current_player = PlayerId::FIRST;
        self.phase = Phase::Idle;
        self.round += 1;
        info!("round {} dealt", self.round);
        self.events.push(GameEvent::RoundStarted { round: self.round });
    }

    /// Take every event queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Read-only views ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn card_at(&self, position: usize) -> Result<&Card, GameError> {
        self.board.card_at(position)
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.config.mode()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    #[must_use]
    pub fn score_of(&self, player: PlayerId) -> u32 {
        self.scores.score_of(player)
    }

    #[must_use]
    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    /// Pairs found this round.
    #[must_use]
    pub fn matched_pairs(&self) -> usize {
        self.matched_pairs
    }

    /// 1 for the first deal, incremented by every `reset`.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn is_round_complete(&self) -> bool {
        matches!(self.phase, Phase::RoundComplete(_))
    }

    #[must_use]
    pub fn pending_hide(&self) -> Option<&ScheduledHide> {
        self.scheduler.pending()
    }

    /// Logical time seen by the hide scheduler.
    #[must_use]
    pub fn clock(&self) -> Duration {
        self.scheduler.now()
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            round: self.round,
            mode: self.mode(),
            current_player: self.current_player,
            phase: self.phase,
            scores: PlayerMap::new(self.mode().player_count(), |p| self.scores.score_of(p)),
            matched_pairs: self.matched_pairs,
            cards: self.board.to_vector(),
            pending_hide: self.scheduler.pending().copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::SymbolId;

    const A: SymbolId = SymbolId(0);
    const B: SymbolId = SymbolId(1);

    fn game(players: usize, deck: &[SymbolId]) -> MemoryGame {
        let config = GameConfig::new().with_players(players).with_seed(7);
        MemoryGame::with_board(config, Board::from_symbols(deck).unwrap()).unwrap()
    }

    #[test]
    fn test_first_selection_reveals() {
        let mut game = game(1, &[A, B, A, B]);

        let outcome = game.select_card(1).unwrap();

        assert_eq!(outcome, Outcome::Revealed { position: 1, symbol: B });
        assert_eq!(game.phase(), Phase::OneSelected(1));
        assert!(game.card_at(1).unwrap().is_pending());
    }

    #[test]
    fn test_same_card_twice_is_noop() {
        let mut game = game(2, &[A, B, A, B]);
        game.select_card(0).unwrap();
        let before = game.snapshot();

        let outcome = game.select_card(0).unwrap();

        assert_eq!(outcome, Outcome::Ignored(InvalidSelection::AlreadySelected));
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_out_of_range_is_error() {
        let mut game = game(1, &[A, B, A, B]);
        assert_eq!(
            game.select_card(4),
            Err(GameError::PositionOutOfRange { position: 4, len: 4 })
        );
        assert_eq!(game.phase(), Phase::Idle);
    }

    #[test]
    fn test_matched_card_is_not_selectable() {
        let mut game = game(1, &[A, B, A, B]);
        game.select_card(0).unwrap();
        game.select_card(2).unwrap();

        assert_eq!(
            game.select_card(2).unwrap(),
            Outcome::Ignored(InvalidSelection::AlreadyMatched)
        );
        assert_eq!(game.phase(), Phase::Idle);
    }

    #[test]
    fn test_mismatch_schedules_hide() {
        let mut game = game(2, &[A, B, B, A]);
        game.select_card(0).unwrap();

        let outcome = game.select_card(1).unwrap();

        let Outcome::Mismatch { positions, hide } = outcome else {
            panic!("expected mismatch, got {:?}", outcome);
        };
        assert_eq!(positions, [0, 1]);
        assert_eq!(hide.delay, Duration::from_millis(1000));
        assert_eq!(game.phase(), Phase::AwaitingHide([0, 1]));
        assert_eq!(game.board().face_up_unmatched().len(), 2);
        assert_eq!(game.current_player(), PlayerId::FIRST);
    }

    #[test]
    fn test_selection_blocked_while_hide_pending() {
        let mut game = game(2, &[A, B, B, A]);
        game.select_card(0).unwrap();
        game.select_card(1).unwrap();

        for position in 0..4 {
            assert_eq!(
                game.select_card(position).unwrap(),
                Outcome::Ignored(InvalidSelection::AwaitingHide)
            );
        }
        assert_eq!(game.board().face_up_unmatched().len(), 2);
    }

    #[test]
    fn test_fire_with_stale_task_does_nothing() {
        let mut game = game(2, &[A, B, B, A]);
        game.select_card(0).unwrap();
        let Outcome::Mismatch { hide, .. } = game.select_card(1).unwrap() else {
            panic!("expected mismatch");
        };

        game.reset();

        assert!(!game.fire(hide.task));
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.current_player(), PlayerId::FIRST);
    }

    #[test]
    fn test_resolve_pending_hide_switches_turn() {
        let mut game = game(2, &[A, B, B, A]);
        game.select_card(0).unwrap();
        game.select_card(1).unwrap();

        assert!(game.resolve_pending_hide());

        assert_eq!(game.current_player(), PlayerId::new(2));
        assert!(game.board().face_up_unmatched().is_empty());
        assert!(!game.resolve_pending_hide());
    }

    #[test]
    fn test_events_for_match() {
        let mut game = game(1, &[A, B, A, B]);
        game.drain_events();

        game.select_card(0).unwrap();
        game.select_card(2).unwrap();

        assert_eq!(
            game.drain_events(),
            vec![
                GameEvent::CardRevealed { position: 0, symbol: A },
                GameEvent::CardRevealed { position: 2, symbol: A },
                GameEvent::CardMatched { position: 0, player: PlayerId::FIRST },
                GameEvent::CardMatched { position: 2, player: PlayerId::FIRST },
                GameEvent::ScoreChanged { player: PlayerId::FIRST, score: 1 },
            ]
        );
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_single_player_match_credits_nobody() {
        let mut game = game(1, &[A, B, A, B]);
        game.select_card(0).unwrap();
        game.select_card(2).unwrap();

        for position in [0, 2] {
            let card = game.card_at(position).unwrap();
            assert!(card.is_matched());
            assert_eq!(card.matched_by(), None);
        }
        assert_eq!(game.board().matched_pairs(), 1);
        assert_eq!(game.score_of(PlayerId::FIRST), 1);
    }

    #[test]
    fn test_two_player_match_credits_player() {
        let mut game = game(2, &[A, B, A, B]);
        game.select_card(1).unwrap();
        game.select_card(3).unwrap();

        assert_eq!(game.card_at(1).unwrap().matched_by(), Some(PlayerId::FIRST));
        assert_eq!(game.board().pairs_matched_by(PlayerId::FIRST), 1);
    }

    #[test]
    fn test_mismatch_after_clock_saturates() {
        let mut game = game(2, &[A, B, B, A]);
        game.advance(Duration::MAX);
        game.select_card(0).unwrap();

        let outcome = game.select_card(1).unwrap();

        assert!(matches!(outcome, Outcome::Mismatch { .. }));
        assert!(game.advance(Duration::from_millis(1)));
        assert_eq!(game.current_player(), PlayerId::new(2));
    }

    #[test]
    fn test_new_validates_config() {
        assert!(matches!(
            MemoryGame::new(GameConfig::new().with_symbol_count(0)),
            Err(GameError::Config(_))
        ));
        assert!(matches!(
            MemoryGame::new(GameConfig::new().with_players(3)),
            Err(GameError::Config(_))
        ));
    }

    #[test]
    fn test_with_board_uses_board_symbol_count() {
        let game = game(1, &[A, B, A, B]);
        assert_eq!(game.config().symbol_count, 2);
        assert_eq!(game.round(), 1);
    }
}
