//! Timer-driven wrapper around `MemoryGame`.
//!
//! `AsyncGame` turns each scheduled hide into a tokio task that sleeps for
//! the reveal window and then fires the hide. Events from every call, and
//! from the timer, are streamed over an unbounded channel in order.
//!
//! `reset` aborts the timer task. The task id check inside
//! `MemoryGame::fire` covers the race where the task wakes between the
//! abort and the reset.

use log::{debug, trace};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::core::config::GameConfig;
use crate::core::error::GameError;
use crate::game::{GameEvent, GameSnapshot, MemoryGame, Outcome, ScheduledHide};

/// A `MemoryGame` with real mismatch timers.
pub struct AsyncGame {
    game: Arc<Mutex<MemoryGame>>,
    hide_task: Option<JoinHandle<()>>,
    events: UnboundedSender<GameEvent>,
}

impl AsyncGame {
    /// Deal a new game; returns the game and its event stream.
    pub fn new(config: GameConfig) -> Result<(Self, UnboundedReceiver<GameEvent>), GameError> {
        Ok(Self::from_game(MemoryGame::new(config)?))
    }

    /// Drive an existing game. Events already queued on it are forwarded first.
    pub fn from_game(mut game: MemoryGame) -> (Self, UnboundedReceiver<GameEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        forward(&mut game, &tx);
        let this = Self {
            game: Arc::new(Mutex::new(game)),
            hide_task: None,
            events: tx,
        };
        (this, rx)
    }

    /// Select a card; a mismatch starts the hide timer.
    pub async fn select_card(&mut self, position: usize) -> Result<Outcome, GameError> {
        let outcome = {
            let mut game = self.game.lock().await;
            let outcome = game.select_card(position);
            forward(&mut game, &self.events);
            outcome
        };

        if let Ok(Outcome::Mismatch { hide, .. }) = outcome {
            self.spawn_hide(hide);
        }
        outcome
    }

    fn spawn_hide(&mut self, hide: ScheduledHide) {
        self.abort_hide();
        let game = Arc::clone(&self.game);
        let events = self.events.clone();
        self.hide_task = Some(tokio::spawn(async move {
            tokio::time::sleep(hide.delay).await;
            let mut game = game.lock().await;
            if game.fire(hide.task) {
                forward(&mut game, &events);
            }
        }));
    }

    fn abort_hide(&mut self) {
        if let Some(task) = self.hide_task.take() {
            if !task.is_finished() {
                debug!("aborting hide timer");
            }
            task.abort();
        }
    }

    /// Cancel any running hide timer and deal a new round.
    pub async fn reset(&mut self) {
        self.abort_hide();
        let mut game = self.game.lock().await;
        game.reset();
        forward(&mut game, &self.events);
    }

    /// Whether a hide timer is still running.
    #[must_use]
    pub fn hide_pending(&self) -> bool {
        self.hide_task.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub async fn snapshot(&self) -> GameSnapshot {
        self.game.lock().await.snapshot()
    }

    /// Run a read-only query against the game.
    pub async fn with_game<R>(&self, f: impl FnOnce(&MemoryGame) -> R) -> R {
        let game = self.game.lock().await;
        f(&game)
    }
}

impl Drop for AsyncGame {
    fn drop(&mut self) {
        self.abort_hide();
    }
}

fn forward(game: &mut MemoryGame, events: &UnboundedSender<GameEvent>) {
    for event in game.drain_events() {
        if events.send(event).is_err() {
            trace!("event receiver dropped");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::cards::SymbolId;
    use crate::core::PlayerId;
    use crate::game::Phase;
    use std::time::Duration;

    const A: SymbolId = SymbolId(0);
    const B: SymbolId = SymbolId(1);

    fn two_player(deck: &[SymbolId]) -> MemoryGame {
        let config = GameConfig::new().with_players(2).with_seed(3);
        MemoryGame::with_board(config, Board::from_symbols(deck).unwrap()).unwrap()
    }

    fn received(events: &mut UnboundedReceiver<GameEvent>) -> Vec<GameEvent> {
        let mut out = Vec::new();
        while let Ok(event) = events.try_recv() {
            out.push(event);
        }
        out
    }

    #[tokio::test(start_paused = true)]
    async fn test_hide_fires_after_delay() {
        let (mut game, _events) = AsyncGame::from_game(two_player(&[A, B, B, A]));

        game.select_card(0).await.unwrap();
        game.select_card(1).await.unwrap();
        assert!(game.hide_pending());

        tokio::time::sleep(Duration::from_millis(999)).await;
        let snapshot = game.snapshot().await;
        assert_eq!(snapshot.phase, Phase::AwaitingHide([0, 1]));
        assert_eq!(snapshot.current_player, PlayerId::FIRST);

        tokio::time::sleep(Duration::from_millis(2)).await;
        let snapshot = game.snapshot().await;
        assert_eq!(snapshot.phase, Phase::Idle);
        assert_eq!(snapshot.current_player, PlayerId::new(2));
        assert!(!game.hide_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_events_are_streamed() {
        let (mut game, mut events) = AsyncGame::from_game(two_player(&[A, B, B, A]));

        game.select_card(0).await.unwrap();
        game.select_card(1).await.unwrap();
        assert_eq!(
            received(&mut events),
            vec![
                GameEvent::RoundStarted { round: 1 },
                GameEvent::CardRevealed { position: 0, symbol: A },
                GameEvent::CardRevealed { position: 1, symbol: B },
            ]
        );

        tokio::time::sleep(Duration::from_millis(1001)).await;

        assert_eq!(
            received(&mut events),
            vec![
                GameEvent::CardHidden { position: 0 },
                GameEvent::CardHidden { position: 1 },
                GameEvent::TurnChanged { player: PlayerId::new(2) },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_timer() {
        let (mut game, mut events) = AsyncGame::from_game(two_player(&[A, B, B, A]));

        game.select_card(0).await.unwrap();
        game.select_card(1).await.unwrap();
        game.reset().await;
        assert!(!game.hide_pending());
        assert_eq!(received(&mut events).last(), Some(&GameEvent::RoundStarted { round: 2 }));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(received(&mut events).is_empty());
        let snapshot = game.snapshot().await;
        assert_eq!(snapshot.round, 2);
        assert_eq!(snapshot.current_player, PlayerId::FIRST);
        assert!(snapshot.cards.iter().all(|c| !c.is_face_up()));
    }
}
