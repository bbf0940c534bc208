//! The card grid.
//!
//! The `Board` owns every card in a round, in position order. It deals the
//! deck, answers position lookups, and reshuffles between rounds. It knows
//! nothing about turns or scores; the game controller drives it.
//!
//! ## Pair invariant
//!
//! Every symbol present on the board appears on exactly two cards. Both
//! `build` and `reshuffle` deal from the canonical deck `0,0,1,1,...` so the
//! invariant holds by construction; `from_symbols` checks it explicitly.

use im::Vector;
use log::trace;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt;

use crate::cards::{Card, SymbolId};
use crate::core::config::MAX_SYMBOL_COUNT;
use crate::core::error::{ConfigError, GameError};
use crate::core::player::PlayerId;
use crate::core::rng::GameRng;

/// Positions of a small set of cards: a pair, or the face-up selection.
pub type Positions = SmallVec<[usize; 2]>;

/// Ordered collection of cards.
///
/// Backed by `im::Vector` so `clone()` is O(1); presentation snapshots share
/// structure with the live board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cards: Vector<Card>,
    symbol_count: usize,
}

impl Board {
    /// Deal `2 * symbol_count` cards in a uniformly random order.
    pub fn build(symbol_count: usize, rng: &mut GameRng) -> Result<Self, ConfigError> {
        if symbol_count == 0 {
            return Err(ConfigError::NoSymbols);
        }
        if symbol_count > MAX_SYMBOL_COUNT {
            return Err(ConfigError::TooManySymbols {
                count: symbol_count,
                max: MAX_SYMBOL_COUNT,
            });
        }

        let mut deck = canonical_deck(symbol_count);
        rng.shuffle(&mut deck);
        trace!("dealt {} cards", deck.len());

        Ok(Self::from_deck(deck, symbol_count))
    }

    /// Lay out a fixed arrangement, e.g. to replay a known deal.
    ///
    /// ```
    /// use memory_pairs::board::Board;
    /// use memory_pairs::cards::SymbolId;
    ///
    /// let (a, b) = (SymbolId::new(0), SymbolId::new(1));
    /// let board = Board::from_symbols(&[a, b, a, b]).unwrap();
    /// assert_eq!(board.len(), 4);
    /// assert_eq!(board.symbol_count(), 2);
    /// assert!(Board::from_symbols(&[a, b, a]).is_err());
    /// ```
    pub fn from_symbols(symbols: &[SymbolId]) -> Result<Self, ConfigError> {
        if symbols.is_empty() {
            return Err(ConfigError::NoSymbols);
        }
        check_pairs(symbols.iter().copied())?;

        let symbol_count = symbols.len() / 2;
        Ok(Self::from_deck(symbols.to_vec(), symbol_count))
    }

    fn from_deck(deck: Vec<SymbolId>, symbol_count: usize) -> Self {
        let cards = deck
            .into_iter()
            .enumerate()
            .map(|(position, symbol)| Card::new(symbol, position))
            .collect();
        Self {
            cards,
            symbol_count,
        }
    }

    /// Re-deal every position, face-down and unmatched.
    ///
    /// The new arrangement is drawn from a fresh canonical deck, so it is
    /// independent of the previous one.
    pub fn reshuffle(&mut self, rng: &mut GameRng) {
        let mut deck = canonical_deck(self.symbol_count);
        rng.shuffle(&mut deck);
        for (card, symbol) in self.cards.iter_mut().zip(deck) {
            card.redeal(symbol);
        }
        trace!("reshuffled {} cards", self.cards.len());
    }

    /// Card at `position`.
    pub fn card_at(&self, position: usize) -> Result<&Card, GameError> {
        self.cards.get(position).ok_or(GameError::PositionOutOfRange {
            position,
            len: self.cards.len(),
        })
    }

    pub(crate) fn card_mut(&mut self, position: usize) -> Result<&mut Card, GameError> {
        let len = self.cards.len();
        self.cards
            .get_mut(position)
            .ok_or(GameError::PositionOutOfRange { position, len })
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of distinct pairs dealt.
    #[must_use]
    pub fn symbol_count(&self) -> usize {
        self.symbol_count
    }

    /// Cards in position order.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Cheap structural copy of the cards for read-only views.
    #[must_use]
    pub fn to_vector(&self) -> Vector<Card> {
        self.cards.clone()
    }

    /// Positions of cards that are face-up and not yet matched.
    #[must_use]
    pub fn face_up_unmatched(&self) -> Positions {
        self.cards
            .iter()
            .filter(|c| c.is_pending())
            .map(Card::position)
            .collect()
    }

    /// Positions holding `symbol`.
    #[must_use]
    pub fn positions_of(&self, symbol: SymbolId) -> Positions {
        self.cards
            .iter()
            .filter(|c| c.symbol() == symbol)
            .map(Card::position)
            .collect()
    }

    /// Number of pairs found so far.
    #[must_use]
    pub fn matched_pairs(&self) -> usize {
        self.cards.iter().filter(|c| c.is_matched()).count() / 2
    }

    /// Number of pairs credited to `player`, derived from the cards alone.
    ///
    /// Single-player matches are credited to nobody.
    #[must_use]
    pub fn pairs_matched_by(&self, player: PlayerId) -> usize {
        self.cards
            .iter()
            .filter(|c| c.matched_by() == Some(player))
            .count()
            / 2
    }

    /// Whether every pair has been found.
    #[must_use]
    pub fn all_matched(&self) -> bool {
        self.cards.iter().all(Card::is_matched)
    }

    /// Verify the pair invariant.
    pub fn check_pairs(&self) -> Result<(), ConfigError> {
        check_pairs(self.cards.iter().map(Card::symbol))
    }
}

fn canonical_deck(symbol_count: usize) -> Vec<SymbolId> {
    (0..symbol_count)
        .flat_map(|s| {
            let symbol = SymbolId::new(s as u16);
            [symbol, symbol]
        })
        .collect()
}

fn check_pairs(symbols: impl Iterator<Item = SymbolId>) -> Result<(), ConfigError> {
    let mut counts: FxHashMap<SymbolId, usize> = FxHashMap::default();
    for symbol in symbols {
        *counts.entry(symbol).or_default() += 1;
    }

    let mut unpaired: Vec<_> = counts.into_iter().filter(|&(_, count)| count != 2).collect();
    unpaired.sort_unstable();
    match unpaired.first() {
        Some(&(symbol, count)) => Err(ConfigError::UnpairedSymbol {
            symbol: symbol.raw(),
            count,
        }),
        None => Ok(()),
    }
}

/// Renders the grid row by row: `??` face-down, the symbol number when
/// face-up, `--` when matched.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.cards.len() as f64).sqrt().ceil().max(1.0) as usize;
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                f.write_str(if i % width == 0 { "\n" } else { " " })?;
            }
            if card.is_matched() {
                f.write_str("--")?;
            } else if card.is_face_up() {
                write!(f, "{:>2}", card.symbol().raw())?;
            } else {
                f.write_str("??")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(raw: &[u16]) -> Vec<SymbolId> {
        raw.iter().copied().map(SymbolId::new).collect()
    }

    #[test]
    fn test_build_deals_pairs() {
        let mut rng = GameRng::new(42);
        let board = Board::build(8, &mut rng).unwrap();

        assert_eq!(board.len(), 16);
        assert_eq!(board.symbol_count(), 8);
        assert!(board.check_pairs().is_ok());
        for s in 0..8 {
            assert_eq!(board.positions_of(SymbolId::new(s)).len(), 2);
        }
    }

    #[test]
    fn test_build_assigns_positions_in_order() {
        let mut rng = GameRng::new(1);
        let board = Board::build(4, &mut rng).unwrap();

        for (i, card) in board.cards().enumerate() {
            assert_eq!(card.position(), i);
            assert!(!card.is_face_up());
            assert!(!card.is_matched());
        }
    }

    #[test]
    fn test_build_rejects_zero_symbols() {
        let mut rng = GameRng::new(1);
        assert_eq!(Board::build(0, &mut rng), Err(ConfigError::NoSymbols));
    }

    #[test]
    fn test_build_is_deterministic_per_seed() {
        let a = Board::build(8, &mut GameRng::new(5)).unwrap();
        let b = Board::build(8, &mut GameRng::new(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_card_at_out_of_range() {
        let board = Board::from_symbols(&symbols(&[0, 1, 0, 1])).unwrap();

        assert_eq!(board.card_at(2).unwrap().symbol(), SymbolId::new(0));
        assert_eq!(
            board.card_at(4).unwrap_err(),
            GameError::PositionOutOfRange { position: 4, len: 4 }
        );
    }

    #[test]
    fn test_from_symbols_rejects_unpaired() {
        assert_eq!(
            Board::from_symbols(&symbols(&[0, 1, 1, 1])),
            Err(ConfigError::UnpairedSymbol { symbol: 0, count: 1 })
        );
        assert_eq!(Board::from_symbols(&[]), Err(ConfigError::NoSymbols));
    }

    #[test]
    fn test_reshuffle_keeps_pairs_and_clears_flags() {
        let mut rng = GameRng::new(9);
        let mut board = Board::build(6, &mut rng).unwrap();
        board.card_mut(0).unwrap().mark_matched(Some(PlayerId::FIRST));
        board.card_mut(3).unwrap().reveal();

        board.reshuffle(&mut rng);

        assert!(board.check_pairs().is_ok());
        assert!(board.face_up_unmatched().is_empty());
        assert_eq!(board.matched_pairs(), 0);
        assert_eq!(board.len(), 12);
    }

    #[test]
    fn test_face_up_unmatched_and_pairs() {
        let mut board = Board::from_symbols(&symbols(&[0, 1, 0, 1])).unwrap();
        board.card_mut(0).unwrap().mark_matched(Some(PlayerId::new(2)));
        board.card_mut(2).unwrap().mark_matched(Some(PlayerId::new(2)));
        board.card_mut(1).unwrap().reveal();

        assert_eq!(board.face_up_unmatched().as_slice(), &[1]);
        assert_eq!(board.matched_pairs(), 1);
        assert_eq!(board.pairs_matched_by(PlayerId::new(2)), 1);
        assert_eq!(board.pairs_matched_by(PlayerId::FIRST), 0);
        assert!(!board.all_matched());
    }

    #[test]
    fn test_display() {
        let mut board = Board::from_symbols(&symbols(&[0, 1, 0, 1])).unwrap();
        board.card_mut(1).unwrap().reveal();
        board.card_mut(2).unwrap().mark_matched(Some(PlayerId::FIRST));

        assert_eq!(board.to_string(), "??  1\n-- ??");
    }
}
