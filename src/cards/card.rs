//! Cards on the table.
//!
//! A `Card` pairs a symbol with a fixed grid position and tracks whether it
//! is face-up and who matched it. Cards are only mutated by the board and
//! the game controller; presentation code reads them.

use serde::{Deserialize, Serialize};

use crate::core::player::PlayerId;

/// Identity of the picture on a card. Exactly two cards share each symbol.
///
/// Matching compares symbols, never card objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub u16);

impl SymbolId {
    /// Create a new symbol ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

/// Which side of the card is showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    #[default]
    Down,
    Up,
}

/// A single card.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    symbol: SymbolId,
    position: usize,
    face: Face,
    matched: bool,
    /// Player credited with the pair. `None` while unmatched and in
    /// single-player games.
    matched_by: Option<PlayerId>,
}

impl Card {
    /// A face-down, unmatched card.
    #[must_use]
    pub fn new(symbol: SymbolId, position: usize) -> Self {
        Self {
            symbol,
            position,
            face: Face::Down,
            matched: false,
            matched_by: None,
        }
    }

    #[must_use]
    pub fn symbol(&self) -> SymbolId {
        self.symbol
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn face(&self) -> Face {
        self.face
    }

    #[must_use]
    pub fn is_face_up(&self) -> bool {
        self.face == Face::Up
    }

    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.matched
    }

    #[must_use]
    pub fn matched_by(&self) -> Option<PlayerId> {
        self.matched_by
    }

    /// Face-up but not yet part of a found pair.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.is_face_up() && !self.is_matched()
    }

    pub(crate) fn reveal(&mut self) {
        self.face = Face::Up;
    }

    pub(crate) fn hide(&mut self) {
        self.face = Face::Down;
    }

    /// Matched cards stay face-up for the rest of the round.
    pub(crate) fn mark_matched(&mut self, player: Option<PlayerId>) {
        self.face = Face::Up;
        self.matched = true;
        self.matched_by = player;
    }

    /// Deal a new symbol into this slot, face-down and unmatched.
    pub(crate) fn redeal(&mut self, symbol: SymbolId) {
        self.symbol = symbol;
        self.face = Face::Down;
        self.matched = false;
        self.matched_by = None;
    }
}
