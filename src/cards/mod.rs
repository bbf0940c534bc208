//! Card identity and per-card state.
//!
//! ## Key Types
//!
//! - `SymbolId`: the picture on a card, shared by exactly one other card
//! - `Face`: face-up or face-down
//! - `Card`: symbol, grid position, face and match owner

pub mod card;

pub use card::{Card, Face, SymbolId};
