//! Board: the dealt grid of cards.

pub mod grid;

pub use grid::{Board, Positions};
