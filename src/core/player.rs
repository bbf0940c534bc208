//! Player identification and per-player data storage.
//!
//! ## PlayerId
//!
//! Players are numbered from 1, the way they are announced at the table:
//! "Player 1" always opens a round.
//!
//! ## PlayerMap
//!
//! Per-player data backed by a `Vec` with O(1) access, indexed by `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Player identifier. The first player is `PlayerId::FIRST` (player 1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Player 1, who starts every round.
    pub const FIRST: PlayerId = PlayerId(1);

    /// Create a new player ID from its 1-based number.
    #[must_use]
    pub const fn new(number: u8) -> Self {
        Self(number)
    }

    /// The 1-based player number.
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Storage index (0-based) for this player.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0.saturating_sub(1) as usize
    }

    /// The player who acts after this one in a game of `player_count`.
    ///
    /// ```
    /// use memory_pairs::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::new(1).next(2), PlayerId::new(2));
    /// assert_eq!(PlayerId::new(2).next(2), PlayerId::new(1));
    /// assert_eq!(PlayerId::new(1).next(1), PlayerId::new(1));
    /// ```
    #[must_use]
    pub fn next(self, player_count: usize) -> Self {
        let count = player_count.max(1);
        PlayerId(((self.index() + 1) % count) as u8 + 1)
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (1..=player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data storage with O(1) access.
///
/// ```
/// use memory_pairs::core::{PlayerId, PlayerMap};
///
/// let mut pairs: PlayerMap<u32> = PlayerMap::with_value(2, 0);
/// pairs[PlayerId::new(2)] += 1;
/// assert_eq!(pairs[PlayerId::new(1)], 0);
/// assert_eq!(pairs[PlayerId::new(2)], 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    ///
    /// `player_count` is validated by `GameConfig` before a map is built;
    /// an empty count is clamped to one player.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        let data = PlayerId::all(player_count.max(1)).map(factory).collect();
        Self { data }
    }

    /// Create a new PlayerMap with all entries set to the same value.
    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    /// Number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Whether `player` has an entry in this map.
    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        player.number() >= 1 && player.index() < self.data.len()
    }

    /// Get a reference to a player's data, if the player exists.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        if self.contains(player) {
            self.data.get(player.index())
        } else {
            None
        }
    }

    /// Get a mutable reference to a player's data, if the player exists.
    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut T> {
        if self.contains(player) {
            self.data.get_mut(player.index())
        } else {
            None
        }
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8 + 1), v))
    }

    /// Iterate over mutable entries.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.data.iter_mut()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}
