//! Player slots and per-player storage.
//!
//! The engine only distinguishes the two seats at the table. Identity,
//! wallets and lobby assignment live outside the crate.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use super::grid::Coord;

/// One of the two seats in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

/// Both player slots in seat order.
pub const ALL_PLAYERS: [PlayerSlot; 2] = [PlayerSlot::One, PlayerSlot::Two];

impl PlayerSlot {
    /// Returns 0 for player one and 1 for player two.
    pub const fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }

    /// Returns the other seat.
    pub const fn opponent(self) -> PlayerSlot {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }

    /// The two grid rows this player may deploy into during setup.
    ///
    /// Player one holds the bottom rows, player two the top rows.
    pub const fn deployment_rows(self) -> [u8; 2] {
        match self {
            PlayerSlot::One => [3, 4],
            PlayerSlot::Two => [0, 1],
        }
    }

    /// Returns true if the coordinate lies inside this player's deployment zone.
    pub fn in_deployment_zone(self, coord: Coord) -> bool {
        coord.in_bounds() && self.deployment_rows().contains(&coord.y)
    }
}

impl std::fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerSlot::One => write!(f, "player one"),
            PlayerSlot::Two => write!(f, "player two"),
        }
    }
}

/// A value stored once per player, indexed by [`PlayerSlot`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerPlayer<T>(pub [T; 2]);

impl<T> PerPlayer<T> {
    /// Creates a pair from player one's and player two's values.
    pub fn new(one: T, two: T) -> Self {
        PerPlayer([one, two])
    }

    /// Iterates over `(slot, value)` pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerSlot, &T)> {
        ALL_PLAYERS.into_iter().zip(self.0.iter())
    }
}

impl<T> Index<PlayerSlot> for PerPlayer<T> {
    type Output = T;

    fn index(&self, player: PlayerSlot) -> &T {
        &self.0[player.index()]
    }
}

impl<T> IndexMut<PlayerSlot> for PerPlayer<T> {
    fn index_mut(&mut self, player: PlayerSlot) -> &mut T {
        &mut self.0[player.index()]
    }
}
