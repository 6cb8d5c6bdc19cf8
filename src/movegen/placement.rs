//! Setup-phase placement generation.

use crate::board::{Coord, Grid, PlayerSlot};

/// Tiles in `player`'s deployment zone that a unit may start on.
///
/// Walls are excluded. Ordering is row-major.
pub fn legal_placements(player: PlayerSlot, grid: &Grid) -> Vec<Coord> {
    Coord::all()
        .filter(|c| player.in_deployment_zone(*c))
        .filter(|c| grid.terrain(*c).is_passable() && !grid.is_occupied(*c))
        .collect()
}
