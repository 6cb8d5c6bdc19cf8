//! Legal move generation.
//!
//! Generates legal placements and actions for a player in the current game
//! state, plus uniformly random picks among them for self-play.

pub mod actions;
pub mod placement;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{
    GameState, Grid, Phase, Placement, PlannedAction, PlayerSlot, ALL_UNIT_KINDS,
};

pub use actions::{legal_actions, move_targets};
pub use placement::legal_placements;

/// Picks one random legal action for each of the player's living units.
///
/// Returns an empty vec outside the planning phase.
pub fn random_actions(player: PlayerSlot, state: &GameState, rng: &mut impl Rng) -> Vec<PlannedAction> {
    if state.phase != Phase::Planning {
        return Vec::new();
    }

    let mut actions = Vec::new();
    for unit in state.units_of(player) {
        let legal = legal_actions(state, unit.id);
        if !legal.is_empty() {
            let idx = rng.gen_range(0..legal.len());
            actions.push(legal[idx]);
        }
    }
    actions
}

/// Places the player's three units on distinct random tiles of their zone.
///
/// Returns fewer placements than unit kinds only if walls leave fewer than
/// three open tiles, which the controller will then reject.
pub fn random_placement(player: PlayerSlot, grid: &Grid, rng: &mut impl Rng) -> Vec<Placement> {
    let open = legal_placements(player, grid);
    open.choose_multiple(rng, ALL_UNIT_KINDS.len())
        .zip(ALL_UNIT_KINDS)
        .map(|(at, kind)| Placement { kind, position: *at })
        .collect()
}
