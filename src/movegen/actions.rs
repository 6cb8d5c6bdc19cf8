//! Planning-phase action generation.
//!
//! Enumerates the defend, move and attack actions a single unit could
//! usefully submit this turn.

use crate::board::{ActionKind, Coord, GameState, PlannedAction, UnitId};
use crate::resolve::{in_range, move_rejection};

/// Generates every legal action for `unit_id` in the current state.
///
/// Defend is always legal. Moves go to adjacent passable tiles that are
/// empty right now; stepping onto a tile another unit is leaving is legal
/// but not generated. Attacks target living enemies already within range.
/// Returns an empty vec for unknown, dead, or already-acted units.
pub fn legal_actions(state: &GameState, unit_id: UnitId) -> Vec<PlannedAction> {
    let unit = match state.unit(unit_id) {
        Some(u) if u.alive && !u.has_acted => u,
        _ => return Vec::new(),
    };

    let mut actions = vec![PlannedAction::defend(unit_id)];

    actions.extend(
        unit.position
            .neighbors()
            .filter(|to| move_rejection(&state.grid, unit.position, *to).is_none())
            .filter(|to| !state.grid.is_occupied(*to))
            .map(|to| PlannedAction::move_to(unit_id, to)),
    );

    actions.extend(
        state
            .units
            .iter()
            .filter(|t| t.alive && t.owner != unit.owner && in_range(unit, t.position))
            .map(|t| PlannedAction::attack(unit_id, t.position)),
    );

    actions
}

/// Coordinates `unit_id` could move to this turn.
pub fn move_targets(state: &GameState, unit_id: UnitId) -> Vec<Coord> {
    legal_actions(state, unit_id)
        .into_iter()
        .filter(|a| a.kind == ActionKind::Move)
        .filter_map(|a| a.target)
        .collect()
}
