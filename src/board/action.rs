//! Planned actions and setup placements.
//!
//! A `PlannedAction` is what a player commits for one unit during planning.
//! It lives only between commit and resolution. A `Placement` is the setup
//! counterpart: where a player wants one of their units to start.

use serde::{Deserialize, Serialize};

use super::grid::Coord;
use super::unit::{UnitId, UnitKind};

/// What a unit does this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionKind {
    /// Step to an adjacent tile (diagonals included).
    Move,
    /// Strike whatever enemy stands on the target tile after movement.
    Attack,
    /// Halve incoming damage for this turn.
    Defend,
}

impl ActionKind {
    /// Whether an action of this kind must name a target tile.
    pub const fn needs_target(self) -> bool {
        matches!(self, ActionKind::Move | ActionKind::Attack)
    }
}

/// One unit's order for the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlannedAction {
    pub unit_id: UnitId,
    pub kind: ActionKind,
    pub target: Option<Coord>,
}

impl PlannedAction {
    pub fn move_to(unit_id: UnitId, target: Coord) -> Self {
        PlannedAction { unit_id, kind: ActionKind::Move, target: Some(target) }
    }

    pub fn attack(unit_id: UnitId, target: Coord) -> Self {
        PlannedAction { unit_id, kind: ActionKind::Attack, target: Some(target) }
    }

    pub fn defend(unit_id: UnitId) -> Self {
        PlannedAction { unit_id, kind: ActionKind::Defend, target: None }
    }
}

/// A setup-phase request to start a unit of `kind` on `position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub kind: UnitKind,
    pub position: Coord,
}

impl Placement {
    pub const fn new(kind: UnitKind, x: u8, y: u8) -> Self {
        Placement { kind, position: Coord::new(x, y) }
    }
}
