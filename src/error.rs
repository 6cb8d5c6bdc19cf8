//! Rejection reasons for controller operations.
//!
//! Every error is raised before any mutation, so a rejected call leaves the
//! game exactly as it was. None of them are transient: resubmitting the same
//! input against the same state fails the same way.

use thiserror::Error;

use crate::board::{ActionKind, Coord, Phase, PlayerSlot, UnitId, UnitKind};

/// Why a target tile was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRejection {
    OutsideDeploymentZone,
    Occupied,
    Wall,
    NotAdjacent,
}

impl std::fmt::Display for TargetRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            TargetRejection::OutsideDeploymentZone => "outside the deployment zone",
            TargetRejection::Occupied => "tile already taken",
            TargetRejection::Wall => "tile is a wall",
            TargetRejection::NotAdjacent => "not adjacent to the unit",
        };
        f.write_str(text)
    }
}

/// Errors returned by [`Game`](crate::game::Game) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("operation needs the {expected} phase, game is in {actual}")]
    InvalidPhase { expected: Phase, actual: Phase },

    #[error("unit {unit} does not belong to {player}")]
    InvalidOwnership { unit: UnitId, player: PlayerSlot },

    #[error("coordinate {0} is off the grid")]
    OutOfBounds(Coord),

    #[error("illegal target {target}: {reason}")]
    IllegalTarget { target: Coord, reason: TargetRejection },

    #[error("{kind:?} order for unit {unit} is missing its target or carries a stray one")]
    MalformedTarget { unit: UnitId, kind: ActionKind },

    #[error("unit {0} already has an action this turn")]
    AlreadyActed(UnitId),

    #[error("unit {0} is dead")]
    UnitDead(UnitId),

    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),

    #[error("no action submitted for unit {0}")]
    MissingAction(UnitId),

    #[error("{0} placed more than once")]
    DuplicateUnitKind(UnitKind),

    #[error("expected 3 placements, got {0}")]
    WrongPlacementCount(usize),

    #[error("both players must commit before the turn can resolve")]
    NotReady,

    #[error("a rift needs at least two passable tiles")]
    NoRiftTiles,
}
