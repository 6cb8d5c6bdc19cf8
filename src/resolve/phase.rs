//! Phase sequencing and victory detection.
//!
//! Determines the next phase of the game and performs the bookkeeping that
//! goes with each transition.

use serde::{Deserialize, Serialize};

use crate::board::{GameState, Phase, PlayerSlot, ALL_PLAYERS};

/// How the game stands after a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Ongoing,
    Victory(PlayerSlot),
    /// Both commanders fell in the same turn.
    Draw,
}

impl Outcome {
    pub fn winner(self) -> Option<PlayerSlot> {
        match self {
            Outcome::Victory(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_over(self) -> bool {
        self != Outcome::Ongoing
    }
}

/// Checks both commanders. Before deployment the game is always ongoing.
pub fn check_victory(state: &GameState) -> Outcome {
    if state.units.is_empty() {
        return Outcome::Ongoing;
    }
    match (
        state.commander_alive(PlayerSlot::One),
        state.commander_alive(PlayerSlot::Two),
    ) {
        (true, true) => Outcome::Ongoing,
        (true, false) => Outcome::Victory(PlayerSlot::One),
        (false, true) => Outcome::Victory(PlayerSlot::Two),
        (false, false) => Outcome::Draw,
    }
}

/// Computes the phase that follows the current one.
///
/// Phase flow:
/// - Setup     -> Planning once both players have deployed
/// - Planning  -> Execution once both players have committed
/// - Execution -> Finished if a commander fell, Rift if one is due, else Planning
/// - Rift      -> Planning
/// - Finished  -> Finished
pub fn next_phase(state: &GameState, outcome: Outcome, rift_due: bool) -> Phase {
    match state.phase {
        Phase::Setup => {
            if ALL_PLAYERS.iter().all(|p| state.setup_complete(*p)) {
                Phase::Planning
            } else {
                Phase::Setup
            }
        }
        Phase::Planning => {
            if state.both_committed() {
                Phase::Execution
            } else {
                Phase::Planning
            }
        }
        Phase::Execution => {
            if outcome.is_over() {
                Phase::Finished
            } else if rift_due {
                Phase::Rift
            } else {
                Phase::Planning
            }
        }
        Phase::Rift => Phase::Planning,
        Phase::Finished => Phase::Finished,
    }
}

/// Moves the state to its next phase.
///
/// Handles:
/// - discarding the resolved action sets when leaving execution
/// - recording the winner when the game finishes
/// - starting a new turn (counter, acted flags) when returning to planning
///   after an execution
pub fn advance_state(state: &mut GameState, outcome: Outcome, rift_due: bool) {
    let previous = state.phase;
    let next = next_phase(state, outcome, rift_due);

    if previous == Phase::Execution && next != Phase::Execution {
        state.pending_moves = Default::default();
    }

    if next == Phase::Finished && previous != Phase::Finished {
        state.winner = outcome.winner();
    }

    if next == Phase::Planning && matches!(previous, Phase::Execution | Phase::Rift) {
        state.turn_number += 1;
        for unit in &mut state.units {
            unit.has_acted = false;
        }
    }

    state.phase = next;
}
