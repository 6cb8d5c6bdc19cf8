//! Game state representation.
//!
//! `GameState` is the single source of truth for one game: phase, turn
//! counter, battlefield, unit arena, private per-player submissions, the
//! rift schedule cursor and running battle statistics.

use serde::{Deserialize, Serialize};

use super::action::{Placement, PlannedAction};
use super::grid::{Coord, Grid};
use super::player::{PerPlayer, PlayerSlot, ALL_PLAYERS};
use super::unit::{Unit, UnitId, UnitKind, ALL_UNIT_KINDS};

/// Where the game is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Both players are deploying their units.
    Setup,
    /// Both players are composing their action sets.
    Planning,
    /// Both action sets are in; waiting for `advance`.
    Execution,
    /// A chaos rift is rewriting terrain.
    Rift,
    /// A commander has fallen. Terminal.
    Finished,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Setup => "setup",
            Phase::Planning => "planning",
            Phase::Execution => "execution",
            Phase::Rift => "rift",
            Phase::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// Running totals shown when the game ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleStats {
    /// Enemy units each player destroyed in combat.
    pub kills: PerPlayer<u32>,
    /// Combat damage each player's units inflicted, before health clamping.
    pub damage_dealt: PerPlayer<u32>,
    /// Chaos rifts that have struck so far.
    pub rifts: u32,
}

/// Complete snapshot of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: Phase,
    /// Starts at 1; incremented once per completed execution.
    pub turn_number: u32,
    pub grid: Grid,
    /// Unit arena indexed by `UnitId`. Empty until both players have deployed.
    pub units: Vec<Unit>,
    /// Setup submissions awaiting the other player.
    pub placements: PerPlayer<Option<Vec<Placement>>>,
    /// Committed action sets for the current turn.
    pub pending_moves: PerPlayer<Option<Vec<PlannedAction>>>,
    /// Set when exactly one commander has fallen. A draw leaves it `None`.
    pub winner: Option<PlayerSlot>,
    /// Turn whose end triggers the next chaos rift, if any is scheduled.
    pub next_rift_turn: Option<u32>,
    /// Game seed; rift randomness derives from it and the turn number.
    pub seed: u64,
    pub stats: BattleStats,
}

impl GameState {
    /// Creates a game in setup with the given battlefield.
    pub fn new(grid: Grid, seed: u64, next_rift_turn: Option<u32>) -> Self {
        GameState {
            phase: Phase::Setup,
            turn_number: 1,
            grid,
            units: Vec::new(),
            placements: PerPlayer::default(),
            pending_moves: PerPlayer::default(),
            winner: None,
            next_rift_turn,
            seed,
            stats: BattleStats::default(),
        }
    }

    /// Materializes both players' units from their placements.
    ///
    /// Performs no legality checks; the controller validates placements
    /// before they get here. Each player's list should hold one entry per
    /// unit kind; kinds without an entry are not created.
    pub fn deploy(&mut self, one: &[Placement], two: &[Placement]) {
        self.units.clear();
        for (player, placements) in [(PlayerSlot::One, one), (PlayerSlot::Two, two)] {
            for kind in ALL_UNIT_KINDS {
                if let Some(p) = placements.iter().find(|p| p.kind == kind) {
                    let id = UnitId::of(player, kind);
                    self.units.push(Unit::new(id, player, kind, p.position));
                    self.grid.place(p.position, id);
                }
            }
        }
        debug_assert!(self.grid.verify_occupancy(&self.units));
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.index()).filter(|u| u.id == id)
    }

    /// The living unit standing on `coord`, if any.
    pub fn unit_at(&self, coord: Coord) -> Option<&Unit> {
        self.grid.occupant(coord).and_then(|id| self.unit(id))
    }

    /// All of `player`'s units, dead ones included.
    pub fn units_of(&self, player: PlayerSlot) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(move |u| u.owner == player)
    }

    /// `player`'s unit of the given kind.
    pub fn unit_of_kind(&self, player: PlayerSlot, kind: UnitKind) -> Option<&Unit> {
        self.unit(UnitId::of(player, kind))
    }

    pub fn units_alive(&self, player: PlayerSlot) -> usize {
        self.units_of(player).filter(|u| u.alive).count()
    }

    pub fn commander_alive(&self, player: PlayerSlot) -> bool {
        self.units_of(player).any(|u| u.is_commander() && u.alive)
    }

    pub fn setup_complete(&self, player: PlayerSlot) -> bool {
        self.placements[player].is_some()
    }

    pub fn has_committed(&self, player: PlayerSlot) -> bool {
        self.pending_moves[player].is_some()
    }

    /// True once both players have committed for the current turn.
    pub fn both_committed(&self) -> bool {
        ALL_PLAYERS.iter().all(|p| self.has_committed(*p))
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }
}
