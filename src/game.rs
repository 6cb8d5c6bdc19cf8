//! Game controller.
//!
//! `Game` owns one `GameState` and is the only surface external
//! collaborators call. Every operation validates phase, ownership and shape
//! first and mutates only once the whole submission has passed, so a
//! rejected call never leaves partial changes behind. Callers serialize
//! access; the controller holds no locks and does no I/O.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::board::{
    ActionKind, GameState, Phase, Placement, PlannedAction, PlayerSlot, ALL_PLAYERS,
    UNITS_PER_PLAYER,
};
use crate::config::{ConfigError, GameConfig};
use crate::error::{GameError, TargetRejection};
use crate::resolve::{
    advance_state, apply_manual_rift, apply_resolution, apply_rift, check_victory, move_rejection,
    next_rift_turn, resolve_turn, BlockReason, CombatEvent, Outcome, RiftSwap,
};

/// Everything one call to [`Game::advance`] produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    /// The turn that was resolved.
    pub turn: u32,
    /// Combat log in resolution order, ending with the rift if one struck.
    pub events: Vec<CombatEvent>,
    pub outcome: Outcome,
    pub rift: Option<RiftSwap>,
}

/// A single game between two players.
#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
    config: GameConfig,
}

impl Game {
    /// Starts a new game in the setup phase.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let next_rift = next_rift_turn(&config.rift, config.seed, 0);
        let state = GameState::new(config.build_grid(), config.seed, next_rift);
        Ok(Game { state, config })
    }

    /// Resumes a game from a snapshot, e.g. one restored from storage.
    ///
    /// The snapshot must carry the config's seed and a grid whose occupants
    /// agree with the unit list.
    pub fn from_state(state: GameState, config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        if state.seed != config.seed {
            return Err(ConfigError::SeedMismatch { state: state.seed, config: config.seed });
        }
        if !state.grid.verify_occupancy(&state.units) {
            return Err(ConfigError::InconsistentSnapshot);
        }
        Ok(Game { state, config })
    }

    /// Read-only view of the current state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), GameError> {
        if self.state.phase == expected {
            Ok(())
        } else {
            Err(GameError::InvalidPhase { expected, actual: self.state.phase })
        }
    }

    /// Records `player`'s starting positions.
    ///
    /// Placements stay private until both players have submitted; then all
    /// six units are deployed at once and planning begins. Resubmitting
    /// before the other player arrives replaces the earlier placements.
    pub fn submit_placement(
        &mut self,
        player: PlayerSlot,
        placements: &[Placement],
    ) -> Result<(), GameError> {
        if let Err(e) = self.validate_placement(player, placements) {
            debug!(%player, error = %e, "placement rejected");
            return Err(e);
        }

        self.state.placements[player] = Some(placements.to_vec());
        debug!(%player, "placement accepted");

        if let (Some(one), Some(two)) = (
            self.state.placements[PlayerSlot::One].clone(),
            self.state.placements[PlayerSlot::Two].clone(),
        ) {
            self.state.deploy(&one, &two);
            advance_state(&mut self.state, Outcome::Ongoing, false);
            info!(phase = %self.state.phase, "both players deployed");
        }
        Ok(())
    }

    fn validate_placement(
        &self,
        player: PlayerSlot,
        placements: &[Placement],
    ) -> Result<(), GameError> {
        self.expect_phase(Phase::Setup)?;
        if placements.len() != UNITS_PER_PLAYER {
            return Err(GameError::WrongPlacementCount(placements.len()));
        }

        for (i, placement) in placements.iter().enumerate() {
            let earlier = &placements[..i];
            let at = placement.position;
            if earlier.iter().any(|p| p.kind == placement.kind) {
                return Err(GameError::DuplicateUnitKind(placement.kind));
            }
            if !at.in_bounds() {
                return Err(GameError::OutOfBounds(at));
            }
            if !player.in_deployment_zone(at) {
                return Err(GameError::IllegalTarget {
                    target: at,
                    reason: TargetRejection::OutsideDeploymentZone,
                });
            }
            if !self.state.grid.terrain(at).is_passable() {
                return Err(GameError::IllegalTarget { target: at, reason: TargetRejection::Wall });
            }
            if self.state.grid.is_occupied(at) || earlier.iter().any(|p| p.position == at) {
                return Err(GameError::IllegalTarget {
                    target: at,
                    reason: TargetRejection::Occupied,
                });
            }
        }
        Ok(())
    }

    /// Commits `player`'s action set for the current turn.
    ///
    /// The set must hold exactly one action per living unit the player
    /// controls. Resubmitting before the opponent commits replaces the
    /// earlier set. Once both sets are in, the game enters execution.
    pub fn submit_moves(
        &mut self,
        player: PlayerSlot,
        actions: Vec<PlannedAction>,
    ) -> Result<(), GameError> {
        if let Err(e) = self.validate_moves(player, &actions) {
            debug!(%player, error = %e, "action set rejected");
            return Err(e);
        }

        self.state.pending_moves[player] = Some(actions);
        debug!(%player, turn = self.state.turn_number, "action set committed");

        if self.state.both_committed() {
            advance_state(&mut self.state, Outcome::Ongoing, false);
        }
        Ok(())
    }

    fn validate_moves(&self, player: PlayerSlot, actions: &[PlannedAction]) -> Result<(), GameError> {
        self.expect_phase(Phase::Planning)?;

        for (i, action) in actions.iter().enumerate() {
            let unit = self
                .state
                .unit(action.unit_id)
                .ok_or(GameError::UnknownUnit(action.unit_id))?;
            if unit.owner != player {
                return Err(GameError::InvalidOwnership { unit: unit.id, player });
            }
            if !unit.alive {
                return Err(GameError::UnitDead(unit.id));
            }
            if unit.has_acted || actions[..i].iter().any(|a| a.unit_id == unit.id) {
                return Err(GameError::AlreadyActed(unit.id));
            }
            if action.kind.needs_target() != action.target.is_some() {
                return Err(GameError::MalformedTarget { unit: unit.id, kind: action.kind });
            }

            let Some(target) = action.target else {
                continue;
            };
            if !target.in_bounds() {
                return Err(GameError::OutOfBounds(target));
            }
            if action.kind == ActionKind::Move {
                let reason = match move_rejection(&self.state.grid, unit.position, target) {
                    Some(BlockReason::NotAdjacent) => Some(TargetRejection::NotAdjacent),
                    Some(BlockReason::Wall) => Some(TargetRejection::Wall),
                    _ => None,
                };
                if let Some(reason) = reason {
                    return Err(GameError::IllegalTarget { target, reason });
                }
            }
        }

        if let Some(missing) = self
            .state
            .units_of(player)
            .filter(|u| u.alive && !u.has_acted)
            .find(|u| !actions.iter().any(|a| a.unit_id == u.id))
        {
            return Err(GameError::MissingAction(missing.id));
        }
        Ok(())
    }

    /// Resolves the current turn.
    ///
    /// Runs movement, defend, combat and terrain, checks for a fallen
    /// commander, and fires a chaos rift if one is scheduled for this turn.
    /// Unless the game ended, planning for the next turn begins.
    pub fn advance(&mut self) -> Result<TurnReport, GameError> {
        match self.state.phase {
            Phase::Execution => {}
            Phase::Planning => return Err(GameError::NotReady),
            actual => return Err(GameError::InvalidPhase { expected: Phase::Execution, actual }),
        }
        let (Some(one), Some(two)) = (
            self.state.pending_moves[PlayerSlot::One].as_deref(),
            self.state.pending_moves[PlayerSlot::Two].as_deref(),
        ) else {
            return Err(GameError::NotReady);
        };

        let turn = self.state.turn_number;
        let resolution = resolve_turn(&self.state, one, two);
        let mut events = apply_resolution(&mut self.state, resolution);

        let outcome = check_victory(&self.state);
        let rift_due = self.state.next_rift_turn == Some(turn);
        advance_state(&mut self.state, outcome, rift_due);

        let mut rift = None;
        if self.state.phase == Phase::Rift {
            rift = apply_rift(&mut self.state.grid, self.state.seed, turn);
            if let Some(swap) = rift {
                events.push(CombatEvent::Rift { first: swap.first, second: swap.second });
                self.state.stats.rifts += 1;
            }
            self.state.next_rift_turn = next_rift_turn(&self.config.rift, self.state.seed, turn);
            advance_state(&mut self.state, Outcome::Ongoing, false);
        }
        debug_assert!(self.state.grid.verify_occupancy(&self.state.units));

        match outcome {
            Outcome::Ongoing => info!(turn, events = events.len(), "turn resolved"),
            _ => info!(turn, ?outcome, "game over"),
        }
        Ok(TurnReport { turn, events, outcome, rift })
    }

    /// The actions a player is assumed to take when they fail to commit:
    /// every living unit defends.
    pub fn default_actions(&self, player: PlayerSlot) -> Vec<PlannedAction> {
        self.state
            .units_of(player)
            .filter(|u| u.alive && !u.has_acted)
            .map(|u| PlannedAction::defend(u.id))
            .collect()
    }

    /// Resolves the turn after `player` timed out.
    ///
    /// If `player` has not committed, their units all defend. The opponent
    /// must already have committed; otherwise nothing changes and
    /// `NotReady` is returned.
    pub fn force_resolve_with_defaults(
        &mut self,
        player: PlayerSlot,
    ) -> Result<TurnReport, GameError> {
        if !matches!(self.state.phase, Phase::Planning | Phase::Execution) {
            return Err(GameError::InvalidPhase {
                expected: Phase::Planning,
                actual: self.state.phase,
            });
        }
        if !self.state.has_committed(player.opponent()) {
            return Err(GameError::NotReady);
        }
        if !self.state.has_committed(player) {
            warn!(%player, turn = self.state.turn_number, "player timed out, defaulting to defend");
            self.state.pending_moves[player] = Some(self.default_actions(player));
            advance_state(&mut self.state, Outcome::Ongoing, false);
        }
        self.advance()
    }

    /// Fires a chaos rift now, outside the schedule.
    ///
    /// Only allowed while players are planning. Terrain is all that changes:
    /// units, committed action sets and the next scheduled rift stay as
    /// they were.
    pub fn trigger_rift(&mut self) -> Result<RiftSwap, GameError> {
        self.expect_phase(Phase::Planning)?;
        let turn = self.state.turn_number;
        let swap = apply_manual_rift(
            &mut self.state.grid,
            self.state.seed,
            turn,
            self.state.stats.rifts,
        )
        .ok_or(GameError::NoRiftTiles)?;
        self.state.stats.rifts += 1;
        debug_assert!(self.state.grid.verify_occupancy(&self.state.units));
        Ok(swap)
    }

    /// True once both players have submitted for the current phase.
    pub fn ready(&self) -> bool {
        match self.state.phase {
            Phase::Setup => ALL_PLAYERS.iter().all(|p| self.state.setup_complete(*p)),
            Phase::Planning | Phase::Execution => self.state.both_committed(),
            Phase::Rift | Phase::Finished => false,
        }
    }
}
