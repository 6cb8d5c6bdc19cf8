//! Simultaneous turn resolution.
//!
//! Both players' committed actions resolve in four ordered sub-phases:
//! movement, defend flagging, combat, terrain. Each sub-phase reads a
//! snapshot and applies its effects all at once, so no action observes
//! another action's intermediate state. Actions are processed in unit-id
//! order, which makes the outcome (and the event log) independent of which
//! player's list is passed first.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::combat::{damage_between, in_range};
use crate::board::{
    ActionKind, Coord, GameState, Grid, PerPlayer, PlannedAction, TerrainKind, Unit, UnitId,
    HEAL_AMOUNT, LAVA_DAMAGE,
};

/// Why a move did not happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockReason {
    /// Another unit targeted the same tile; all such moves are cancelled.
    Collision,
    /// The destination is held by a unit that did not leave.
    Occupied,
    Wall,
    NotAdjacent,
    OutOfBounds,
    NoTarget,
}

/// Why an attack did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoidReason {
    NoTarget,
    OutOfBounds,
    OutOfRange,
    /// Nobody stands on the target tile after movement.
    EmptyTile,
    /// The unit on the target tile belongs to the attacker's side.
    FriendlyTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    Combat,
    Lava,
}

/// One line of the combat log, in resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatEvent {
    Moved { unit: UnitId, from: Coord, to: Coord },
    MoveCancelled { unit: UnitId, target: Option<Coord>, reason: BlockReason },
    Defended { unit: UnitId },
    Attacked { attacker: UnitId, target: UnitId, damage: u32 },
    AttackVoid { attacker: UnitId, target: Option<Coord>, reason: VoidReason },
    TerrainDamage { unit: UnitId, amount: u32 },
    TerrainHeal { unit: UnitId, amount: u32 },
    Died { unit: UnitId, cause: DeathCause },
    Rift { first: Coord, second: Coord },
}

/// The units, grid and log produced by resolving one turn.
///
/// Computed without touching the input state; hand it to
/// [`apply_resolution`] to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResolution {
    pub units: Vec<Unit>,
    pub grid: Grid,
    pub events: Vec<CombatEvent>,
    /// Enemy units each player destroyed in combat this turn.
    pub kills: PerPlayer<u32>,
    /// Combat damage each player inflicted this turn.
    pub damage_dealt: PerPlayer<u32>,
}

/// Returns the reason a unit at `from` cannot step to `to`, if any.
///
/// Occupancy is not checked here; it depends on what every other unit
/// does this turn and is settled during movement resolution.
pub fn move_rejection(grid: &Grid, from: Coord, to: Coord) -> Option<BlockReason> {
    if !to.in_bounds() {
        Some(BlockReason::OutOfBounds)
    } else if from.distance(to) > 1 {
        Some(BlockReason::NotAdjacent)
    } else if !grid.terrain(to).is_passable() {
        Some(BlockReason::Wall)
    } else {
        None
    }
}

/// Resolves both players' actions against `state` without mutating it.
///
/// Actions for dead or unknown units are ignored. When several actions name
/// the same unit, the smallest by (kind, target) is kept, so the result is a
/// pure function of the state and the union of the two action lists.
pub fn resolve_turn(
    state: &GameState,
    one: &[PlannedAction],
    two: &[PlannedAction],
) -> TurnResolution {
    let mut actions: Vec<PlannedAction> = one
        .iter()
        .chain(two.iter())
        .copied()
        .filter(|a| state.unit(a.unit_id).is_some_and(|u| u.alive))
        .collect();
    actions.sort_unstable_by_key(|a| (a.unit_id, a.kind, a.target));
    actions.dedup_by_key(|a| a.unit_id);

    let mut res = TurnResolution {
        units: state.units.clone(),
        grid: state.grid.clone(),
        events: Vec::new(),
        kills: PerPlayer::default(),
        damage_dealt: PerPlayer::default(),
    };

    resolve_movement(&mut res, &actions);
    debug_assert!(res.grid.verify_occupancy(&res.units));

    let defending = flag_defenders(&mut res, &actions);

    resolve_combat(&mut res, &actions, &defending);
    debug_assert!(res.grid.verify_occupancy(&res.units));

    apply_terrain(&mut res);
    debug_assert!(res.grid.verify_occupancy(&res.units));

    for action in &actions {
        res.units[action.unit_id.index()].has_acted = true;
    }

    trace!(events = res.events.len(), "turn resolved");
    res
}

/// Commits a resolution to the game state and returns its combat log.
pub fn apply_resolution(state: &mut GameState, resolution: TurnResolution) -> Vec<CombatEvent> {
    state.units = resolution.units;
    state.grid = resolution.grid;
    for (player, kills) in resolution.kills.iter() {
        state.stats.kills[player] += kills;
    }
    for (player, damage) in resolution.damage_dealt.iter() {
        state.stats.damage_dealt[player] += damage;
    }
    resolution.events
}

struct Mover {
    unit: UnitId,
    from: Coord,
    to: Option<Coord>,
    blocked: Option<BlockReason>,
}

fn resolve_movement(res: &mut TurnResolution, actions: &[PlannedAction]) {
    let mut movers: Vec<Mover> = actions
        .iter()
        .filter(|a| a.kind == ActionKind::Move)
        .map(|a| {
            let from = res.units[a.unit_id.index()].position;
            let blocked = match a.target {
                None => Some(BlockReason::NoTarget),
                Some(to) => move_rejection(&res.grid, from, to),
            };
            Mover { unit: a.unit_id, from, to: a.target, blocked }
        })
        .collect();

    // Every well-formed move that shares a destination with another is void.
    let valid: Vec<bool> = movers.iter().map(|m| m.blocked.is_none()).collect();
    for i in 0..movers.len() {
        if !valid[i] {
            continue;
        }
        let collides = (0..movers.len()).any(|j| j != i && valid[j] && movers[j].to == movers[i].to);
        if collides {
            movers[i].blocked = Some(BlockReason::Collision);
        }
    }

    // A move into a tile whose occupant stays put fails. Failures can free
    // nothing, only pin more units in place, so this reaches a fixpoint.
    loop {
        let mut changed = false;
        for i in 0..movers.len() {
            if movers[i].blocked.is_some() {
                continue;
            }
            let Some(occupant) = movers[i].to.and_then(|to| res.grid.occupant(to)) else {
                continue;
            };
            let leaving = movers.iter().any(|m| m.unit == occupant && m.blocked.is_none());
            if !leaving {
                movers[i].blocked = Some(BlockReason::Occupied);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    for m in movers.iter().filter(|m| m.blocked.is_none()) {
        res.grid.vacate(m.from);
    }
    for m in &movers {
        match (m.blocked, m.to) {
            (None, Some(to)) => {
                res.grid.place(to, m.unit);
                res.units[m.unit.index()].position = to;
                if to != m.from {
                    res.events.push(CombatEvent::Moved { unit: m.unit, from: m.from, to });
                }
            }
            (reason, target) => {
                res.events.push(CombatEvent::MoveCancelled {
                    unit: m.unit,
                    target,
                    reason: reason.unwrap_or(BlockReason::NoTarget),
                });
            }
        }
    }
}

fn flag_defenders(res: &mut TurnResolution, actions: &[PlannedAction]) -> Vec<bool> {
    let mut defending = vec![false; res.units.len()];
    for action in actions.iter().filter(|a| a.kind == ActionKind::Defend) {
        defending[action.unit_id.index()] = true;
        res.events.push(CombatEvent::Defended { unit: action.unit_id });
    }
    defending
}

/// Finds the enemy an attack lands on, judged from post-movement positions.
fn attack_target<'a>(
    grid: &Grid,
    units: &'a [Unit],
    attacker: &Unit,
    target: Option<Coord>,
) -> Result<&'a Unit, VoidReason> {
    let target = target.ok_or(VoidReason::NoTarget)?;
    if !target.in_bounds() {
        return Err(VoidReason::OutOfBounds);
    }
    if !in_range(attacker, target) {
        return Err(VoidReason::OutOfRange);
    }
    let victim = grid
        .occupant(target)
        .and_then(|id| units.get(id.index()))
        .ok_or(VoidReason::EmptyTile)?;
    if victim.owner == attacker.owner {
        return Err(VoidReason::FriendlyTarget);
    }
    Ok(victim)
}

fn resolve_combat(res: &mut TurnResolution, actions: &[PlannedAction], defending: &[bool]) {
    // Damage is computed from pre-combat health and applied in one step,
    // so a unit killed this turn still lands its own attack.
    let snapshot = res.units.clone();
    let mut incoming = vec![0u32; snapshot.len()];

    for action in actions.iter().filter(|a| a.kind == ActionKind::Attack) {
        let attacker = &snapshot[action.unit_id.index()];
        match attack_target(&res.grid, &snapshot, attacker, action.target) {
            Ok(victim) => {
                let damage = damage_between(&res.grid, attacker, victim, defending[victim.id.index()]);
                incoming[victim.id.index()] = incoming[victim.id.index()].saturating_add(damage);
                res.damage_dealt[attacker.owner] += damage;
                res.events.push(CombatEvent::Attacked {
                    attacker: attacker.id,
                    target: victim.id,
                    damage,
                });
            }
            Err(reason) => {
                res.events.push(CombatEvent::AttackVoid {
                    attacker: attacker.id,
                    target: action.target,
                    reason,
                });
            }
        }
    }

    for (i, damage) in incoming.into_iter().enumerate() {
        if damage == 0 {
            continue;
        }
        let unit = &mut res.units[i];
        if unit.take_damage(damage) {
            res.grid.vacate(unit.position);
            res.kills[unit.owner.opponent()] += 1;
            res.events.push(CombatEvent::Died { unit: unit.id, cause: DeathCause::Combat });
        }
    }
}

fn apply_terrain(res: &mut TurnResolution) {
    for unit in res.units.iter_mut().filter(|u| u.alive) {
        match res.grid.terrain(unit.position) {
            TerrainKind::Lava => {
                let before = unit.health;
                let died = unit.take_damage(LAVA_DAMAGE);
                res.events.push(CombatEvent::TerrainDamage {
                    unit: unit.id,
                    amount: before - unit.health,
                });
                if died {
                    res.grid.vacate(unit.position);
                    res.events.push(CombatEvent::Died { unit: unit.id, cause: DeathCause::Lava });
                }
            }
            TerrainKind::Heal => {
                let amount = unit.heal(HEAL_AMOUNT);
                if amount > 0 {
                    res.events.push(CombatEvent::TerrainHeal { unit: unit.id, amount });
                }
            }
            TerrainKind::Normal | TerrainKind::Boost | TerrainKind::Wall => {}
        }
    }
}
