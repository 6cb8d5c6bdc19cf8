//! Unit kinds, stats and the per-unit record.
//!
//! Each player fields exactly one unit of each kind. Unit ids are stable
//! arena indices derived from the owner and kind, so tiles and actions can
//! refer to units by a small copyable id.

use serde::{Deserialize, Serialize};

use super::grid::Coord;
use super::player::PlayerSlot;

/// Number of units each player fields.
pub const UNITS_PER_PLAYER: usize = 3;

/// Total units in a game.
pub const UNIT_COUNT: usize = UNITS_PER_PLAYER * 2;

/// The three unit archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitKind {
    Commander,
    Warrior,
    Archer,
}

/// All unit kinds in id order.
pub const ALL_UNIT_KINDS: [UnitKind; UNITS_PER_PLAYER] =
    [UnitKind::Commander, UnitKind::Warrior, UnitKind::Archer];

/// Fixed base stats for a unit kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitStats {
    pub max_health: u32,
    pub attack: u32,
    pub defense: u32,
    pub range: u32,
}

impl UnitKind {
    pub const fn index(self) -> usize {
        match self {
            UnitKind::Commander => 0,
            UnitKind::Warrior => 1,
            UnitKind::Archer => 2,
        }
    }

    pub const fn base_stats(self) -> UnitStats {
        match self {
            UnitKind::Commander => UnitStats { max_health: 20, attack: 5, defense: 3, range: 1 },
            UnitKind::Warrior => UnitStats { max_health: 15, attack: 7, defense: 2, range: 1 },
            UnitKind::Archer => UnitStats { max_health: 10, attack: 6, defense: 1, range: 2 },
        }
    }
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UnitKind::Commander => "commander",
            UnitKind::Warrior => "warrior",
            UnitKind::Archer => "archer",
        };
        f.write_str(name)
    }
}

/// Stable index of a unit in the game's unit arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u8);

impl UnitId {
    /// The id of `player`'s unit of the given kind.
    pub const fn of(player: PlayerSlot, kind: UnitKind) -> UnitId {
        UnitId((player.index() * UNITS_PER_PLAYER + kind.index()) as u8)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A unit on the battlefield (or, once dead, in the roster).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub owner: PlayerSlot,
    pub kind: UnitKind,
    pub position: Coord,
    pub health: u32,
    pub max_health: u32,
    pub attack: u32,
    pub defense: u32,
    pub range: u32,
    pub alive: bool,
    /// Set once the unit's action for the current turn has resolved.
    pub has_acted: bool,
}

impl Unit {
    /// Creates a full-health unit with the kind's base stats.
    pub fn new(id: UnitId, owner: PlayerSlot, kind: UnitKind, position: Coord) -> Self {
        let stats = kind.base_stats();
        Unit {
            id,
            owner,
            kind,
            position,
            health: stats.max_health,
            max_health: stats.max_health,
            attack: stats.attack,
            defense: stats.defense,
            range: stats.range,
            alive: true,
            has_acted: false,
        }
    }

    pub fn is_commander(&self) -> bool {
        self.kind == UnitKind::Commander
    }

    /// Subtracts `amount` health, clamping at zero.
    /// Returns true if this call killed the unit.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.alive {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.alive = false;
            return true;
        }
        false
    }

    /// Restores up to `amount` health without exceeding `max_health`.
    /// Returns the health actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if !self.alive {
            return 0;
        }
        let before = self.health;
        self.health = self.health.saturating_add(amount).min(self.max_health);
        self.health - before
    }
}
