//! Combat math.

use crate::board::{Coord, Grid, Unit};

/// Damage dealt by one attack.
///
/// `attack + terrain_bonus - defense`, floored at zero, then halved
/// (rounding down) when the defender is defending.
pub fn attack_damage(attack: u32, terrain_bonus: u32, defense: u32, defending: bool) -> u32 {
    let raw = attack.saturating_add(terrain_bonus).saturating_sub(defense);
    if defending {
        raw / 2
    } else {
        raw
    }
}

/// Damage `attacker` would deal to `defender` from the attacker's current tile.
pub fn damage_between(grid: &Grid, attacker: &Unit, defender: &Unit, defending: bool) -> u32 {
    let bonus = grid.terrain(attacker.position).attack_bonus();
    attack_damage(attacker.attack, bonus, defender.defense, defending)
}

/// Whether `target` lies within `attacker`'s range.
pub fn in_range(attacker: &Unit, target: Coord) -> bool {
    u32::from(attacker.position.distance(target)) <= attacker.range
}
