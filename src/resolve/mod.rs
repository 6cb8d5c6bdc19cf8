//! Turn resolution.
//!
//! Resolves both players' simultaneous actions, sequences phases, detects
//! victory, and runs chaos rifts.

pub mod combat;
pub mod phase;
pub mod rift;
pub mod turn;

pub use combat::{attack_damage, damage_between, in_range};
pub use phase::{advance_state, check_victory, next_phase, Outcome};
pub use rift::{apply_manual_rift, apply_rift, next_rift_turn, RiftSwap};
pub use turn::{
    apply_resolution, move_rejection, resolve_turn, BlockReason, CombatEvent, DeathCause,
    TurnResolution, VoidReason,
};
