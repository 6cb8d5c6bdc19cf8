//! Board representation and game-state types.
//!
//! Contains the core data structures for the grid, players, units,
//! planned actions, and the overall game state.

pub mod action;
pub mod grid;
pub mod player;
pub mod state;
pub mod unit;

pub use action::{ActionKind, Placement, PlannedAction};
pub use grid::{
    Coord, Grid, TerrainKind, Tile, ALL_TERRAIN, BOOST_ATTACK_BONUS, GRID_SIZE, HEAL_AMOUNT,
    LAVA_DAMAGE, TILE_COUNT,
};
pub use player::{PerPlayer, PlayerSlot, ALL_PLAYERS};
pub use state::{BattleStats, GameState, Phase};
pub use unit::{Unit, UnitId, UnitKind, UnitStats, ALL_UNIT_KINDS, UNITS_PER_PLAYER, UNIT_COUNT};
