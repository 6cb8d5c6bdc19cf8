//! Game configuration.
//!
//! Everything a host may tune per game: the seed all rift randomness derives
//! from, the rift cadence, and the starting terrain. Loadable from JSON with
//! missing fields taking their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Coord, Grid, TerrainKind};

/// Errors raised while loading or validating a [`GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rift period must be at least 1 turn")]
    ZeroRiftPeriod,

    #[error("rift interval {min}..={max} is empty or starts at zero")]
    InvalidRiftInterval { min: u32, max: u32 },

    #[error("terrain entry at {0} is off the grid")]
    TerrainOutOfBounds(Coord),

    #[error("snapshot seed {state} does not match config seed {config}")]
    SeedMismatch { state: u64, config: u64 },

    #[error("snapshot grid and units disagree on occupancy")]
    InconsistentSnapshot,
}

/// When chaos rifts strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum RiftSchedule {
    /// At the end of every turn divisible by `every`.
    Fixed { every: u32 },
    /// Each gap between rifts is drawn uniformly from `min..=max` turns,
    /// re-drawn after every rift.
    Random { min: u32, max: u32 },
    /// Never.
    Disabled,
}

impl Default for RiftSchedule {
    fn default() -> Self {
        RiftSchedule::Random { min: 3, max: 5 }
    }
}

impl RiftSchedule {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            RiftSchedule::Fixed { every: 0 } => Err(ConfigError::ZeroRiftPeriod),
            RiftSchedule::Random { min, max } if min == 0 || min > max => {
                Err(ConfigError::InvalidRiftInterval { min, max })
            }
            _ => Ok(()),
        }
    }
}

/// A terrain override in the starting layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainPlacement {
    pub at: Coord,
    pub terrain: TerrainKind,
}

/// Per-game settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for rift scheduling and tile selection.
    pub seed: u64,
    pub rift: RiftSchedule,
    /// Non-normal tiles of the starting battlefield.
    pub terrain: Vec<TerrainPlacement>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            seed: 0,
            rift: RiftSchedule::default(),
            terrain: default_terrain(),
        }
    }
}

/// Two lava pools on the flanks of the middle row and a heal tile between them.
fn default_terrain() -> Vec<TerrainPlacement> {
    vec![
        TerrainPlacement { at: Coord::new(0, 2), terrain: TerrainKind::Lava },
        TerrainPlacement { at: Coord::new(4, 2), terrain: TerrainKind::Lava },
        TerrainPlacement { at: Coord::new(2, 2), terrain: TerrainKind::Heal },
    ]
}

impl GameConfig {
    /// Parses and validates a JSON config.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_rift(mut self, rift: RiftSchedule) -> Self {
        self.rift = rift;
        self
    }

    pub fn with_terrain(mut self, terrain: Vec<TerrainPlacement>) -> Self {
        self.terrain = terrain;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rift.validate()?;
        if let Some(bad) = self.terrain.iter().find(|t| !t.at.in_bounds()) {
            return Err(ConfigError::TerrainOutOfBounds(bad.at));
        }
        Ok(())
    }

    /// Builds the starting battlefield.
    pub fn build_grid(&self) -> Grid {
        let layout: Vec<(Coord, TerrainKind)> =
            self.terrain.iter().map(|t| (t.at, t.terrain)).collect();
        Grid::with_terrain(&layout)
    }
}
