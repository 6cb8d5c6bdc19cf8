//! Battlefield grid and terrain.
//!
//! The battlefield is a fixed 5x5 array of tiles stored row-major. A tile
//! records its terrain and, when a living unit stands on it, that unit's id.
//! Tiles never own units; the unit arena lives in `GameState`.

use serde::{Deserialize, Serialize};

use super::unit::{Unit, UnitId};

/// Width and height of the battlefield.
pub const GRID_SIZE: u8 = 5;

/// Number of tiles on the battlefield.
pub const TILE_COUNT: usize = (GRID_SIZE as usize) * (GRID_SIZE as usize);

/// Health lost at the end of a turn spent on lava.
pub const LAVA_DAMAGE: u32 = 2;

/// Health restored at the end of a turn spent on a heal tile.
pub const HEAL_AMOUNT: u32 = 3;

/// Attack bonus for a unit attacking from a boost tile.
pub const BOOST_ATTACK_BONUS: u32 = 2;

/// A grid coordinate. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: u8,
    pub y: u8,
}

impl Coord {
    pub const fn new(x: u8, y: u8) -> Self {
        Coord { x, y }
    }

    /// Returns true if the coordinate lies on the battlefield.
    pub const fn in_bounds(self) -> bool {
        self.x < GRID_SIZE && self.y < GRID_SIZE
    }

    /// Chebyshev distance: diagonal steps count as one.
    pub fn distance(self, other: Coord) -> u8 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Row-major tile index. Only meaningful for in-bounds coordinates.
    pub const fn index(self) -> usize {
        self.y as usize * GRID_SIZE as usize + self.x as usize
    }

    /// In-bounds coordinates at distance exactly 1, in row-major order.
    pub fn neighbors(self) -> impl Iterator<Item = Coord> {
        Coord::all().filter(move |c| self.distance(*c) == 1)
    }

    /// Every coordinate on the battlefield in row-major order.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..GRID_SIZE).flat_map(|y| (0..GRID_SIZE).map(move |x| Coord::new(x, y)))
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// What a tile is made of.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    #[default]
    Normal,
    Lava,
    Wall,
    Heal,
    Boost,
}

/// All terrain kinds, in declaration order.
pub const ALL_TERRAIN: [TerrainKind; 5] = [
    TerrainKind::Normal,
    TerrainKind::Lava,
    TerrainKind::Wall,
    TerrainKind::Heal,
    TerrainKind::Boost,
];

impl TerrainKind {
    /// Units may stand on every terrain except walls.
    pub const fn is_passable(self) -> bool {
        !matches!(self, TerrainKind::Wall)
    }

    /// Additive attack modifier for a unit attacking from this terrain.
    pub const fn attack_bonus(self) -> u32 {
        match self {
            TerrainKind::Boost => BOOST_ATTACK_BONUS,
            _ => 0,
        }
    }

    /// Position of this kind in [`ALL_TERRAIN`].
    pub const fn index(self) -> usize {
        match self {
            TerrainKind::Normal => 0,
            TerrainKind::Lava => 1,
            TerrainKind::Wall => 2,
            TerrainKind::Heal => 3,
            TerrainKind::Boost => 4,
        }
    }
}

/// A single battlefield cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: TerrainKind,
    pub occupant: Option<UnitId>,
}

/// The 5x5 battlefield.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    tiles: [Tile; TILE_COUNT],
}

impl Grid {
    /// Creates an all-normal, unoccupied grid.
    pub fn new() -> Self {
        Grid::default()
    }

    /// Creates an unoccupied grid with the given terrain overrides.
    /// Out-of-bounds entries are ignored; later entries win.
    pub fn with_terrain(layout: &[(Coord, TerrainKind)]) -> Self {
        let mut grid = Grid::new();
        for &(coord, terrain) in layout {
            if coord.in_bounds() {
                grid.tiles[coord.index()].terrain = terrain;
            }
        }
        grid
    }

    /// Returns the tile at `coord`, or `None` when out of bounds.
    pub fn get(&self, coord: Coord) -> Option<&Tile> {
        if coord.in_bounds() {
            Some(&self.tiles[coord.index()])
        } else {
            None
        }
    }

    /// Terrain at `coord`. Out-of-bounds coordinates read as `Wall`.
    pub fn terrain(&self, coord: Coord) -> TerrainKind {
        self.get(coord).map_or(TerrainKind::Wall, |t| t.terrain)
    }

    /// Unit standing at `coord`, if any.
    pub fn occupant(&self, coord: Coord) -> Option<UnitId> {
        self.get(coord).and_then(|t| t.occupant)
    }

    pub fn is_occupied(&self, coord: Coord) -> bool {
        self.occupant(coord).is_some()
    }

    /// Overwrites the terrain at `coord`.
    ///
    /// Refused, returning false, when `coord` is off the grid or the change
    /// would put a wall under a unit.
    pub(crate) fn set_terrain(&mut self, coord: Coord, terrain: TerrainKind) -> bool {
        if !coord.in_bounds() || (!terrain.is_passable() && self.is_occupied(coord)) {
            return false;
        }
        self.tiles[coord.index()].terrain = terrain;
        true
    }

    /// Records `unit` as standing on `coord`.
    pub(crate) fn place(&mut self, coord: Coord, unit: UnitId) {
        self.tiles[coord.index()].occupant = Some(unit);
    }

    /// Clears the occupant of `coord`.
    pub(crate) fn vacate(&mut self, coord: Coord) {
        self.tiles[coord.index()].occupant = None;
    }

    /// Exchanges the terrain of two tiles. Occupants stay where they are.
    ///
    /// Refused like [`Grid::set_terrain`] if either side would end up as a
    /// wall under a unit; the grid is then left untouched.
    pub(crate) fn swap_terrain(&mut self, a: Coord, b: Coord) -> bool {
        let (ta, tb) = (self.terrain(a), self.terrain(b));
        let walls_in = |at: Coord, incoming: TerrainKind| !incoming.is_passable() && self.is_occupied(at);
        if !a.in_bounds() || !b.in_bounds() || walls_in(a, tb) || walls_in(b, ta) {
            return false;
        }
        self.tiles[a.index()].terrain = tb;
        self.tiles[b.index()].terrain = ta;
        true
    }

    /// Number of tiles of each terrain kind, indexed by [`TerrainKind::index`].
    pub fn terrain_counts(&self) -> [usize; ALL_TERRAIN.len()] {
        let mut counts = [0; ALL_TERRAIN.len()];
        for tile in &self.tiles {
            counts[tile.terrain.index()] += 1;
        }
        counts
    }

    /// Checks the tile/unit back-reference invariant.
    ///
    /// Every living unit must stand on an in-bounds, passable tile whose
    /// occupant is that unit, and every occupied tile must point at a living
    /// unit positioned on it.
    pub fn verify_occupancy(&self, units: &[Unit]) -> bool {
        for unit in units.iter().filter(|u| u.alive) {
            match self.get(unit.position) {
                Some(tile) if tile.occupant == Some(unit.id) && tile.terrain.is_passable() => {}
                _ => return false,
            }
        }
        Coord::all().all(|coord| match self.occupant(coord) {
            None => true,
            Some(id) => units
                .get(id.index())
                .is_some_and(|u| u.id == id && u.alive && u.position == coord),
        })
    }
}
