//! Chaos rifts.
//!
//! A rift swaps the terrain of two passable tiles. Units never move; only
//! the ground under them changes. All randomness comes from a ChaCha stream
//! keyed on the game seed and the turn number, and only `u32` ranges are
//! sampled, so every replay on every platform picks the same tiles.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::board::{Coord, Grid, TerrainKind};
use crate::config::RiftSchedule;

/// ChaCha stream used for drawing the gap to the next rift.
const SCHEDULE_STREAM: u64 = 1;

/// ChaCha stream used for picking the tiles a rift swaps.
const TILE_STREAM: u64 = 2;

/// ChaCha stream used for rifts triggered outside the schedule.
const MANUAL_STREAM: u64 = 3;

/// The two tiles a rift exchanged, with the terrain each held beforehand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiftSwap {
    pub first: Coord,
    pub second: Coord,
    pub first_before: TerrainKind,
    pub second_before: TerrainKind,
}

/// SplitMix64 finalizer over the seed and turn.
fn mix(seed: u64, turn: u32) -> u64 {
    let mut z = seed ^ u64::from(turn).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Deterministic generator for rift decisions made at `turn`.
pub fn rift_rng(seed: u64, turn: u32, stream: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(mix(seed, turn));
    rng.set_stream(stream);
    rng
}

/// The first turn after `after_turn` whose end triggers a rift.
///
/// Pass 0 to get the first rift of a fresh game. Returns `None` when the
/// schedule is disabled or the next rift would fall past `u32::MAX`.
pub fn next_rift_turn(schedule: &RiftSchedule, seed: u64, after_turn: u32) -> Option<u32> {
    match *schedule {
        RiftSchedule::Fixed { every } if every > 0 => (after_turn / every + 1).checked_mul(every),
        RiftSchedule::Random { min, max } if min > 0 && min <= max => {
            let mut rng = rift_rng(seed, after_turn, SCHEDULE_STREAM);
            after_turn.checked_add(rng.gen_range(min..=max))
        }
        _ => None,
    }
}

/// Swaps the terrain of two distinct passable tiles chosen from the seed.
///
/// Walls never move, so no unit can end up on one. Returns `None` when
/// fewer than two passable tiles exist.
pub fn apply_rift(grid: &mut Grid, seed: u64, turn: u32) -> Option<RiftSwap> {
    let swap = swap_random_tiles(grid, &mut rift_rng(seed, turn, TILE_STREAM))?;
    info!(turn, first = %swap.first, second = %swap.second, "chaos rift");
    Some(swap)
}

/// Rift fired on demand during `turn`.
///
/// `prior_rifts` is how many rifts the game has already seen, so repeated
/// triggers within one turn pick fresh tiles. Draws come from their own
/// stream and never repeat a scheduled rift's choice.
pub fn apply_manual_rift(
    grid: &mut Grid,
    seed: u64,
    turn: u32,
    prior_rifts: u32,
) -> Option<RiftSwap> {
    let mut rng = rift_rng(mix(seed, prior_rifts), turn, MANUAL_STREAM);
    let swap = swap_random_tiles(grid, &mut rng)?;
    info!(turn, first = %swap.first, second = %swap.second, "manual rift");
    Some(swap)
}

fn swap_random_tiles(grid: &mut Grid, rng: &mut ChaCha8Rng) -> Option<RiftSwap> {
    let candidates: Vec<Coord> = Coord::all()
        .filter(|c| grid.terrain(*c).is_passable())
        .collect();
    if candidates.len() < 2 {
        return None;
    }

    let n = candidates.len() as u32;
    let a = rng.gen_range(0..n);
    let mut b = rng.gen_range(0..n - 1);
    if b >= a {
        b += 1;
    }

    let (first, second) = (candidates[a as usize], candidates[b as usize]);
    let swap = RiftSwap {
        first,
        second,
        first_before: grid.terrain(first),
        second_before: grid.terrain(second),
    };
    grid.swap_terrain(first, second);
    Some(swap)
}
