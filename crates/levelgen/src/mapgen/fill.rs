//! Random fill and cellular-automaton smoothing of the raw cave grid.

use rand_chacha::rand_core::Rng;

use crate::grid::Grid;
use crate::types::{Connectivity, Coord, TileKind};

/// Fills a fresh grid from `rng`. The outer ring is always wall; interior cells
/// are wall with `fill_probability` percent chance. Cells are drawn row-major
/// through `percent_roll`.
pub fn random_fill<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    fill_probability: u32,
    rng: &mut R,
) -> Grid {
    let mut grid = Grid::new(width, height, TileKind::Wall);
    for row in 0..height {
        for column in 0..width {
            if row == 0 || column == 0 || row == height - 1 || column == width - 1 {
                continue;
            }
            let roll = percent_roll(rng);
            let tile = if roll < fill_probability { TileKind::Wall } else { TileKind::Room };
            grid.set_tile(Coord { row: row as i32, column: column as i32 }, tile);
        }
    }
    grid
}

/// Largest multiple of 100 that fits in a `u32` draw; values at or above it
/// are redrawn so every percentile is equally likely.
const PERCENT_ZONE: u32 = u32::MAX - u32::MAX % 100;

/// Uniform value in `0..100`.
pub fn percent_roll<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    loop {
        let value = rng.next_u32();
        if value < PERCENT_ZONE {
            return value % 100;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SmoothingRule {
    pub high: u32,
    pub low: u32,
}

/// Applies `iterations` smoothing passes. Each pass updates the grid in place
/// in row-major order, so a cell sees the already-smoothed cells before it.
pub fn smooth(grid: &mut Grid, iterations: u32, rule: SmoothingRule) {
    for _ in 0..iterations {
        for row in 0..grid.height() {
            for column in 0..grid.width() {
                let coord = Coord { row: row as i32, column: column as i32 };
                let walls = surrounding_wall_count(grid, coord);
                if walls > rule.high {
                    grid.set_tile(coord, TileKind::Wall);
                } else if walls < rule.low {
                    grid.set_tile(coord, TileKind::Room);
                }
            }
        }
    }
}

/// Wall count over the 8-cell ring; cells past the edge count as wall.
pub fn surrounding_wall_count(grid: &Grid, coord: Coord) -> u32 {
    Connectivity::Moore.neighbors(coord).filter(|&neighbor| grid.is_wall(neighbor)).count() as u32
}
