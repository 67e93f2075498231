//! Connected-component extraction and size pruning.

use std::collections::VecDeque;

use tracing::debug;

use crate::grid::Grid;
use crate::types::{Coord, REGION_CONNECTIVITY, TileKind};

/// Cells of one tile kind joined by side adjacency, in discovery order.
pub type Region = Vec<Coord>;

/// Partitions every `tile` cell into disjoint regions by breadth-first flood
/// fill. Seeds are taken in row-major order.
pub fn extract_regions(grid: &Grid, tile: TileKind) -> Vec<Region> {
    let mut regions = Vec::new();
    let mut visited = vec![false; grid.width() * grid.height()];

    for start in grid.coords() {
        if visited[grid.index(start)] || grid.tile_at(start) != tile {
            continue;
        }

        let mut region = Vec::new();
        let mut queue = VecDeque::from([start]);
        visited[grid.index(start)] = true;
        while let Some(current) = queue.pop_front() {
            region.push(current);
            for neighbor in REGION_CONNECTIVITY.neighbors(current) {
                if !grid.in_bounds(neighbor) || grid.tile_at(neighbor) != tile {
                    continue;
                }
                let idx = grid.index(neighbor);
                if !visited[idx] {
                    visited[idx] = true;
                    queue.push_back(neighbor);
                }
            }
        }
        regions.push(region);
    }

    regions
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PruneThresholds {
    pub wall_region_min_size: usize,
    pub room_region_min_size: usize,
}

/// Relabels undersized wall regions as room, then undersized room regions as
/// wall, and returns the room regions that survive. The order matters: a wall
/// pocket opened in the first step can join a room region in the second.
pub fn prune_regions(grid: &mut Grid, thresholds: PruneThresholds) -> Vec<Region> {
    let pruned_walls =
        relabel_small_regions(grid, TileKind::Wall, thresholds.wall_region_min_size);

    let mut surviving = Vec::new();
    let mut pruned_rooms = 0usize;
    for region in extract_regions(grid, TileKind::Room) {
        if region.len() < thresholds.room_region_min_size {
            for &coord in &region {
                grid.set_tile(coord, TileKind::Wall);
            }
            pruned_rooms += 1;
        } else {
            surviving.push(region);
        }
    }

    debug!(pruned_walls, pruned_rooms, surviving_rooms = surviving.len(), "pruned regions");
    surviving
}

fn relabel_small_regions(grid: &mut Grid, tile: TileKind, min_size: usize) -> usize {
    let mut relabelled = 0;
    for region in extract_regions(grid, tile) {
        if region.len() < min_size {
            for &coord in &region {
                grid.set_tile(coord, tile.opposite());
            }
            relabelled += 1;
        }
    }
    relabelled
}
