//! Cave-construction pipeline that composes the mapgen stages in order.

use rand_chacha::rand_core::Rng;
use tracing::debug;

use crate::config::GenerationConfig;
use crate::grid::Grid;
use crate::mapgen::fill::{SmoothingRule, random_fill, smooth};
use crate::mapgen::passage::Passage;
use crate::mapgen::regions::{PruneThresholds, prune_regions};
use crate::mapgen::rooms::{RoomSet, connect_rooms};
use crate::types::TileKind;

pub(super) struct PipelineOutput {
    pub(super) grid: Grid,
    pub(super) rooms: RoomSet,
    pub(super) passages: Vec<Passage>,
}

/// Fill, smooth, prune, build rooms, connect. `rng` is consumed by the fill
/// stage only.
pub(super) fn build_cave<R: Rng + ?Sized>(
    config: &GenerationConfig,
    rng: &mut R,
) -> PipelineOutput {
    let mut grid = random_fill(config.width, config.height, config.fill_probability, rng);
    smooth(
        &mut grid,
        config.smoothing_iterations,
        SmoothingRule { high: config.wall_neighbor_high, low: config.wall_neighbor_low },
    );
    debug!(walls = grid.count(TileKind::Wall), "smoothed grid");

    let surviving = prune_regions(
        &mut grid,
        PruneThresholds {
            wall_region_min_size: config.wall_region_min_size,
            room_region_min_size: config.room_region_min_size,
        },
    );

    let mut rooms = RoomSet::from_regions(&grid, surviving);
    let passages = connect_rooms(&mut grid, &mut rooms, config.passage_radius);

    PipelineOutput { grid, rooms, passages }
}
