//! Public result model for a generated level.

use crate::area::Area;
use crate::grid::Grid;
use crate::types::Coord;

use super::passage::Passage;
use super::rooms::RoomSet;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedLevel {
    pub seed: String,
    pub seed_hash: u64,
    pub border_size: usize,
    /// Final grid, border ring included.
    pub grid: Grid,
    /// Rooms in the unbordered frame; add `border_size` to map into `grid`.
    pub rooms: RoomSet,
    /// Carved passages, already translated into the bordered frame.
    pub passages: Vec<Passage>,
}

impl GeneratedLevel {
    /// Room bounding boxes followed by passage corridors, in the bordered frame.
    pub fn areas(&self) -> Vec<Area> {
        let offset = self.border_size as i32;
        let mut areas: Vec<Area> = self
            .rooms
            .rooms()
            .iter()
            .filter_map(|room| room.bounds())
            .map(|(min, max)| {
                Area::new(min.offset(offset, offset), max.offset(offset, offset), false)
            })
            .collect();

        for passage in &self.passages {
            let radius = i64::from(passage.radius);
            let top_left = Coord::saturating_from(
                i64::from(passage.from.row.min(passage.to.row)) - radius,
                i64::from(passage.from.column.min(passage.to.column)) - radius,
            );
            let bottom_right = Coord::saturating_from(
                i64::from(passage.from.row.max(passage.to.row)) + radius,
                i64::from(passage.from.column.max(passage.to.column)) + radius,
            );
            areas.push(Area::new(
                self.clamp(top_left),
                self.clamp(bottom_right),
                true,
            ));
        }
        areas
    }

    /// Coordinates of every room tile in the bordered frame.
    pub fn room_tiles(&self) -> impl Iterator<Item = Coord> + '_ {
        let offset = self.border_size as i32;
        self.rooms
            .rooms()
            .iter()
            .flat_map(move |room| room.tiles.iter().map(move |tile| tile.offset(offset, offset)))
    }

    fn clamp(&self, coord: Coord) -> Coord {
        let max_row = self.grid.height().saturating_sub(1) as i32;
        let max_column = self.grid.width().saturating_sub(1) as i32;
        Coord { row: coord.row.clamp(0, max_row), column: coord.column.clamp(0, max_column) }
    }
}
