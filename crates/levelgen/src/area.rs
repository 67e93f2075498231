//! Macro rectangles (rooms and corridors) used for coarse spatial graphs.

use serde::{Deserialize, Serialize};

use crate::types::Coord;

/// Inclusive rectangle from `origin` (top-left) to `end` (bottom-right).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub origin: Coord,
    pub end: Coord,
    pub is_corridor: bool,
}

impl Area {
    /// Normalises the corners so `origin` is the top-left one.
    pub fn new(a: Coord, b: Coord, is_corridor: bool) -> Self {
        Self {
            origin: Coord { row: a.row.min(b.row), column: a.column.min(b.column) },
            end: Coord { row: a.row.max(b.row), column: a.column.max(b.column) },
            is_corridor,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (
            f64::from(self.origin.row + self.end.row) / 2.0,
            f64::from(self.origin.column + self.end.column) / 2.0,
        )
    }

    pub fn center_distance(&self, other: &Area) -> f64 {
        let (row, column) = self.center();
        let (other_row, other_column) = other.center();
        (row - other_row).hypot(column - other_column)
    }

    /// Projections overlap on both axes; touching at a single row or column counts.
    pub fn overlaps(&self, other: &Area) -> bool {
        self.origin.row <= other.end.row
            && other.origin.row <= self.end.row
            && self.origin.column <= other.end.column
            && other.origin.column <= self.end.column
    }

    pub fn contains(&self, coord: Coord) -> bool {
        (self.origin.row..=self.end.row).contains(&coord.row)
            && (self.origin.column..=self.end.column).contains(&coord.column)
    }
}
