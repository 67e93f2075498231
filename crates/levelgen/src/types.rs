use serde::{Deserialize, Serialize};

/// Integer grid coordinate. Signed so that callers may pass positions outside
/// the grid; every read and write through [`crate::Grid`] is bounds-checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: i32,
    pub column: i32,
}

impl Coord {
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Narrows wide coordinates, saturating at the `i32` range.
    pub fn saturating_from(row: i64, column: i64) -> Self {
        let narrow = |value: i64| value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        Self { row: narrow(row), column: narrow(column) }
    }

    /// Saturates instead of wrapping; a saturated coord is off any grid.
    pub fn offset(self, d_row: i32, d_column: i32) -> Self {
        Self {
            row: self.row.saturating_add(d_row),
            column: self.column.saturating_add(d_column),
        }
    }

    pub fn squared_distance(self, other: Coord) -> i64 {
        let d_row = i64::from(self.row) - i64::from(other.row);
        let d_column = i64::from(self.column) - i64::from(other.column);
        d_row.saturating_mul(d_row).saturating_add(d_column.saturating_mul(d_column))
    }

    pub fn distance(self, other: Coord) -> f64 {
        (self.squared_distance(other) as f64).sqrt()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Wall,
    Room,
}

impl TileKind {
    pub fn opposite(self) -> Self {
        match self {
            Self::Wall => Self::Room,
            Self::Room => Self::Wall,
        }
    }
}

/// Neighbourhood rule used when walking a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Connectivity {
    /// North, east, south, west.
    Orthogonal,
    /// The full 3x3 ring, diagonals included.
    Moore,
}

const ORTHOGONAL_OFFSETS: [(i32, i32); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];
const MOORE_OFFSETS: [(i32, i32); 8] =
    [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];

impl Connectivity {
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Self::Orthogonal => &ORTHOGONAL_OFFSETS,
            Self::Moore => &MOORE_OFFSETS,
        }
    }

    pub fn neighbors(self, coord: Coord) -> impl Iterator<Item = Coord> {
        self.offsets().iter().map(move |&(d_row, d_column)| coord.offset(d_row, d_column))
    }
}

/// Region flood fill only joins cells that share a side.
pub const REGION_CONNECTIVITY: Connectivity = Connectivity::Orthogonal;

/// A room tile is an edge tile when any cell of its 3x3 ring is wall.
pub const EDGE_CONNECTIVITY: Connectivity = Connectivity::Moore;
