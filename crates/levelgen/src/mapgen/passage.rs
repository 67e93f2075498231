//! Straight passages: digital line rasterization plus a disc brush.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::types::{Coord, TileKind};

/// A corridor carved between two room edge tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub from: Coord,
    pub to: Coord,
    pub radius: u32,
}

impl Passage {
    pub fn translated(self, d_row: i32, d_column: i32) -> Self {
        Self {
            from: self.from.offset(d_row, d_column),
            to: self.to.offset(d_row, d_column),
            radius: self.radius,
        }
    }
}

/// Rasterizes the segment `from..=to`. Steps one cell at a time along the
/// dominant axis and moves the minor axis whenever the accumulated gradient
/// reaches the dominant span. The accumulator starts at half the span.
///
/// Points are produced lazily, so distant endpoints cost nothing up front.
pub fn line(from: Coord, to: Coord) -> Line {
    Line::new(from, to)
}

#[derive(Clone, Debug)]
pub struct Line {
    current: (i64, i64),
    step: (i64, i64),
    gradient_step: (i64, i64),
    longest: i64,
    shortest: i64,
    accumulation: i64,
    remaining: i64,
}

impl Line {
    fn new(from: Coord, to: Coord) -> Self {
        let d_row = i64::from(to.row) - i64::from(from.row);
        let d_column = i64::from(to.column) - i64::from(from.column);

        let (longest, shortest, step, gradient_step) = if d_column.abs() >= d_row.abs() {
            (d_column.abs(), d_row.abs(), (0, d_column.signum()), (d_row.signum(), 0))
        } else {
            (d_row.abs(), d_column.abs(), (d_row.signum(), 0), (0, d_column.signum()))
        };

        Self {
            current: (i64::from(from.row), i64::from(from.column)),
            step,
            gradient_step,
            longest,
            shortest,
            accumulation: longest / 2,
            remaining: longest + 1,
        }
    }
}

impl Iterator for Line {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        if self.remaining == 0 {
            return None;
        }
        let point = Coord::saturating_from(self.current.0, self.current.1);
        self.remaining -= 1;
        if self.remaining > 0 {
            self.current.0 += self.step.0;
            self.current.1 += self.step.1;
            self.accumulation += self.shortest;
            if self.accumulation >= self.longest {
                self.current.0 += self.gradient_step.0;
                self.current.1 += self.gradient_step.1;
                self.accumulation -= self.longest;
            }
        }
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining).ok();
        (remaining.unwrap_or(usize::MAX), remaining)
    }
}

/// Every cell within `radius` of `center`, clipped to the grid. Only the part
/// of the bounding square that lies inside the grid is visited.
pub fn disc(grid: &Grid, center: Coord, radius: u32) -> Vec<Coord> {
    let mut cells = Vec::new();
    let (Some(last_row), Some(last_column)) =
        (grid.height().checked_sub(1), grid.width().checked_sub(1))
    else {
        return cells;
    };

    let reach = i64::from(radius);
    let limit = u64::from(radius).pow(2);
    let (row, column) = (i64::from(center.row), i64::from(center.column));
    let rows = (row - reach).max(0)..=(row + reach).min(last_row as i64);
    let columns = (column - reach).max(0)..=(column + reach).min(last_column as i64);

    for cell_row in rows {
        let row_distance = (cell_row - row).unsigned_abs().pow(2);
        for cell_column in columns.clone() {
            if row_distance + (cell_column - column).unsigned_abs().pow(2) <= limit {
                cells.push(Coord::saturating_from(cell_row, cell_column));
            }
        }
    }
    cells
}

/// Clips the segment to the grid rectangle; `None` when it misses the grid.
/// Segments with both endpoints on the grid are returned unchanged.
pub fn clip_to_grid(grid: &Grid, from: Coord, to: Coord) -> Option<(Coord, Coord)> {
    if grid.in_bounds(from) && grid.in_bounds(to) {
        return Some((from, to));
    }
    let last_row = grid.height().checked_sub(1)? as f64;
    let last_column = grid.width().checked_sub(1)? as f64;

    let origin = (f64::from(from.row), f64::from(from.column));
    let delta = (f64::from(to.row) - origin.0, f64::from(to.column) - origin.1);
    let (mut enter, mut exit) = (0.0_f64, 1.0_f64);
    for (start, span, last) in [(origin.0, delta.0, last_row), (origin.1, delta.1, last_column)] {
        if span == 0.0 {
            if start < 0.0 || start > last {
                return None;
            }
            continue;
        }
        let (low, high) = (-start / span, (last - start) / span);
        enter = enter.max(low.min(high));
        exit = exit.min(low.max(high));
    }
    if enter > exit {
        return None;
    }

    let at = |t: f64| {
        let row = (origin.0 + delta.0 * t).round().clamp(0.0, last_row);
        let column = (origin.1 + delta.1 * t).round().clamp(0.0, last_column);
        Coord::new(row as i32, column as i32)
    };
    Some((at(enter), at(exit)))
}

/// Converts every cell under the brush along the line to room. The line is
/// clipped to the grid first; a segment that misses the grid carves nothing.
pub fn carve_passage(grid: &mut Grid, passage: Passage) {
    let Some((from, to)) = clip_to_grid(grid, passage.from, passage.to) else {
        return;
    };
    for point in line(from, to) {
        for cell in disc(grid, point, passage.radius) {
            grid.set_tile(cell, TileKind::Room);
        }
    }
}
