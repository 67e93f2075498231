//! Grid line-of-sight test used by the visibility graph.

use crate::grid::Grid;
use crate::types::Coord;

/// Walks the dominant axis from `from` to `to`. At each intermediate step the
/// interpolated minor coordinate falls between two cells (floor and ceil);
/// the step blocks sight only when both are wall. Endpoints are not tested.
/// Cells outside the grid read as wall.
pub fn has_line_of_sight(grid: &Grid, from: Coord, to: Coord) -> bool {
    let d_row = i64::from(to.row) - i64::from(from.row);
    let d_column = i64::from(to.column) - i64::from(from.column);
    let column_major = d_column.abs() >= d_row.abs();
    let span = if column_major { d_column.abs() } else { d_row.abs() };

    for step in 1..span {
        let t = step as f64 / span as f64;
        let (low, high) = if column_major {
            let column = i64::from(from.column) + step * d_column.signum();
            let row = f64::from(from.row) + d_row as f64 * t;
            (
                Coord::saturating_from(row.floor() as i64, column),
                Coord::saturating_from(row.ceil() as i64, column),
            )
        } else {
            let row = i64::from(from.row) + step * d_row.signum();
            let column = f64::from(from.column) + d_column as f64 * t;
            (
                Coord::saturating_from(row, column.floor() as i64),
                Coord::saturating_from(row, column.ceil() as i64),
            )
        };
        if grid.is_wall(low) && grid.is_wall(high) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TileKind;

    fn open_grid() -> Grid {
        Grid::from_text(
            "1111111\n\
             1000001\n\
             1000001\n\
             1000001\n\
             1111111\n",
        )
        .expect("grid")
    }

    #[test]
    fn open_room_is_fully_visible() {
        let grid = open_grid();
        assert!(has_line_of_sight(&grid, Coord::new(1, 1), Coord::new(3, 5)));
        assert!(has_line_of_sight(&grid, Coord::new(3, 5), Coord::new(1, 1)));
        assert!(has_line_of_sight(&grid, Coord::new(2, 2), Coord::new(2, 2)));
    }

    #[test]
    fn wall_on_the_exact_line_blocks_sight() {
        let mut grid = open_grid();
        grid.set_tile(Coord::new(2, 3), TileKind::Wall);
        assert!(!has_line_of_sight(&grid, Coord::new(2, 1), Coord::new(2, 5)));
        assert!(has_line_of_sight(&grid, Coord::new(1, 1), Coord::new(1, 5)));
    }

    #[test]
    fn one_open_straddling_cell_keeps_sight() {
        // The line from (1,1) to (2,5) passes between rows 1 and 2 at column 3.
        let mut grid = open_grid();
        grid.set_tile(Coord::new(2, 3), TileKind::Wall);
        assert!(has_line_of_sight(&grid, Coord::new(1, 1), Coord::new(2, 5)));

        grid.set_tile(Coord::new(1, 3), TileKind::Wall);
        assert!(!has_line_of_sight(&grid, Coord::new(1, 1), Coord::new(2, 5)));
    }

    #[test]
    fn off_grid_endpoints_are_read_as_wall_without_panicking() {
        let grid = open_grid();
        assert!(!has_line_of_sight(&grid, Coord::new(-5, -5), Coord::new(20, 20)));
    }

    #[test]
    fn extreme_endpoints_are_blocked_without_overflow() {
        let grid = Grid::new(4, 4, TileKind::Room);
        assert!(!has_line_of_sight(&grid, Coord::new(i32::MIN, 0), Coord::new(i32::MAX, 0)));
        assert!(!has_line_of_sight(&grid, Coord::new(1, i32::MAX), Coord::new(2, i32::MIN)));
        assert!(has_line_of_sight(&grid, Coord::new(i32::MAX, 0), Coord::new(i32::MAX, 1)));
    }
}
