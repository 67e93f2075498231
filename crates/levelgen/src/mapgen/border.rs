use crate::grid::Grid;
use crate::types::TileKind;

/// Returns a copy of `grid` centred inside a solid wall ring `border` cells wide.
pub fn wrap_with_border(grid: &Grid, border: usize) -> Grid {
    let mut bordered =
        Grid::new(grid.width() + 2 * border, grid.height() + 2 * border, TileKind::Wall);
    let offset = border as i32;
    for coord in grid.coords() {
        bordered.set_tile(coord.offset(offset, offset), grid.tile_at(coord));
    }
    bordered
}

/// True when every cell within `border` of an outer edge is wall.
pub fn border_is_solid(grid: &Grid, border: usize) -> bool {
    grid.coords().all(|coord| {
        let (row, column) = (coord.row as usize, coord.column as usize);
        let in_ring = row < border
            || column < border
            || row >= grid.height().saturating_sub(border)
            || column >= grid.width().saturating_sub(border);
        !in_ring || grid.is_wall(coord)
    })
}
