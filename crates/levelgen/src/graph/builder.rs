//! Builders for the three graph variants: tile adjacency, area overlap, and
//! line-of-sight visibility.

use std::f64::consts::SQRT_2;

use tracing::{debug, warn};

use crate::area::Area;
use crate::error::{GraphBuildError, GraphError};
use crate::grid::Grid;
use crate::types::Coord;

use super::limits::VisibilityLimits;
use super::model::{Graph, NodeData, NodeId};
use super::sight::has_line_of_sight;

/// Row-major cell index as a node id, or `None` off the grid.
pub fn tile_node_id(grid: &Grid, coord: Coord) -> Option<NodeId> {
    grid.in_bounds(coord).then(|| NodeId(grid.index(coord) as u64))
}

fn open_cells(grid: &Grid) -> Vec<Coord> {
    grid.coords().filter(|&coord| !grid.is_wall(coord)).collect()
}

fn add_tile_nodes(graph: &mut Graph, grid: &Grid, cells: &[Coord]) -> Result<(), GraphError> {
    for &coord in cells {
        let id = NodeId(grid.index(coord) as u64);
        graph.add_node(id, NodeData::Tile { coord, tile: grid.tile_at(coord) })?;
    }
    Ok(())
}

/// One node per open cell. Side neighbours are joined with weight 1, diagonal
/// neighbours with weight sqrt(2) only when both flanking side cells are open.
pub fn tile_graph(grid: &Grid) -> Result<Graph, GraphError> {
    let cells = open_cells(grid);
    let mut graph = Graph::new();
    add_tile_nodes(&mut graph, grid, &cells)?;

    for &coord in &cells {
        let id = NodeId(grid.index(coord) as u64);
        let open = |d_row: i32, d_column: i32| !grid.is_wall(coord.offset(d_row, d_column));

        for (d_row, d_column) in [(0, 1), (1, 0)] {
            if open(d_row, d_column) {
                let neighbor = NodeId(grid.index(coord.offset(d_row, d_column)) as u64);
                graph.add_edge(id, neighbor, 1.0)?;
            }
        }
        for (d_row, d_column) in [(1, 1), (1, -1)] {
            if open(d_row, d_column) && open(d_row, 0) && open(0, d_column) {
                let neighbor = NodeId(grid.index(coord.offset(d_row, d_column)) as u64);
                graph.add_edge(id, neighbor, SQRT_2)?;
            }
        }
    }

    debug!(nodes = graph.node_count(), edges = graph.edge_count(), "built tile graph");
    Ok(graph)
}

/// One node per area, ids in slice order. Overlapping areas are joined by the
/// distance between their centres.
pub fn area_graph(areas: &[Area]) -> Result<Graph, GraphError> {
    let mut graph = Graph::new();
    for (index, area) in areas.iter().enumerate() {
        graph.add_node(NodeId(index as u64), NodeData::Area(*area))?;
    }
    for (left, left_area) in areas.iter().enumerate() {
        for (right, right_area) in areas.iter().enumerate().skip(left + 1) {
            if left_area.overlaps(right_area) {
                graph.add_edge(
                    NodeId(left as u64),
                    NodeId(right as u64),
                    left_area.center_distance(right_area),
                )?;
            }
        }
    }
    debug!(nodes = graph.node_count(), edges = graph.edge_count(), "built area graph");
    Ok(graph)
}

/// One node per open cell; every pair with a clear line of sight is joined
/// by its Euclidean distance. Quadratic in open cells: keep it to small maps
/// or sub-grids, or bound it with `limits`.
pub fn visibility_graph(grid: &Grid, limits: &VisibilityLimits) -> Result<Graph, GraphBuildError> {
    let cells = open_cells(grid);
    let mut graph = Graph::new();
    add_tile_nodes(&mut graph, grid, &cells)?;

    let mut pair_checks = 0_u64;
    for (left_index, &left) in cells.iter().enumerate() {
        if let Err(err) = limits.check(pair_checks) {
            warn!(pair_checks, open_cells = cells.len(), "visibility graph stopped: {err}");
            return Err(err);
        }
        for &right in &cells[left_index + 1..] {
            pair_checks += 1;
            if has_line_of_sight(grid, left, right) {
                graph.add_edge(
                    NodeId(grid.index(left) as u64),
                    NodeId(grid.index(right) as u64),
                    left.distance(right),
                )?;
            }
        }
    }
    limits.check(pair_checks)?;

    debug!(pair_checks, edges = graph.edge_count(), "built visibility graph");
    Ok(graph)
}
