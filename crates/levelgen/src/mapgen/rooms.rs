//! Room records built from surviving regions, and the connector that links
//! them into a single accessible network.
//!
//! Rooms live in an arena and refer to each other by index. Connections are a
//! symmetric adjacency set kept beside the arena.

use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, warn};

use crate::grid::Grid;
use crate::types::{Coord, EDGE_CONNECTIVITY, TileKind};

use super::passage::{Passage, carve_passage};
use super::regions::Region;

pub type RoomIndex = usize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Room {
    pub tiles: Vec<Coord>,
    /// Tiles with at least one in-grid wall cell in their 3x3 ring.
    pub edge_tiles: Vec<Coord>,
    pub is_main_room: bool,
    pub is_accessible_from_main_room: bool,
}

impl Room {
    pub fn from_region(grid: &Grid, region: Region) -> Self {
        let edge_tiles = region
            .iter()
            .copied()
            .filter(|&tile| {
                EDGE_CONNECTIVITY.neighbors(tile).any(|neighbor| {
                    grid.in_bounds(neighbor) && grid.tile_at(neighbor) == TileKind::Wall
                })
            })
            .collect();
        Self { tiles: region, edge_tiles, is_main_room: false, is_accessible_from_main_room: false }
    }

    pub fn size(&self) -> usize {
        self.tiles.len()
    }

    /// Inclusive (top-left, bottom-right) corners of the room's tiles.
    pub fn bounds(&self) -> Option<(Coord, Coord)> {
        let first = *self.tiles.first()?;
        let (mut min, mut max) = (first, first);
        for tile in &self.tiles {
            min.row = min.row.min(tile.row);
            min.column = min.column.min(tile.column);
            max.row = max.row.max(tile.row);
            max.column = max.column.max(tile.column);
        }
        Some((min, max))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoomSet {
    rooms: Vec<Room>,
    connections: Vec<BTreeSet<RoomIndex>>,
}

impl RoomSet {
    /// Builds rooms from regions, largest first. Equal sizes keep region
    /// order. The first room, if any, becomes the main room.
    pub fn from_regions(grid: &Grid, regions: Vec<Region>) -> Self {
        let mut rooms: Vec<Room> =
            regions.into_iter().map(|region| Room::from_region(grid, region)).collect();
        rooms.sort_by(|left, right| right.size().cmp(&left.size()));
        if let Some(main) = rooms.first_mut() {
            main.is_main_room = true;
            main.is_accessible_from_main_room = true;
        }
        let connections = vec![BTreeSet::new(); rooms.len()];
        Self { rooms, connections }
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn main_room(&self) -> Option<RoomIndex> {
        self.rooms.iter().position(|room| room.is_main_room)
    }

    pub fn connections(&self, room: RoomIndex) -> &BTreeSet<RoomIndex> {
        &self.connections[room]
    }

    pub fn is_connected(&self, left: RoomIndex, right: RoomIndex) -> bool {
        self.connections[left].contains(&right)
    }

    pub fn all_accessible(&self) -> bool {
        self.rooms.iter().all(|room| room.is_accessible_from_main_room)
    }

    /// Links two rooms both ways. If either side is accessible from the main
    /// room, the whole connected component becomes accessible.
    pub fn connect(&mut self, left: RoomIndex, right: RoomIndex) {
        let left_accessible = self.rooms[left].is_accessible_from_main_room;
        let right_accessible = self.rooms[right].is_accessible_from_main_room;
        self.connections[left].insert(right);
        self.connections[right].insert(left);
        if left_accessible && !right_accessible {
            self.mark_accessible_from(right);
        } else if right_accessible && !left_accessible {
            self.mark_accessible_from(left);
        }
    }

    fn mark_accessible_from(&mut self, start: RoomIndex) {
        let mut queue = VecDeque::from([start]);
        self.rooms[start].is_accessible_from_main_room = true;
        while let Some(current) = queue.pop_front() {
            let neighbors: Vec<RoomIndex> = self.connections[current].iter().copied().collect();
            for neighbor in neighbors {
                if !self.rooms[neighbor].is_accessible_from_main_room {
                    self.rooms[neighbor].is_accessible_from_main_room = true;
                    queue.push_back(neighbor);
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Candidate {
    distance: i64,
    room_a: RoomIndex,
    room_b: RoomIndex,
    tile_a: Coord,
    tile_b: Coord,
}

/// Closest edge-tile pair between `room_a` and any room in `others`. Ties keep
/// the first pair found.
fn closest_pair(
    rooms: &RoomSet,
    room_a: RoomIndex,
    others: &[RoomIndex],
    best: &mut Option<Candidate>,
) {
    for &room_b in others {
        if room_a == room_b || rooms.is_connected(room_a, room_b) {
            continue;
        }
        for &tile_a in &rooms.rooms[room_a].edge_tiles {
            for &tile_b in &rooms.rooms[room_b].edge_tiles {
                let distance = tile_a.squared_distance(tile_b);
                if best.is_none_or(|current| distance < current.distance) {
                    *best = Some(Candidate { distance, room_a, room_b, tile_a, tile_b });
                }
            }
        }
    }
}

fn link(grid: &mut Grid, rooms: &mut RoomSet, candidate: Candidate, radius: u32) -> Passage {
    let passage = Passage { from: candidate.tile_a, to: candidate.tile_b, radius };
    carve_passage(grid, passage);
    rooms.connect(candidate.room_a, candidate.room_b);
    passage
}

/// Connects every room to the main room and carves the passages into `grid`.
///
/// First each room without any connection is linked to its nearest room.
/// Then, until every room is accessible, the globally closest pair between an
/// accessible and an inaccessible room is linked.
pub fn connect_rooms(grid: &mut Grid, rooms: &mut RoomSet, radius: u32) -> Vec<Passage> {
    let mut passages = Vec::new();
    let all: Vec<RoomIndex> = (0..rooms.len()).collect();

    for room_a in 0..rooms.len() {
        if !rooms.connections(room_a).is_empty() {
            continue;
        }
        let mut best = None;
        closest_pair(rooms, room_a, &all, &mut best);
        if let Some(candidate) = best {
            passages.push(link(grid, rooms, candidate, radius));
        }
    }
    let nearest_links = passages.len();

    loop {
        let (accessible, pending): (Vec<RoomIndex>, Vec<RoomIndex>) =
            all.iter().copied().partition(|&index| rooms.rooms[index].is_accessible_from_main_room);
        if pending.is_empty() {
            break;
        }
        let mut best = None;
        for &room_a in &accessible {
            closest_pair(rooms, room_a, &pending, &mut best);
        }
        let Some(candidate) = best else {
            warn!(
                accessible = accessible.len(),
                pending = pending.len(),
                "no edge-tile pair left between accessible and pending rooms"
            );
            break;
        };
        passages.push(link(grid, rooms, candidate, radius));
    }

    debug!(
        rooms = rooms.len(),
        nearest_links,
        forced_links = passages.len() - nearest_links,
        "connected rooms"
    );
    passages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::regions::extract_regions;

    fn rooms_for(grid: &Grid) -> RoomSet {
        RoomSet::from_regions(grid, extract_regions(grid, TileKind::Room))
    }

    #[test]
    fn edge_tiles_include_diagonal_wall_contact() {
        // The centre of the 3x3 block touches no wall; its ring does.
        let grid = Grid::from_text(
            "11111\n\
             10001\n\
             10001\n\
             10001\n\
             11111\n",
        )
        .expect("grid");
        let rooms = rooms_for(&grid);
        let room = &rooms.rooms()[0];
        assert_eq!(room.size(), 9);
        assert_eq!(room.edge_tiles.len(), 8);
        assert!(!room.edge_tiles.contains(&Coord::new(2, 2)));
    }

    #[test]
    fn largest_room_is_the_single_main_room() {
        let grid = Grid::from_text(
            "1111111111\n\
             1001000001\n\
             1001000001\n\
             1111111111\n",
        )
        .expect("grid");
        let rooms = rooms_for(&grid);
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms.main_room(), Some(0));
        assert_eq!(rooms.rooms()[0].size(), 10);
        assert_eq!(rooms.rooms().iter().filter(|room| room.is_main_room).count(), 1);
        assert!(rooms.rooms()[0].is_accessible_from_main_room);
        assert!(!rooms.rooms()[1].is_accessible_from_main_room);
    }

    #[test]
    fn connections_are_symmetric_and_propagate_accessibility() {
        let grid = Grid::from_text(
            "11111111111\n\
             10001010001\n\
             10001010001\n\
             11111111111\n",
        )
        .expect("grid");
        let mut rooms = rooms_for(&grid);
        assert_eq!(rooms.len(), 3);

        rooms.connect(1, 2);
        assert!(rooms.is_connected(1, 2) && rooms.is_connected(2, 1));
        assert!(!rooms.rooms()[1].is_accessible_from_main_room);

        rooms.connect(0, 1);
        assert!(rooms.all_accessible(), "accessibility should flow through room 1 to room 2");
    }

    #[test]
    fn connector_links_every_room_to_the_main_room() {
        let mut grid = Grid::from_text(
            "111111111111111\n\
             100011111110001\n\
             100011111110001\n\
             111111111111111\n\
             111111111111111\n\
             111111100011111\n\
             111111100011111\n\
             111111111111111\n",
        )
        .expect("grid");
        let mut rooms = rooms_for(&grid);
        let passages = connect_rooms(&mut grid, &mut rooms, 1);

        assert!(!passages.is_empty());
        assert!(rooms.all_accessible());
        assert_eq!(extract_regions(&grid, TileKind::Room).len(), 1, "\n{}", grid.draw());
    }

    #[test]
    fn nearest_pairs_that_form_separate_islands_are_forced_together() {
        // Two tight pairs far apart: the nearest-room pass links each pair
        // to itself, leaving the second pair unreachable until the forced pass.
        let mut grid = Grid::from_text(
            "1111111111111111111111\n\
             1001011111111111101001\n\
             1001011111111111101001\n\
             1111111111111111111111\n",
        )
        .expect("grid");
        let mut rooms = rooms_for(&grid);
        assert_eq!(rooms.len(), 4);

        let passages = connect_rooms(&mut grid, &mut rooms, 0);
        assert!(passages.len() >= 3, "expected a forced link, got {passages:?}");
        assert!(rooms.all_accessible());
    }

    #[test]
    fn rooms_without_edge_tiles_stop_the_forced_pass() {
        let mut grid = Grid::from_text(
            "1111111\n\
             1001001\n\
             1111111\n",
        )
        .expect("grid");
        let mut rooms = rooms_for(&grid);
        assert_eq!(rooms.len(), 2);
        rooms.rooms[1].edge_tiles.clear();

        let passages = connect_rooms(&mut grid, &mut rooms, 1);
        assert!(passages.is_empty());
        assert!(!rooms.all_accessible());
        assert_eq!(grid.count(TileKind::Room), 4);
    }

    #[test]
    fn empty_room_set_is_a_no_op() {
        let mut grid = Grid::new(6, 6, TileKind::Wall);
        let mut rooms = rooms_for(&grid);
        let passages = connect_rooms(&mut grid, &mut rooms, 1);
        assert!(rooms.is_empty());
        assert!(passages.is_empty());
        assert_eq!(grid.count(TileKind::Room), 0);
    }
}
