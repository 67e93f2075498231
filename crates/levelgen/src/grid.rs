//! Row-major tile storage shared by every generation stage and graph builder.

use xxhash_rust::xxh3::xxh3_64;

use crate::error::GridParseError;
use crate::types::{Coord, TileKind};

pub const WALL_MARKER: char = '1';
pub const ROOM_MARKER: char = '0';

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<TileKind>,
}

impl Grid {
    pub fn new(width: usize, height: usize, fill: TileKind) -> Self {
        Self { width, height, tiles: vec![fill; width * height] }
    }

    /// Builds a grid from rows of tiles. Rows must all have the same length.
    pub fn from_rows(rows: &[Vec<TileKind>]) -> Result<Self, GridParseError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut tiles = Vec::with_capacity(width * height);
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != width {
                return Err(GridParseError::RaggedRow { row, expected: width, found: cells.len() });
            }
            tiles.extend_from_slice(cells);
        }
        Ok(Self { width, height, tiles })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tiles(&self) -> &[TileKind] {
        &self.tiles
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.row >= 0
            && coord.column >= 0
            && (coord.row as usize) < self.height
            && (coord.column as usize) < self.width
    }

    /// Out-of-range reads see wall.
    pub fn tile_at(&self, coord: Coord) -> TileKind {
        if !self.in_bounds(coord) {
            return TileKind::Wall;
        }
        self.tiles[self.index(coord)]
    }

    pub fn is_wall(&self, coord: Coord) -> bool {
        self.tile_at(coord) == TileKind::Wall
    }

    /// Out-of-range writes are dropped.
    pub fn set_tile(&mut self, coord: Coord, tile: TileKind) {
        if !self.in_bounds(coord) {
            return;
        }
        let idx = self.index(coord);
        self.tiles[idx] = tile;
    }

    pub fn count(&self, tile: TileKind) -> usize {
        self.tiles.iter().filter(|&&current| current == tile).count()
    }

    /// Row-major iteration over every cell.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height).flat_map(move |row| {
            (0..self.width).map(move |column| Coord { row: row as i32, column: column as i32 })
        })
    }

    pub fn index(&self, coord: Coord) -> usize {
        (coord.row as usize) * self.width + (coord.column as usize)
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + self.tiles.len());
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        for tile in &self.tiles {
            bytes.push(match tile {
                TileKind::Wall => 1,
                TileKind::Room => 0,
            });
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    /// One line per row, `1` for wall and `0` for room, each line newline-terminated.
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity((self.width + 1) * self.height);
        for row in self.tiles.chunks(self.width.max(1)) {
            for tile in row {
                text.push(match tile {
                    TileKind::Wall => WALL_MARKER,
                    TileKind::Room => ROOM_MARKER,
                });
            }
            text.push('\n');
        }
        text
    }

    pub fn from_text(text: &str) -> Result<Self, GridParseError> {
        let mut rows = Vec::new();
        for (row, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            let mut cells = Vec::with_capacity(line.len());
            for (column, marker) in line.chars().enumerate() {
                cells.push(match marker {
                    WALL_MARKER => TileKind::Wall,
                    ROOM_MARKER => TileKind::Room,
                    other => {
                        return Err(GridParseError::UnknownMarker { row, column, marker: other });
                    }
                });
            }
            rows.push(cells);
        }
        if rows.is_empty() {
            return Err(GridParseError::Empty);
        }
        Self::from_rows(&rows)
    }

    /// Debug rendering with `#` and `.`, used in assertion messages.
    pub fn draw(&self) -> String {
        let mut text = String::new();
        for row in self.tiles.chunks(self.width.max(1)) {
            for tile in row {
                text.push(if *tile == TileKind::Wall { '#' } else { '.' });
            }
            text.push('\n');
        }
        text
    }
}
