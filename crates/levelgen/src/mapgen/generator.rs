//! High-level level generation: seed resolution, the cave pipeline, and the
//! final border ring.

mod pipeline;

use rand_chacha::rand_core::Rng;
use tracing::info;

use crate::config::GenerationConfig;
use crate::error::ConfigError;

use super::border::wrap_with_border;
use super::model::GeneratedLevel;
use super::seed::{SeedChoice, rng_from_seed, seed_hash};
use pipeline::build_cave;

pub struct MapGenerator {
    config: GenerationConfig,
}

impl MapGenerator {
    pub fn new(config: GenerationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Resolves the seed (a time-derived one when none is configured) and
    /// generates from its stream.
    pub fn generate(&self) -> GeneratedLevel {
        let seed = SeedChoice::resolve(self.config.seed.as_deref(), self.config.use_random_seed);
        let mut rng = rng_from_seed(seed.value());
        self.generate_with_rng(seed.value(), &mut rng)
    }

    /// Generates from a caller-supplied stream. `seed` is only recorded.
    pub fn generate_with_rng<R: Rng + ?Sized>(&self, seed: &str, rng: &mut R) -> GeneratedLevel {
        let cave = build_cave(&self.config, rng);

        let border = self.config.border_size;
        let offset = border as i32;
        let grid = wrap_with_border(&cave.grid, border);
        let passages =
            cave.passages.into_iter().map(|passage| passage.translated(offset, offset)).collect();

        let level = GeneratedLevel {
            seed: seed.to_string(),
            seed_hash: seed_hash(seed),
            border_size: border,
            grid,
            rooms: cave.rooms,
            passages,
        };
        info!(
            seed = %level.seed,
            seed_hash = format_args!("{:016x}", level.seed_hash),
            width = level.grid.width(),
            height = level.grid.height(),
            rooms = level.rooms.len(),
            passages = level.passages.len(),
            "generated level"
        );
        level
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, VecDeque};

    use proptest::prelude::*;

    use super::*;
    use crate::grid::Grid;
    use crate::mapgen::border::border_is_solid;
    use crate::mapgen::fill::{SmoothingRule, random_fill, smooth};
    use crate::mapgen::regions::{PruneThresholds, extract_regions, prune_regions};
    use crate::types::{Connectivity, Coord, TileKind};

    fn small_config(seed: &str) -> GenerationConfig {
        GenerationConfig {
            width: 40,
            height: 30,
            wall_region_min_size: 10,
            room_region_min_size: 10,
            ..GenerationConfig::default()
        }
        .with_seed(seed)
    }

    fn room_tiles_connected(grid: &Grid) -> bool {
        let room_tiles: Vec<Coord> =
            grid.coords().filter(|&coord| grid.tile_at(coord) == TileKind::Room).collect();
        let Some(&start) = room_tiles.first() else {
            return true;
        };
        let mut open = VecDeque::from([start]);
        let mut seen = BTreeSet::from([start]);
        while let Some(current) = open.pop_front() {
            for next in Connectivity::Orthogonal.neighbors(current) {
                if grid.tile_at(next) == TileKind::Room && seen.insert(next) {
                    open.push_back(next);
                }
            }
        }
        seen.len() == room_tiles.len()
    }

    fn on_outer_ring(grid: &Grid, coord: Coord) -> bool {
        coord.row == 0
            || coord.column == 0
            || coord.row as usize == grid.height() - 1
            || coord.column as usize == grid.width() - 1
    }

    #[test]
    fn same_seed_produces_byte_identical_levels() {
        let generator = MapGenerator::new(small_config("determinism")).expect("valid config");
        let first = generator.generate();
        let second = generator.generate();
        assert_eq!(first.grid.canonical_bytes(), second.grid.canonical_bytes());
        assert_eq!(first.passages, second.passages);
    }

    #[test]
    fn different_seeds_produce_different_levels() {
        let left = MapGenerator::new(small_config("left")).expect("valid").generate();
        let right = MapGenerator::new(small_config("right")).expect("valid").generate();
        assert_ne!(left.grid.fingerprint(), right.grid.fingerprint());
    }

    #[test]
    fn missing_seed_falls_back_to_a_generated_one() {
        let config = GenerationConfig { seed: None, ..small_config("unused") };
        let level = MapGenerator::new(config).expect("valid").generate();
        assert!(!level.seed.is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = GenerationConfig { fill_probability: 150, ..GenerationConfig::default() };
        assert!(MapGenerator::new(config).is_err());
    }

    #[test]
    fn bordered_output_has_expected_size_and_solid_ring() {
        let config = GenerationConfig { border_size: 3, ..small_config("border") };
        let level = MapGenerator::new(config).expect("valid").generate();
        assert_eq!(level.grid.width(), 46);
        assert_eq!(level.grid.height(), 36);
        assert!(border_is_solid(&level.grid, 3), "\n{}", level.grid.draw());
    }

    #[test]
    fn fully_walled_fill_yields_empty_room_set_without_panicking() {
        let config = GenerationConfig { fill_probability: 100, ..small_config("solid") };
        let level = MapGenerator::new(config).expect("valid").generate();
        assert!(level.rooms.is_empty());
        assert!(level.passages.is_empty());
        assert_eq!(level.grid.count(TileKind::Room), 0);
        assert!(level.areas().is_empty());
    }

    #[test]
    fn room_tiles_map_into_the_bordered_grid() {
        let level = MapGenerator::new(small_config("frames")).expect("valid").generate();
        for tile in level.room_tiles() {
            assert_eq!(level.grid.tile_at(tile), TileKind::Room, "{tile:?}");
        }
    }

    #[test]
    fn areas_cover_rooms_then_corridors() {
        let level = MapGenerator::new(small_config("areas")).expect("valid").generate();
        let areas = level.areas();
        assert_eq!(areas.len(), level.rooms.len() + level.passages.len());
        assert!(areas[..level.rooms.len()].iter().all(|area| !area.is_corridor));
        assert!(areas[level.rooms.len()..].iter().all(|area| area.is_corridor));
        for area in &areas {
            assert!(level.grid.in_bounds(area.origin) && level.grid.in_bounds(area.end));
        }
        let offset = level.border_size as i32;
        for (room, area) in level.rooms.rooms().iter().zip(&areas) {
            assert!(room.tiles.iter().all(|tile| area.contains(tile.offset(offset, offset))));
        }
        for (passage, area) in level.passages.iter().zip(&areas[level.rooms.len()..]) {
            assert!(area.contains(passage.from) && area.contains(passage.to), "{passage:?}");
        }
    }

    #[test]
    fn radius_wider_than_the_map_still_connects_every_room() {
        for passage_radius in [50_000, u32::MAX] {
            let config = GenerationConfig {
                fill_probability: 52,
                wall_region_min_size: 3,
                room_region_min_size: 3,
                passage_radius,
                ..small_config("wide-brush")
            };
            let level = MapGenerator::new(config).expect("valid config").generate();
            assert!(level.rooms.all_accessible());
            assert!(room_tiles_connected(&level.grid), "\n{}", level.grid.draw());
            if !level.passages.is_empty() {
                let interior_walls = level
                    .grid
                    .coords()
                    .filter(|&coord| !on_outer_ring(&level.grid, coord))
                    .filter(|&coord| level.grid.is_wall(coord))
                    .count();
                assert_eq!(interior_walls, 0, "\n{}", level.grid.draw());
            }
            for area in level.areas() {
                assert!(level.grid.in_bounds(area.origin) && level.grid.in_bounds(area.end));
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]
        #[test]
        fn generated_levels_keep_room_tiles_connected(
            seed in "[a-z0-9]{1,12}",
            fill in 35_u32..=55,
            radius in 1_u32..=3,
        ) {
            let config = GenerationConfig {
                fill_probability: fill,
                passage_radius: radius,
                ..small_config(&seed)
            };
            let level = MapGenerator::new(config).expect("valid").generate();
            prop_assert!(level.rooms.all_accessible());
            prop_assert!(
                room_tiles_connected(&level.grid),
                "seed={seed} fill={fill} radius={radius}\n{}",
                level.grid.draw()
            );
            prop_assert!(border_is_solid(&level.grid, 1));
        }

        #[test]
        fn pruning_leaves_no_undersized_regions_before_carving(
            seed in "[a-z]{1,8}",
        ) {
            let config = small_config(&seed);
            let mut rng = rng_from_seed(&seed);
            let mut raw =
                random_fill(config.width, config.height, config.fill_probability, &mut rng);
            smooth(
                &mut raw,
                config.smoothing_iterations,
                SmoothingRule { high: config.wall_neighbor_high, low: config.wall_neighbor_low },
            );
            prune_regions(
                &mut raw,
                PruneThresholds {
                    wall_region_min_size: config.wall_region_min_size,
                    room_region_min_size: config.room_region_min_size,
                },
            );
            for region in extract_regions(&raw, TileKind::Room) {
                prop_assert!(region.len() >= config.room_region_min_size);
            }
            for region in extract_regions(&raw, TileKind::Wall) {
                prop_assert!(region.len() >= config.wall_region_min_size);
            }
        }
    }
}
