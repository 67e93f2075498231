use std::collections::{BTreeSet, VecDeque};

use anyhow::{Context, Result, bail, ensure};
use clap::Parser;
use levelgen::graph::{tile_graph, tile_node_id};
use levelgen::mapgen::border::border_is_solid;
use levelgen::mapgen::passage::line;
use levelgen::{
    Connectivity, Coord, GeneratedLevel, GenerationConfig, Grid, MapGenerator, TileKind,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    levels: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn between(rng: &mut ChaCha8Rng, low: u32, high: u32) -> u32 {
    low + rng.next_u32() % (high - low + 1)
}

fn random_config(rng: &mut ChaCha8Rng, run_seed: u64, index: u32) -> GenerationConfig {
    GenerationConfig {
        width: between(rng, 8, 72) as usize,
        height: between(rng, 8, 56) as usize,
        border_size: choose(rng, &[0, 1, 1, 2, 4]),
        fill_probability: between(rng, 30, 60),
        smoothing_iterations: between(rng, 0, 3),
        wall_neighbor_high: choose(rng, &[4, 4, 5]),
        wall_neighbor_low: choose(rng, &[3, 4, 4]),
        wall_region_min_size: choose(rng, &[0, 10, 50]),
        room_region_min_size: choose(rng, &[0, 10, 50]),
        passage_radius: choose(rng, &[0, 1, 1, 2, 3]),
        seed: Some(format!("fuzz-{run_seed}-{index}")),
        use_random_seed: false,
    }
}

fn room_tiles_connected(grid: &Grid, connectivity: Connectivity) -> bool {
    let room_tiles: Vec<Coord> =
        grid.coords().filter(|&coord| grid.tile_at(coord) == TileKind::Room).collect();
    let Some(&start) = room_tiles.first() else {
        return true;
    };
    let mut open = VecDeque::from([start]);
    let mut seen = BTreeSet::from([start]);
    while let Some(current) = open.pop_front() {
        for next in connectivity.neighbors(current) {
            if grid.tile_at(next) == TileKind::Room && seen.insert(next) {
                open.push_back(next);
            }
        }
    }
    seen.len() == room_tiles.len()
}

fn check_level(config: &GenerationConfig, level: &GeneratedLevel) -> Result<()> {
    let grid = &level.grid;
    ensure!(
        grid.width() == config.width + 2 * config.border_size
            && grid.height() == config.height + 2 * config.border_size,
        "bordered grid is {}x{}",
        grid.width(),
        grid.height()
    );
    ensure!(border_is_solid(grid, config.border_size), "border ring is not solid");
    ensure!(level.rooms.all_accessible(), "a room is not accessible from the main room");

    // A zero-radius brush only guarantees diagonal contact between steps.
    let connectivity =
        if config.passage_radius == 0 { Connectivity::Moore } else { Connectivity::Orthogonal };
    ensure!(room_tiles_connected(grid, connectivity), "room tiles are split\n{}", grid.draw());

    for passage in &level.passages {
        for cell in line(passage.from, passage.to) {
            ensure!(grid.in_bounds(cell), "passage cell {cell:?} lies outside the grid");
        }
    }
    let areas = level.areas();
    for area in &areas {
        ensure!(grid.in_bounds(area.origin) && grid.in_bounds(area.end), "{area:?} out of bounds");
    }
    let offset = config.border_size as i32;
    for (room, area) in level.rooms.rooms().iter().zip(&areas) {
        let outside = room.tiles.iter().find(|tile| !area.contains(tile.offset(offset, offset)));
        ensure!(outside.is_none(), "room tile {outside:?} lies outside {area:?}");
    }
    for (passage, area) in level.passages.iter().zip(areas.iter().skip(level.rooms.len())) {
        ensure!(
            area.contains(passage.from) && area.contains(passage.to),
            "{passage:?} is not covered by {area:?}"
        );
    }

    if config.passage_radius > 0 {
        let mut room_tiles = level.room_tiles();
        if let (Some(first), Some(last)) = (room_tiles.next(), room_tiles.last()) {
            let graph = tile_graph(grid).context("tile graph")?;
            let (Some(from), Some(to)) = (tile_node_id(grid, first), tile_node_id(grid, last))
            else {
                bail!("room tile outside grid");
            };
            ensure!(
                graph.shortest_path_length(from, to).is_finite(),
                "no tile path from {first:?} to {last:?}"
            );
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("Starting level fuzz on seed {} for {} levels...", args.seed, args.levels);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut empty_levels = 0;

    for index in 0..args.levels {
        let config = random_config(&mut rng, args.seed, index);
        let level = MapGenerator::new(config.clone())
            .with_context(|| format!("fuzz produced an invalid config: {config:?}"))?
            .generate();
        check_level(&config, &level)
            .with_context(|| format!("invariant failed for level {index}: {config:?}"))?;

        if level.rooms.is_empty() {
            empty_levels += 1;
        }
        debug!(index, rooms = level.rooms.len(), passages = level.passages.len(), "level ok");
    }

    info!(levels = args.levels, empty_levels, "fuzz run finished");
    println!("Fuzzing completed successfully.");
    Ok(())
}
