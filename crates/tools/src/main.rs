use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use levelgen::export::export_level_or_warn;
use levelgen::graph::{Centrality, DEFAULT_RANKED_PATH_COUNT, Graph, tile_graph, tile_node_id};
use levelgen::{Coord, GenerationConfig, Grid, MapGenerator, NodeId};
use serde::Serialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a level and write its grid and area files
    Generate(GenerateArgs),
    /// Report shortest paths and centrality between two cells of a grid file
    Analyze(AnalyzeArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// TOML file with generation parameters; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long)]
    seed: Option<String>,
    /// Ignore any configured seed and derive one from the clock
    #[arg(long)]
    random_seed: bool,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
    #[arg(long)]
    border_size: Option<usize>,
    #[arg(long)]
    fill_probability: Option<u32>,
    #[arg(long)]
    smoothing_iterations: Option<u32>,
    #[arg(long)]
    passage_radius: Option<u32>,
    /// Directory receiving `level_<hash>.txt` and `level_<hash>.areas.json`
    #[arg(short, long, default_value = "levels")]
    out: PathBuf,
    /// Also print the grid to stdout
    #[arg(long)]
    print: bool,
}

impl GenerateArgs {
    fn apply(&self, config: &mut GenerationConfig) {
        if let Some(seed) = &self.seed {
            config.seed = Some(seed.clone());
        }
        if self.random_seed {
            config.use_random_seed = true;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(border_size) = self.border_size {
            config.border_size = border_size;
        }
        if let Some(fill_probability) = self.fill_probability {
            config.fill_probability = fill_probability;
        }
        if let Some(iterations) = self.smoothing_iterations {
            config.smoothing_iterations = iterations;
        }
        if let Some(radius) = self.passage_radius {
            config.passage_radius = radius;
        }
    }
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Text grid written by `generate`
    #[arg(short, long)]
    grid: PathBuf,
    /// Start cell as `row,column`
    #[arg(long, value_parser = parse_coord)]
    from: Coord,
    /// Target cell as `row,column`
    #[arg(long, value_parser = parse_coord)]
    to: Coord,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct AnalysisReport {
    from: Coord,
    to: Coord,
    /// `None` when the target is unreachable.
    distance: Option<f64>,
    ranked_paths: Vec<RankedPath>,
    centrality: Vec<CellCredit>,
}

#[derive(Serialize)]
struct RankedPath {
    distance: f64,
    cells: Vec<Coord>,
}

#[derive(Serialize)]
struct CellCredit {
    cell: Coord,
    credit: f64,
}

fn parse_coord(text: &str) -> Result<Coord, String> {
    let (row, column) =
        text.split_once(',').ok_or_else(|| format!("expected `row,column`, got {text:?}"))?;
    let row = row.trim().parse().map_err(|err| format!("bad row {row:?}: {err}"))?;
    let column = column.trim().parse().map_err(|err| format!("bad column {column:?}: {err}"))?;
    Ok(Coord::new(row, column))
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Command::Generate(args) => generate(&args),
        Command::Analyze(args) => analyze(&args),
    }
}

fn generate(args: &GenerateArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => GenerationConfig::load_toml(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => GenerationConfig::default(),
    };
    args.apply(&mut config);

    let generator = MapGenerator::new(config).context("Invalid generation parameters")?;
    let level = generator.generate();

    println!("Seed: {} ({:016x})", level.seed, level.seed_hash);
    println!("Size: {}x{}", level.grid.width(), level.grid.height());
    println!("Rooms: {}, passages: {}", level.rooms.len(), level.passages.len());
    if let Some(files) = export_level_or_warn(&args.out, &level) {
        println!("Grid: {}", files.grid.display());
        println!("Areas: {}", files.areas.display());
    }
    if args.print {
        print!("{}", level.grid.draw());
    }
    Ok(())
}

fn analyze(args: &AnalyzeArgs) -> Result<()> {
    let text = fs::read_to_string(&args.grid)
        .with_context(|| format!("Failed to read grid file: {}", args.grid.display()))?;
    let grid = Grid::from_text(&text)
        .with_context(|| format!("Failed to parse grid file: {}", args.grid.display()))?;
    let graph = tile_graph(&grid).context("Failed to build tile graph")?;

    let from = open_cell(&grid, &graph, args.from)?;
    let to = open_cell(&grid, &graph, args.to)?;

    let ranked_paths = graph
        .ranked_shortest_paths(from, to, DEFAULT_RANKED_PATH_COUNT)
        .into_iter()
        .map(|path| RankedPath {
            distance: path.distance,
            cells: path.nodes.iter().filter_map(|&id| cell_of(&graph, id)).collect(),
        })
        .collect();
    let mut credits = Centrality::new();
    let distance = graph.accumulate_centrality(from, to, &mut credits);
    let mut centrality: Vec<CellCredit> = credits
        .into_iter()
        .filter_map(|(id, credit)| cell_of(&graph, id).map(|cell| CellCredit { cell, credit }))
        .collect();
    centrality.sort_by(|left, right| right.credit.total_cmp(&left.credit));

    let report = AnalysisReport {
        from: args.from,
        to: args.to,
        distance: distance.is_finite().then_some(distance),
        ranked_paths,
        centrality,
    };

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{json}");
    } else {
        print_report(&report);
    }
    Ok(())
}

fn open_cell(grid: &Grid, graph: &Graph, coord: Coord) -> Result<NodeId> {
    let Some(id) = tile_node_id(grid, coord) else {
        bail!(
            "Cell {},{} lies outside the {}x{} grid",
            coord.row,
            coord.column,
            grid.width(),
            grid.height()
        );
    };
    if !graph.contains(id) {
        bail!("Cell {},{} is a wall", coord.row, coord.column);
    }
    Ok(id)
}

fn cell_of(graph: &Graph, id: NodeId) -> Option<Coord> {
    graph.node(id).and_then(|node| node.data.coord())
}

fn format_cells(cells: &[Coord]) -> String {
    cells.iter().map(|cell| format!("({},{})", cell.row, cell.column)).collect::<Vec<_>>().join(" ")
}

fn print_report(report: &AnalysisReport) {
    match report.distance {
        Some(distance) => println!("Shortest distance: {distance:.3}"),
        None => {
            println!("Target is unreachable");
            return;
        }
    }
    for (rank, path) in report.ranked_paths.iter().enumerate() {
        println!("Path #{} ({:.3}): {}", rank + 1, path.distance, format_cells(&path.cells));
    }
    for entry in &report.centrality {
        println!("  ({},{}) credit {:.3}", entry.cell.row, entry.cell.column, entry.credit);
    }
}
