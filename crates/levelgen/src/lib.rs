pub mod area;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod grid;
pub mod mapgen;
pub mod types;

pub use area::Area;
pub use config::GenerationConfig;
pub use error::{ConfigError, ExportError, GraphBuildError, GraphError, GridParseError};
pub use graph::{Centrality, Graph, NodeData, NodeId, Path};
pub use grid::Grid;
pub use mapgen::{GeneratedLevel, MapGenerator, generate_level};
pub use types::*;
