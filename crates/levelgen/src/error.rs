use std::io;

use thiserror::Error;

use crate::graph::NodeId;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be positive")]
    ZeroDimension { field: &'static str },
    #[error("{field} = {value} is outside {min}..={max}")]
    OutOfRange { field: &'static str, value: u32, min: u32, max: u32 },
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridParseError {
    #[error("grid text contains no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
    #[error("unknown marker {marker:?} at row {row}, column {column}")]
    UnknownMarker { row: usize, column: usize, marker: char },
}

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("node {0:?} already exists")]
    NodeExists(NodeId),
    #[error("node {0:?} does not exist")]
    MissingNode(NodeId),
    #[error("edge weight {0} must be finite and non-negative")]
    InvalidWeight(f64),
}

#[derive(Debug, Error, PartialEq)]
pub enum GraphBuildError {
    #[error("graph construction was cancelled")]
    Cancelled,
    #[error("graph construction exceeded its budget of {0} line-of-sight checks")]
    BudgetExhausted(u64),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io { path: String, source: io::Error },
    #[error("failed to serialize areas: {0}")]
    Serialize(#[from] serde_json::Error),
}
