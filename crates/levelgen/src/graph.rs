//! Weighted graphs derived from a generated level, and the path queries run
//! over them.

mod builder;
mod limits;
mod model;
mod paths;
mod sight;

pub use builder::{area_graph, tile_graph, tile_node_id, visibility_graph};
pub use limits::{CancelToken, VisibilityLimits};
pub use model::{Edge, Graph, Node, NodeData, NodeId};
pub use paths::{Centrality, DEFAULT_RANKED_PATH_COUNT, Path};
pub use sight::has_line_of_sight;
