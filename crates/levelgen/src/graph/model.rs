use std::collections::BTreeMap;

use crate::area::Area;
use crate::error::GraphError;
use crate::types::{Coord, TileKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

/// Per-node properties. Each builder emits a single variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeData {
    Tile { coord: Coord, tile: TileKind },
    Area(Area),
}

impl NodeData {
    pub fn coord(&self) -> Option<Coord> {
        match self {
            Self::Tile { coord, .. } => Some(*coord),
            Self::Area(_) => None,
        }
    }

    pub fn area(&self) -> Option<&Area> {
        match self {
            Self::Area(area) => Some(area),
            Self::Tile { .. } => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub data: NodeData,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub to: NodeId,
    pub weight: f64,
}

/// Undirected graph with non-negative edge weights. Every edge is stored on
/// both endpoints.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    nodes: BTreeMap<NodeId, NodeData>,
    adjacency: BTreeMap<NodeId, Vec<Edge>>,
    edge_count: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: NodeId, data: NodeData) -> Result<(), GraphError> {
        if self.nodes.contains_key(&id) {
            return Err(GraphError::NodeExists(id));
        }
        self.nodes.insert(id, data);
        self.adjacency.insert(id, Vec::new());
        Ok(())
    }

    /// Adds `a -- b`. Re-adding an existing edge replaces its weight.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, weight: f64) -> Result<(), GraphError> {
        for id in [a, b] {
            if !self.nodes.contains_key(&id) {
                return Err(GraphError::MissingNode(id));
            }
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(GraphError::InvalidWeight(weight));
        }

        if self.set_half_edge(a, b, weight) {
            self.edge_count += 1;
        }
        if a != b {
            self.set_half_edge(b, a, weight);
        }
        Ok(())
    }

    fn set_half_edge(&mut self, from: NodeId, to: NodeId, weight: f64) -> bool {
        let edges = self.adjacency.entry(from).or_default();
        match edges.iter_mut().find(|edge| edge.to == to) {
            Some(edge) => {
                edge.weight = weight;
                false
            }
            None => {
                edges.push(Edge { to, weight });
                true
            }
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<Node> {
        self.nodes.get(&id).map(|&data| Node { id, data })
    }

    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.nodes.iter().map(|(&id, &data)| Node { id, data })
    }

    pub fn neighbors(&self, id: NodeId) -> &[Edge] {
        self.adjacency.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edge_weight(&self, a: NodeId, b: NodeId) -> Option<f64> {
        self.neighbors(a).iter().find(|edge| edge.to == b).map(|edge| edge.weight)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}
