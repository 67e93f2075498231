//! Shortest-path queries: Dijkstra, Yen's ranked loopless paths, and the
//! bounded betweenness-centrality approximation built on them.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use super::model::{Graph, NodeId};

/// Number of ranked paths examined per centrality query. Equal-length
/// shortest paths beyond this count are not found, so their intermediate
/// nodes go uncredited.
pub const DEFAULT_RANKED_PATH_COUNT: usize = 3;

const DISTANCE_EPSILON: f64 = 1e-9;

/// Per-node centrality credit accumulated across queries.
pub type Centrality = BTreeMap<NodeId, f64>;

#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    pub distance: f64,
    /// Source first, target last.
    pub nodes: Vec<NodeId>,
}

impl Path {
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

#[derive(Clone, Copy, Debug)]
struct Frontier {
    distance: f64,
    node: NodeId,
}

// Reversed so `BinaryHeap` pops the nearest node, lowest id first on ties.
impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other.distance.total_cmp(&self.distance).then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

#[derive(Default)]
struct Exclusions {
    nodes: BTreeSet<NodeId>,
    edges: BTreeSet<(NodeId, NodeId)>,
}

impl Exclusions {
    fn blocks(&self, from: NodeId, to: NodeId) -> bool {
        self.nodes.contains(&to) || self.edges.contains(&edge_key(from, to))
    }
}

fn edge_key(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b { (a, b) } else { (b, a) }
}

impl Graph {
    /// Distance of the shortest `source -> target` path, or infinity when the
    /// target is unreachable or either node is missing.
    pub fn shortest_path_length(&self, source: NodeId, target: NodeId) -> f64 {
        self.shortest_path(source, target).map_or(f64::INFINITY, |path| path.distance)
    }

    pub fn shortest_path(&self, source: NodeId, target: NodeId) -> Option<Path> {
        self.dijkstra(source, target, &Exclusions::default())
    }

    /// Up to `count` loopless paths in non-decreasing distance order (Yen).
    /// Ties keep discovery order.
    pub fn ranked_shortest_paths(&self, source: NodeId, target: NodeId, count: usize) -> Vec<Path> {
        let mut ranked: Vec<Path> = Vec::new();
        if count == 0 {
            return ranked;
        }
        let Some(first) = self.shortest_path(source, target) else {
            return ranked;
        };
        ranked.push(first);

        let mut candidates: Vec<Path> = Vec::new();
        while ranked.len() < count {
            let Some(previous) = ranked.last().cloned() else {
                break;
            };

            for spur_index in 0..previous.hops() {
                let root = &previous.nodes[..=spur_index];
                let spur = previous.nodes[spur_index];

                let mut excluded = Exclusions::default();
                for path in &ranked {
                    if path.nodes.len() > spur_index + 1 && path.nodes[..=spur_index] == *root {
                        excluded
                            .edges
                            .insert(edge_key(path.nodes[spur_index], path.nodes[spur_index + 1]));
                    }
                }
                excluded.nodes.extend(root[..spur_index].iter().copied());

                let Some(spur_path) = self.dijkstra(spur, target, &excluded) else {
                    continue;
                };
                let mut nodes = root[..spur_index].to_vec();
                nodes.extend(spur_path.nodes);
                let candidate =
                    Path { distance: self.root_distance(root) + spur_path.distance, nodes };

                if !candidates.iter().chain(&ranked).any(|path| path.nodes == candidate.nodes) {
                    candidates.push(candidate);
                }
            }

            let best = candidates
                .iter()
                .enumerate()
                .min_by(|(_, left), (_, right)| left.distance.total_cmp(&right.distance))
                .map(|(index, _)| index);
            let Some(best) = best else {
                break;
            };
            ranked.push(candidates.remove(best));
        }
        ranked
    }

    /// Credits `1 / hops` to every intermediate node of each ranked path
    /// whose distance equals the minimum, then returns that minimum. The
    /// source and target are never credited. Unreachable pairs return
    /// infinity and leave `centrality` untouched.
    pub fn accumulate_centrality(
        &self,
        source: NodeId,
        target: NodeId,
        centrality: &mut Centrality,
    ) -> f64 {
        let paths = self.ranked_shortest_paths(source, target, DEFAULT_RANKED_PATH_COUNT);
        let Some(shortest) = paths.first().map(|path| path.distance) else {
            return f64::INFINITY;
        };

        for path in paths.iter().filter(|path| (path.distance - shortest).abs() <= DISTANCE_EPSILON)
        {
            let hops = path.hops();
            if hops == 0 {
                continue;
            }
            let credit = 1.0 / hops as f64;
            for &node in &path.nodes[1..hops] {
                *centrality.entry(node).or_insert(0.0) += credit;
            }
        }
        shortest
    }

    fn root_distance(&self, root: &[NodeId]) -> f64 {
        root.windows(2).filter_map(|pair| self.edge_weight(pair[0], pair[1])).sum()
    }

    fn dijkstra(&self, source: NodeId, target: NodeId, excluded: &Exclusions) -> Option<Path> {
        if !self.contains(source) || !self.contains(target) || excluded.nodes.contains(&source) {
            return None;
        }

        let mut distances = BTreeMap::from([(source, 0.0)]);
        let mut came_from: BTreeMap<NodeId, NodeId> = BTreeMap::new();
        let mut settled = BTreeSet::new();
        let mut frontier = BinaryHeap::from([Frontier { distance: 0.0, node: source }]);

        while let Some(Frontier { distance, node }) = frontier.pop() {
            if !settled.insert(node) {
                continue;
            }
            if node == target {
                return Some(Path { distance, nodes: reconstruct_path(&came_from, source, target) });
            }
            for edge in self.neighbors(node) {
                if settled.contains(&edge.to) || excluded.blocks(node, edge.to) {
                    continue;
                }
                let candidate = distance + edge.weight;
                if distances.get(&edge.to).is_none_or(|&known| candidate < known) {
                    distances.insert(edge.to, candidate);
                    came_from.insert(edge.to, node);
                    frontier.push(Frontier { distance: candidate, node: edge.to });
                }
            }
        }
        None
    }
}

fn reconstruct_path(
    came_from: &BTreeMap<NodeId, NodeId>,
    source: NodeId,
    target: NodeId,
) -> Vec<NodeId> {
    let mut nodes = vec![target];
    let mut current = target;
    while current != source {
        let Some(&previous) = came_from.get(&current) else {
            break;
        };
        nodes.push(previous);
        current = previous;
    }
    nodes.reverse();
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeData;
    use crate::types::{Coord, TileKind};

    fn graph_with_nodes(count: u64) -> Graph {
        let mut graph = Graph::new();
        for id in 0..count {
            let data = NodeData::Tile { coord: Coord::new(0, id as i32), tile: TileKind::Room };
            graph.add_node(NodeId(id), data).expect("node");
        }
        graph
    }

    /// 0 -> {1, 2} -> 3 at distance 2, plus a direct 0 -- 3 edge of weight 5.
    fn diamond() -> Graph {
        let mut graph = graph_with_nodes(4);
        for (a, b, weight) in [(0, 1, 1.0), (0, 2, 1.0), (1, 3, 1.0), (2, 3, 1.0), (0, 3, 5.0)] {
            graph.add_edge(NodeId(a), NodeId(b), weight).expect("edge");
        }
        graph
    }

    #[test]
    fn shortest_path_prefers_lighter_detours() {
        let mut graph = graph_with_nodes(3);
        graph.add_edge(NodeId(0), NodeId(2), 10.0).expect("edge");
        graph.add_edge(NodeId(0), NodeId(1), 2.0).expect("edge");
        graph.add_edge(NodeId(1), NodeId(2), 3.0).expect("edge");

        let path = graph.shortest_path(NodeId(0), NodeId(2)).expect("reachable");
        assert_eq!(path.distance, 5.0);
        assert_eq!(path.nodes, vec![NodeId(0), NodeId(1), NodeId(2)]);
        assert_eq!(graph.shortest_path_length(NodeId(2), NodeId(0)), 5.0);
    }

    #[test]
    fn unreachable_or_missing_targets_are_infinite() {
        let mut graph = graph_with_nodes(3);
        graph.add_edge(NodeId(0), NodeId(1), 1.0).expect("edge");

        assert_eq!(graph.shortest_path_length(NodeId(0), NodeId(2)), f64::INFINITY);
        assert_eq!(graph.shortest_path_length(NodeId(0), NodeId(99)), f64::INFINITY);
        assert!(graph.shortest_path(NodeId(2), NodeId(0)).is_none());
        assert!(graph.ranked_shortest_paths(NodeId(0), NodeId(2), 3).is_empty());
    }

    #[test]
    fn path_to_self_is_empty() {
        let graph = diamond();
        let path = graph.shortest_path(NodeId(1), NodeId(1)).expect("self");
        assert_eq!(path.distance, 0.0);
        assert_eq!(path.hops(), 0);
        assert_eq!(graph.ranked_shortest_paths(NodeId(1), NodeId(1), 3).len(), 1);
    }

    #[test]
    fn ranked_paths_come_out_in_distance_order() {
        let graph = diamond();
        let paths = graph.ranked_shortest_paths(NodeId(0), NodeId(3), 5);
        let routes: Vec<Vec<NodeId>> = paths.iter().map(|path| path.nodes.clone()).collect();
        assert_eq!(
            routes,
            vec![
                vec![NodeId(0), NodeId(1), NodeId(3)],
                vec![NodeId(0), NodeId(2), NodeId(3)],
                vec![NodeId(0), NodeId(3)],
            ]
        );
        let distances: Vec<f64> = paths.iter().map(|path| path.distance).collect();
        assert_eq!(distances, vec![2.0, 2.0, 5.0]);
        assert_eq!(graph.ranked_shortest_paths(NodeId(0), NodeId(3), 1).len(), 1);
        assert!(graph.ranked_shortest_paths(NodeId(0), NodeId(3), 0).is_empty());
    }

    #[test]
    fn centrality_credits_only_intermediate_nodes_of_shortest_paths() {
        let graph = diamond();
        let mut centrality = Centrality::new();
        let distance = graph.accumulate_centrality(NodeId(0), NodeId(3), &mut centrality);

        assert_eq!(distance, 2.0);
        assert_eq!(centrality, Centrality::from([(NodeId(1), 0.5), (NodeId(2), 0.5)]));

        graph.accumulate_centrality(NodeId(0), NodeId(3), &mut centrality);
        assert_eq!(centrality.get(&NodeId(1)), Some(&1.0));
    }

    #[test]
    fn centrality_undercounts_beyond_the_ranked_path_cap() {
        // Four equal two-hop routes 0 -> {1..=4} -> 5; only three are ranked.
        let mut graph = graph_with_nodes(6);
        for middle in 1..=4 {
            graph.add_edge(NodeId(0), NodeId(middle), 1.0).expect("edge");
            graph.add_edge(NodeId(middle), NodeId(5), 1.0).expect("edge");
        }
        let mut centrality = Centrality::new();
        graph.accumulate_centrality(NodeId(0), NodeId(5), &mut centrality);

        assert_eq!(centrality.len(), DEFAULT_RANKED_PATH_COUNT);
        let total: f64 = centrality.values().sum();
        assert!((total - 1.5).abs() < 1e-9, "total credit {total}");
    }

    #[test]
    fn unreachable_centrality_query_changes_nothing() {
        let graph = graph_with_nodes(2);
        let mut centrality = Centrality::new();
        let distance = graph.accumulate_centrality(NodeId(0), NodeId(1), &mut centrality);
        assert_eq!(distance, f64::INFINITY);
        assert!(centrality.is_empty());
    }
}
