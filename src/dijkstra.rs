//! Single-pair shortest paths over the road graph.
//!
//! A pure function: the graph and both endpoints are explicit parameters and
//! nothing is cached between calls.

use ordered_float::OrderedFloat;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::domain::NodeId;
use crate::error::Result;
use crate::graph::RoadGraph;

/// Outcome of a shortest-path search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    /// Total path length in meters, `f64::INFINITY` when unreachable.
    pub cost: f64,
    /// Node ids from source to target; empty when unreachable.
    pub path: Vec<NodeId>,
}

impl PathResult {
    pub fn unreachable() -> Self {
        Self {
            cost: f64::INFINITY,
            path: Vec::new(),
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.cost.is_finite()
    }
}

#[derive(Copy, Clone, Eq, PartialEq)]
struct State {
    cost: OrderedFloat<f64>,
    id: NodeId,
    node: NodeIndex,
}

// Min-heap by (cost, id); BinaryHeap is a max-heap so the comparison is reversed
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.cost, other.id).cmp(&(self.cost, self.id))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra's algorithm from `source` to `target`, treating every road as
/// drivable in both directions.
///
/// Stops as soon as the target is settled. Fails with
/// [`InvalidNode`](crate::error::RoutingError::InvalidNode) when either
/// endpoint is not part of the graph.
///
/// # Examples
///
/// ```
/// use puno_routes::dijkstra::shortest_path;
/// use puno_routes::domain::{Coordinate, NodeId};
/// use puno_routes::graph::RoadGraph;
///
/// let (a, b, c) = (NodeId(1), NodeId(2), NodeId(3));
/// let mut graph = RoadGraph::new();
/// graph.add_node(a, Coordinate::new(0.0, 0.0));
/// graph.add_node(b, Coordinate::new(0.0, 1.0));
/// graph.add_node(c, Coordinate::new(0.0, 2.0));
/// graph.add_edge(a, b, 5.0).unwrap();
/// graph.add_edge(b, c, 5.0).unwrap();
/// graph.add_edge(a, c, 20.0).unwrap();
///
/// let result = shortest_path(&graph, a, c).unwrap();
/// assert_eq!(result.cost, 10.0);
/// assert_eq!(result.path, vec![a, b, c]);
/// ```
pub fn shortest_path(graph: &RoadGraph, source: NodeId, target: NodeId) -> Result<PathResult> {
    let start = graph.index_of(source)?;
    let goal = graph.index_of(target)?;
    let g = graph.inner();

    let n = g.node_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<NodeIndex>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut heap = BinaryHeap::new();

    dist[start.index()] = 0.0;
    heap.push(State {
        cost: OrderedFloat(0.0),
        id: source,
        node: start,
    });

    while let Some(State { cost, node, .. }) = heap.pop() {
        if settled[node.index()] {
            continue;
        }
        settled[node.index()] = true;

        if node == goal {
            break;
        }

        for edge in g.edges(node) {
            let next = edge.target();
            if settled[next.index()] {
                continue;
            }
            let next_cost = cost.0 + edge.weight().length_m;
            if next_cost < dist[next.index()] {
                dist[next.index()] = next_cost;
                prev[next.index()] = Some(node);
                heap.push(State {
                    cost: OrderedFloat(next_cost),
                    id: g[next].id,
                    node: next,
                });
            }
        }
    }

    let total = dist[goal.index()];
    if !total.is_finite() {
        return Ok(PathResult::unreachable());
    }

    let mut path = vec![g[goal].id];
    let mut current = goal;
    while let Some(p) = prev[current.index()] {
        path.push(g[p].id);
        current = p;
    }
    path.reverse();

    Ok(PathResult { cost: total, path })
}
