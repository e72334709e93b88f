//! In-memory road network.
//!
//! Nodes are keyed by [`NodeId`]; edges are undirected and carry a length in
//! meters. Parallel edges between the same pair of nodes are kept as-is and
//! resolved to their minimum length whenever a traversal needs one value.

use ordered_float::OrderedFloat;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

use crate::domain::{Coordinate, Node, NodeId};
use crate::error::{Result, RoutingError};

/// Edge data in the road graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadEdge {
    /// Segment length in meters.
    pub length_m: f64,
}

/// Road network graph.
///
/// Built once, then shared read-only (usually behind an `Arc`).
///
/// # Examples
///
/// ```
/// use puno_routes::domain::{Coordinate, NodeId};
/// use puno_routes::graph::RoadGraph;
///
/// let mut graph = RoadGraph::new();
/// graph.add_node(NodeId(1), Coordinate::new(0.0, 0.0));
/// graph.add_node(NodeId(2), Coordinate::new(0.0, 0.001));
/// graph.add_edge(NodeId(1), NodeId(2), 111.0).unwrap();
/// graph.add_edge(NodeId(2), NodeId(1), 150.0).unwrap();
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2);
/// assert_eq!(graph.min_edge_length(NodeId(1), NodeId(2)), Some(111.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoadGraph {
    graph: UnGraph<Node, RoadEdge>,
    index: HashMap<NodeId, NodeIndex>,
}

impl RoadGraph {
    /// Creates an empty road graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node, or returns the existing index if the id is already known.
    ///
    /// The first position recorded for an id wins.
    pub fn add_node(&mut self, id: NodeId, position: Coordinate) -> NodeIndex {
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(Node { id, position });
        self.index.insert(id, idx);
        idx
    }

    /// Adds an undirected edge between two existing nodes.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, length_m: f64) -> Result<()> {
        if !length_m.is_finite() || length_m < 0.0 {
            return Err(RoutingError::InvalidEdgeLength {
                from,
                to,
                length: length_m,
            });
        }
        let a = self.index_of(from)?;
        let b = self.index_of(to)?;
        self.graph.add_edge(a, b, RoadEdge { length_m });
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Looks up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).and_then(|&idx| self.graph.node_weight(idx))
    }

    /// Position of a node, or `InvalidNode`.
    pub fn position(&self, id: NodeId) -> Result<Coordinate> {
        self.node(id)
            .map(|n| n.position)
            .ok_or(RoutingError::InvalidNode(id))
    }

    /// Iterates over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// Iterates over all edges as `(from, to, length_m)`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, f64)> + '_ {
        self.graph.edge_references().map(|e| {
            (
                self.graph[e.source()].id,
                self.graph[e.target()].id,
                e.weight().length_m,
            )
        })
    }

    /// Neighbors of a node with the connecting edge length, one entry per
    /// incident edge (parallel edges appear once each).
    pub fn neighbors(&self, id: NodeId) -> Result<Vec<(NodeId, f64)>> {
        let idx = self.index_of(id)?;
        Ok(self
            .graph
            .edges(idx)
            .map(|e| (self.graph[e.target()].id, e.weight().length_m))
            .collect())
    }

    /// Shortest of the edges joining `a` and `b`, if any.
    pub fn min_edge_length(&self, a: NodeId, b: NodeId) -> Option<f64> {
        let (ia, ib) = (*self.index.get(&a)?, *self.index.get(&b)?);
        self.graph
            .edges_connecting(ia, ib)
            .map(|e| OrderedFloat(e.weight().length_m))
            .min()
            .map(|d| d.0)
    }

    /// Keeps only the nodes accepted by `keep`, dropping their edges too.
    pub fn retain_nodes<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Node) -> bool,
    {
        let before = self.graph.node_count();
        self.graph.retain_nodes(|g, idx| keep(&g[idx]));
        if self.graph.node_count() != before {
            self.reindex();
        }
    }

    /// Removes nodes without any incident edge.
    pub fn remove_isolated_nodes(&mut self) {
        let isolated: HashSet<NodeId> = self
            .graph
            .node_indices()
            .filter(|&idx| self.graph.edges(idx).next().is_none())
            .map(|idx| self.graph[idx].id)
            .collect();
        if !isolated.is_empty() {
            self.retain_nodes(|n| !isolated.contains(&n.id));
        }
    }

    pub(crate) fn index_of(&self, id: NodeId) -> Result<NodeIndex> {
        self.index
            .get(&id)
            .copied()
            .ok_or(RoutingError::InvalidNode(id))
    }

    pub(crate) fn inner(&self) -> &UnGraph<Node, RoadEdge> {
        &self.graph
    }

    // Node removal invalidates indices, so the id map is rebuilt.
    fn reindex(&mut self) {
        self.index = self
            .graph
            .node_indices()
            .map(|idx| (self.graph[idx].id, idx))
            .collect();
    }
}
