//! Error type for routing operations.

use thiserror::Error;

use crate::domain::NodeId;

/// Convenient result alias for routing operations.
pub type Result<T> = std::result::Result<T, RoutingError>;

/// Errors raised by the routing pipeline.
///
/// An unreachable destination is not an error: the search returns an
/// infinite cost and an empty path instead (see
/// [`PathResult::is_reachable`](crate::dijkstra::PathResult::is_reachable)).
#[derive(Debug, Error)]
pub enum RoutingError {
    /// The map-data provider was unreachable, failed, or returned no roads.
    #[error("failed to fetch road network: {0}")]
    Fetch(String),

    /// Snapping was attempted against a graph without nodes.
    #[error("road graph has no nodes")]
    EmptyGraph,

    /// A node id was not present in the graph.
    #[error("node {0} is not part of the road graph")]
    InvalidNode(NodeId),

    /// Two consecutive path nodes are not joined by any edge.
    #[error("no edge connects node {from} to node {to}")]
    MissingEdge { from: NodeId, to: NodeId },

    /// Edge lengths must be finite and non-negative.
    #[error("edge {from} -> {to} has invalid length {length}")]
    InvalidEdgeLength { from: NodeId, to: NodeId, length: f64 },

    /// Origin and destination are the same place.
    #[error("origin and destination must be different places")]
    SameEndpoints,

    /// A landmark name was not found in the registry.
    #[error("unknown landmark: {0}")]
    UnknownLandmark(String),

    /// A registry listed the same landmark name twice.
    #[error("duplicate landmark name: {0}")]
    DuplicateLandmark(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
