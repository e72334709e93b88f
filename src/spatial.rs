//! Snapping of arbitrary coordinates onto the road graph.

use ordered_float::OrderedFloat;

use crate::domain::{Coordinate, NodeId};
use crate::error::{Result, RoutingError};
use crate::graph::RoadGraph;

/// Finds the road node nearest to `point` by great-circle distance.
///
/// Linear scan over every node. Equidistant nodes resolve to the lowest
/// [`NodeId`], so the result does not depend on graph insertion order.
///
/// # Examples
///
/// ```
/// use puno_routes::domain::{Coordinate, NodeId};
/// use puno_routes::graph::RoadGraph;
/// use puno_routes::spatial::nearest_node;
///
/// let mut graph = RoadGraph::new();
/// graph.add_node(NodeId(10), Coordinate::new(0.0, 0.0));
/// graph.add_node(NodeId(20), Coordinate::new(0.0, 1.0));
///
/// let snapped = nearest_node(&graph, Coordinate::new(0.1, 0.8)).unwrap();
/// assert_eq!(snapped, NodeId(20));
/// ```
pub fn nearest_node(graph: &RoadGraph, point: Coordinate) -> Result<NodeId> {
    graph
        .nodes()
        .min_by_key(|node| (OrderedFloat(point.haversine_distance(&node.position)), node.id))
        .map(|node| node.id)
        .ok_or(RoutingError::EmptyGraph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_empty_graph() {
        let graph = RoadGraph::new();
        assert!(matches!(
            nearest_node(&graph, Coordinate::new(-15.84, -70.02)),
            Err(RoutingError::EmptyGraph)
        ));
    }

    #[test]
    fn test_exact_hit() {
        let mut graph = RoadGraph::new();
        graph.add_node(NodeId(1), Coordinate::new(-15.8406, -70.0279));
        graph.add_node(NodeId(2), Coordinate::new(-15.8244, -70.0161));
        assert_eq!(
            nearest_node(&graph, Coordinate::new(-15.8244, -70.0161)).unwrap(),
            NodeId(2)
        );
    }

    #[test]
    fn test_tie_breaks_on_lowest_id() {
        let mut graph = RoadGraph::new();
        // Inserted highest id first so insertion order cannot decide
        graph.add_node(NodeId(9), Coordinate::new(0.0, 0.001));
        graph.add_node(NodeId(3), Coordinate::new(0.0, -0.001));
        assert_eq!(
            nearest_node(&graph, Coordinate::new(0.0, 0.0)).unwrap(),
            NodeId(3)
        );
    }
}
