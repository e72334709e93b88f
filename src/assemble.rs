//! Conversion of node paths into drawable, measurable routes.

use serde::Serialize;

use crate::domain::{Coordinate, NodeId};
use crate::error::{Result, RoutingError};
use crate::graph::RoadGraph;

/// Coordinates and length of a node path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssembledRoute {
    /// Node positions in travel order.
    pub coordinates: Vec<Coordinate>,
    /// Sum of edge lengths in meters.
    pub distance_m: f64,
}

/// Builds the coordinate sequence for `path` and measures it from edge data.
///
/// The distance comes from edge data, taking the shortest edge for each
/// consecutive pair.
///
/// # Examples
///
/// ```
/// use puno_routes::assemble::assemble;
/// use puno_routes::domain::{Coordinate, NodeId};
/// use puno_routes::graph::RoadGraph;
///
/// let mut graph = RoadGraph::new();
/// graph.add_node(NodeId(1), Coordinate::new(0.0, 0.0));
/// graph.add_node(NodeId(2), Coordinate::new(0.0, 1.0));
/// graph.add_edge(NodeId(1), NodeId(2), 30.0).unwrap();
/// graph.add_edge(NodeId(1), NodeId(2), 12.0).unwrap();
///
/// let route = assemble(&graph, &[NodeId(1), NodeId(2)]).unwrap();
/// assert_eq!(route.distance_m, 12.0);
/// assert_eq!(route.coordinates.len(), 2);
/// ```
pub fn assemble(graph: &RoadGraph, path: &[NodeId]) -> Result<AssembledRoute> {
    let coordinates = path
        .iter()
        .map(|&id| graph.position(id))
        .collect::<Result<Vec<_>>>()?;

    let mut distance_m = 0.0;
    for pair in path.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        distance_m += graph
            .min_edge_length(from, to)
            .ok_or(RoutingError::MissingEdge { from, to })?;
    }

    Ok(AssembledRoute {
        coordinates,
        distance_m,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> RoadGraph {
        let mut g = RoadGraph::new();
        g.add_node(NodeId(1), Coordinate::new(0.0, 0.0));
        g.add_node(NodeId(2), Coordinate::new(0.0, 1.0));
        g.add_node(NodeId(3), Coordinate::new(0.0, 2.0));
        g.add_edge(NodeId(1), NodeId(2), 5.0).unwrap();
        g.add_edge(NodeId(2), NodeId(3), 5.0).unwrap();
        g.add_edge(NodeId(1), NodeId(3), 20.0).unwrap();
        g
    }

    #[test]
    fn test_empty_path() {
        let route = assemble(&triangle(), &[]).unwrap();
        assert!(route.coordinates.is_empty());
        assert_eq!(route.distance_m, 0.0);
    }

    #[test]
    fn test_single_node_path() {
        let route = assemble(&triangle(), &[NodeId(2)]).unwrap();
        assert_eq!(route.coordinates, vec![Coordinate::new(0.0, 1.0)]);
        assert_eq!(route.distance_m, 0.0);
    }

    #[test]
    fn test_sums_consecutive_edges_in_order() {
        let route = assemble(&triangle(), &[NodeId(1), NodeId(2), NodeId(3)]).unwrap();
        assert_eq!(route.distance_m, 10.0);
        assert_eq!(
            route.coordinates,
            vec![
                Coordinate::new(0.0, 0.0),
                Coordinate::new(0.0, 1.0),
                Coordinate::new(0.0, 2.0)
            ]
        );
    }

    #[test]
    fn test_parallel_edge_minimum() {
        let mut g = triangle();
        g.add_edge(NodeId(3), NodeId(2), 1.5).unwrap();
        let route = assemble(&g, &[NodeId(1), NodeId(2), NodeId(3)]).unwrap();
        assert_eq!(route.distance_m, 6.5);
    }

    #[test]
    fn test_unknown_node() {
        assert!(matches!(
            assemble(&triangle(), &[NodeId(1), NodeId(8)]),
            Err(RoutingError::InvalidNode(NodeId(8)))
        ));
    }

    #[test]
    fn test_missing_edge() {
        let mut g = triangle();
        g.add_node(NodeId(4), Coordinate::new(1.0, 1.0));
        assert!(matches!(
            assemble(&g, &[NodeId(1), NodeId(4)]),
            Err(RoutingError::MissingEdge { .. })
        ));
    }
}
