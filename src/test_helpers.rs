//! Shared fixtures for unit tests.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::domain::{Coordinate, NodeId};
use crate::error::{Result, RoutingError};
use crate::graph::RoadGraph;
use crate::store::MapDataProvider;

/// Provider serving a fixed graph and counting how often it was asked.
pub struct CountingProvider {
    graph: Option<RoadGraph>,
    error: Option<String>,
    delay: Duration,
    pub fetches: AtomicUsize,
}

impl CountingProvider {
    pub fn new(graph: RoadGraph) -> Self {
        Self {
            graph: Some(graph),
            error: None,
            delay: Duration::ZERO,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            graph: None,
            error: Some(message.to_string()),
            delay: Duration::ZERO,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl MapDataProvider for CountingProvider {
    fn fetch(&self, _center: Coordinate, _radius_m: f64) -> BoxFuture<'_, Result<RoadGraph>> {
        async move {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match (&self.graph, &self.error) {
                (Some(graph), _) => Ok(graph.clone()),
                (None, Some(message)) => Err(RoutingError::Fetch(message.clone())),
                (None, None) => Ok(RoadGraph::new()),
            }
        }
        .boxed()
    }
}

/// A(0,0)–B(0,1) 5 m, B–C(0,2) 5 m, A–C 20 m.
pub fn triangle_graph() -> RoadGraph {
    let mut g = RoadGraph::new();
    g.add_node(NodeId(1), Coordinate::new(0.0, 0.0));
    g.add_node(NodeId(2), Coordinate::new(0.0, 1.0));
    g.add_node(NodeId(3), Coordinate::new(0.0, 2.0));
    g.add_edge(NodeId(1), NodeId(2), 5.0).unwrap();
    g.add_edge(NodeId(2), NodeId(3), 5.0).unwrap();
    g.add_edge(NodeId(1), NodeId(3), 20.0).unwrap();
    g
}

/// A straight east-west street of `n` nodes spaced 0.001° (~111 m at the
/// equator), edge lengths measured by haversine.
pub fn street_graph(n: i64) -> RoadGraph {
    let mut g = RoadGraph::new();
    for i in 0..n {
        g.add_node(NodeId(i), Coordinate::new(0.0, i as f64 * 0.001));
    }
    for i in 1..n {
        let a = g.position(NodeId(i - 1)).unwrap();
        let b = g.position(NodeId(i)).unwrap();
        g.add_edge(NodeId(i - 1), NodeId(i), a.haversine_distance(&b))
            .unwrap();
    }
    g
}
