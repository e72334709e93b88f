//! The routing pipeline.
//!
//! fetch-or-cache graph → snap both endpoints → Dijkstra → assemble →
//! match landmarks. Each step consumes the previous step's output, so a
//! single request runs them in order; independent requests share the
//! [`GraphStore`] and run concurrently.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::assemble::assemble;
use crate::config::RouterConfig;
use crate::dijkstra::shortest_path;
use crate::domain::{Coordinate, NodeId};
use crate::error::{Result, RoutingError};
use crate::landmarks::{match_landmarks, LandmarkRegistry};
use crate::spatial::nearest_node;
use crate::store::{GraphStore, MapDataProvider};

/// Largest accepted gap between search cost and assembled distance, meters.
const COST_TOLERANCE_M: f64 = 1e-6;

/// A computed route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    /// Node ids from origin to destination; empty when unreachable.
    pub path: Vec<NodeId>,
    /// Node positions in travel order.
    pub coordinates: Vec<Coordinate>,
    /// Length recomputed from edge data, meters. 0 when unreachable.
    pub distance_m: f64,
    /// Cost reported by the search, meters. Infinite when unreachable.
    pub search_cost_m: f64,
}

impl Route {
    pub fn is_reachable(&self) -> bool {
        self.search_cost_m.is_finite()
    }

    /// Whether the search cost and the recomputed distance agree.
    pub fn is_consistent(&self) -> bool {
        !self.is_reachable() || (self.distance_m - self.search_cost_m).abs() <= COST_TOLERANCE_M
    }
}

/// A route between two named landmarks with the stops it passes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    pub origin: String,
    pub destination: String,
    pub route: Route,
    pub stops: Vec<String>,
}

/// Entry point for route computation.
pub struct RoutePlanner {
    store: GraphStore,
    landmarks: Arc<LandmarkRegistry>,
    config: RouterConfig,
}

impl RoutePlanner {
    pub fn new(
        provider: Arc<dyn MapDataProvider>,
        landmarks: LandmarkRegistry,
        config: RouterConfig,
    ) -> Self {
        Self {
            store: GraphStore::new(provider, config.cache_ttl),
            landmarks: Arc::new(landmarks),
            config,
        }
    }

    pub fn landmarks(&self) -> &LandmarkRegistry {
        &self.landmarks
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// Computes the shortest drivable route between two coordinates inside
    /// the disk around `center`.
    ///
    /// Identical coordinates are rejected with
    /// [`RoutingError::SameEndpoints`] before any graph is loaded. An
    /// unreachable destination is returned as a route with infinite search
    /// cost rather than an error.
    pub async fn compute_route(
        &self,
        center: Coordinate,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Route> {
        if origin == destination {
            return Err(RoutingError::SameEndpoints);
        }

        let graph = self.store.get_graph(center, self.config.radius_m).await?;

        let source = nearest_node(&graph, origin)?;
        let target = nearest_node(&graph, destination)?;
        debug!("Snapped {} -> {}, {} -> {}", origin, source, destination, target);

        let search = shortest_path(&graph, source, target)?;
        if !search.is_reachable() {
            info!("No route between nodes {} and {}", source, target);
            return Ok(Route {
                path: Vec::new(),
                coordinates: Vec::new(),
                distance_m: 0.0,
                search_cost_m: f64::INFINITY,
            });
        }

        let assembled = assemble(&graph, &search.path)?;
        let route = Route {
            path: search.path,
            coordinates: assembled.coordinates,
            distance_m: assembled.distance_m,
            search_cost_m: search.cost,
        };
        if !route.is_consistent() {
            warn!(
                "Route distance {:.3} m differs from search cost {:.3} m",
                route.distance_m, route.search_cost_m
            );
        }
        info!(
            "Route over {} nodes, {:.1} m",
            route.path.len(),
            route.distance_m
        );
        Ok(route)
    }

    /// Stop list for `route` at the configured tolerance.
    pub fn annotate_stops(
        &self,
        route: &Route,
        landmarks: &LandmarkRegistry,
        origin_name: &str,
        destination_name: &str,
    ) -> Vec<String> {
        match_landmarks(
            &route.coordinates,
            landmarks,
            origin_name,
            destination_name,
            self.config.tolerance_m,
        )
    }

    /// Checks a landmark pair and returns both positions.
    ///
    /// Identical names fail with [`RoutingError::SameEndpoints`] and unknown
    /// ones with [`RoutingError::UnknownLandmark`]. No graph is loaded.
    pub fn resolve_trip(
        &self,
        origin_name: &str,
        destination_name: &str,
    ) -> Result<(Coordinate, Coordinate)> {
        if origin_name == destination_name {
            return Err(RoutingError::SameEndpoints);
        }
        let origin = self.landmarks.position(origin_name)?;
        let destination = self.landmarks.position(destination_name)?;
        Ok((origin, destination))
    }

    /// Routes between two landmarks of the registry, around the configured
    /// center, and lists the landmarks passed on the way.
    pub async fn plan_trip(&self, origin_name: &str, destination_name: &str) -> Result<Trip> {
        let (origin, destination) = self.resolve_trip(origin_name, destination_name)?;

        let route = self
            .compute_route(self.config.center, origin, destination)
            .await?;
        let stops = self.annotate_stops(&route, &self.landmarks, origin_name, destination_name);

        Ok(Trip {
            origin: origin_name.to_string(),
            destination: destination_name.to_string(),
            route,
            stops,
        })
    }
}
