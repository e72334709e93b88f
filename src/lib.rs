//! Shortest drivable routes between places in Puno, Peru.
//!
//! Loads the OpenStreetMap drive network around a center point, snaps
//! origin and destination to their nearest road nodes, runs Dijkstra over
//! edge lengths and reports the landmarks the route passes.
//!
//! # Pipeline
//!
//! - [`GraphStore`](store::GraphStore): fetch-or-cache road graphs with a TTL
//! - [`nearest_node`](spatial::nearest_node): snap a coordinate to the graph
//! - [`shortest_path`](dijkstra::shortest_path): minimum total length search
//! - [`assemble`](assemble::assemble): path to coordinates and distance
//! - [`match_landmarks`](landmarks::match_landmarks): stops along the route
//!
//! [`RoutePlanner`] ties the stages together; [`api`] exposes it over HTTP.

pub mod api;
pub mod assemble;
pub mod config;
pub mod console;
pub mod dijkstra;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod landmarks;
pub mod overpass;
pub mod places;
pub mod planner;
pub mod spatial;
pub mod store;

#[cfg(test)]
mod test_helpers;

pub use error::{Result, RoutingError};
pub use planner::{Route, RoutePlanner, Trip};
