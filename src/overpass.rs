//! OpenStreetMap road networks via the Overpass API.
//!
//! Downloads the drivable ways around a center point, then builds a
//! [`RoadGraph`] with one edge per consecutive node pair of each way.

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, error, info};

use crate::config::RouterConfig;
use crate::domain::{Coordinate, NodeId};
use crate::error::{Result, RoutingError};
use crate::graph::RoadGraph;
use crate::store::MapDataProvider;

/// Highway classes considered drivable.
const DRIVABLE_HIGHWAYS: &str = "motorway|motorway_link|trunk|trunk_link|primary|primary_link|\
secondary|secondary_link|tertiary|tertiary_link|residential|unclassified|service|living_street";

/// Map-data provider backed by an Overpass interpreter.
pub struct OverpassProvider {
    client: reqwest::Client,
    url: String,
}

impl OverpassProvider {
    /// Creates a provider with the endpoint and timeouts from `config`.
    pub fn new(config: &RouterConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(concat!("puno-routes/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RoutingError::Fetch(e.to_string()))?;
        Ok(Self {
            client,
            url: config.overpass_url.clone(),
        })
    }

    async fn download(&self, center: Coordinate, radius_m: f64) -> Result<RoadGraph> {
        let query = build_query(center, radius_m);
        debug!("Overpass query:\n{}", query);

        info!("Sending request to Overpass API at {}", self.url);
        let response = self
            .client
            .post(&self.url)
            .body(query)
            .header("Content-Type", "text/plain")
            .send()
            .await
            .map_err(|e| {
                error!("Overpass request failed: {}", e);
                RoutingError::Fetch(e.to_string())
            })?;

        let status = response.status();
        info!("Received response: status={}", status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RoutingError::Fetch(format!(
                "Overpass API returned status {}: {}",
                status,
                body.trim()
            )));
        }

        let osm: OverpassResponse = response
            .json()
            .await
            .map_err(|e| RoutingError::Fetch(format!("invalid Overpass response: {}", e)))?;
        info!("Downloaded {} OSM elements", osm.elements.len());

        build_graph(&osm, center, radius_m)
    }
}

impl MapDataProvider for OverpassProvider {
    fn fetch(&self, center: Coordinate, radius_m: f64) -> BoxFuture<'_, Result<RoadGraph>> {
        self.download(center, radius_m).boxed()
    }
}

/// Overpass QL selecting drivable ways within `radius_m` of `center`, plus
/// their nodes.
fn build_query(center: Coordinate, radius_m: f64) -> String {
    format!(
        r#"[out:json][timeout:120];
(
  way["highway"~"^({})$"]["area"!~"yes"]["access"!~"private|no"]
    (around:{:.1},{:.7},{:.7});
);
(._;>;);
out body;"#,
        DRIVABLE_HIGHWAYS, radius_m, center.lat, center.lon
    )
}

/// Builds a road graph from Overpass elements.
///
/// Way segments whose nodes were not returned are skipped. Nodes outside the
/// disk are dropped along with their edges, and so are nodes left without
/// any edge. An empty result is a fetch error.
fn build_graph(osm: &OverpassResponse, center: Coordinate, radius_m: f64) -> Result<RoadGraph> {
    let positions: HashMap<i64, Coordinate> = osm
        .elements
        .iter()
        .filter(|e| e.elem_type == "node")
        .filter_map(|e| Some((e.id, Coordinate::new(e.lat?, e.lon?))))
        .collect();
    info!("Parsed {} nodes", positions.len());

    let mut graph = RoadGraph::new();
    let mut way_count = 0;
    for way in osm.elements.iter().filter(|e| e.elem_type == "way") {
        let Some(node_ids) = way.nodes.as_deref() else {
            continue;
        };
        for pair in node_ids.windows(2) {
            let (Some(&a), Some(&b)) = (positions.get(&pair[0]), positions.get(&pair[1])) else {
                continue;
            };
            let (ia, ib) = (NodeId(pair[0]), NodeId(pair[1]));
            graph.add_node(ia, a);
            graph.add_node(ib, b);
            graph.add_edge(ia, ib, a.haversine_distance(&b))?;
        }
        way_count += 1;
    }

    graph.retain_nodes(|n| center.haversine_distance(&n.position) <= radius_m);
    graph.remove_isolated_nodes();

    info!(
        "Built graph with {} nodes and {} edges from {} ways",
        graph.node_count(),
        graph.edge_count(),
        way_count
    );

    if graph.is_empty() {
        return Err(RoutingError::Fetch(format!(
            "no drivable roads within {} m of {}",
            radius_m, center
        )));
    }
    Ok(graph)
}

// ============================================================================
// OSM Data Structures (Overpass API)
// ============================================================================

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    elements: Vec<OsmElement>,
}

#[derive(Debug, Deserialize)]
struct OsmElement {
    #[serde(rename = "type")]
    elem_type: String,
    id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
    nodes: Option<Vec<i64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: Coordinate = Coordinate::new(0.0, 0.0);

    fn parse(json: &str) -> OverpassResponse {
        serde_json::from_str(json).unwrap()
    }

    const SAMPLE: &str = r#"{
        "elements": [
            {"type": "node", "id": 1, "lat": 0.0, "lon": 0.0},
            {"type": "node", "id": 2, "lat": 0.0, "lon": 0.001},
            {"type": "node", "id": 3, "lat": 0.0, "lon": 0.002},
            {"type": "node", "id": 4, "lat": 0.001, "lon": 0.001},
            {"type": "node", "id": 9, "lat": 0.5, "lon": 0.5},
            {"type": "way", "id": 100, "nodes": [1, 2, 3], "tags": {"highway": "residential"}},
            {"type": "way", "id": 101, "nodes": [2, 4, 77], "tags": {"highway": "service"}},
            {"type": "way", "id": 102, "nodes": [3, 9], "tags": {"highway": "primary"}},
            {"type": "way", "id": 103, "nodes": [1, 2], "tags": {"highway": "tertiary"}}
        ]
    }"#;

    #[test]
    fn test_query_uses_around_filter() {
        let q = build_query(Coordinate::new(-15.840221, -70.021881), 4000.0);
        assert!(q.contains("(around:4000.0,-15.8402210,-70.0218810)"));
        assert!(q.contains("living_street"));
        assert!(q.contains("out body;"));
    }

    #[test]
    fn test_build_graph_from_elements() {
        let graph = build_graph(&parse(SAMPLE), CENTER, 1000.0).unwrap();

        // Node 9 is ~78 km away and dropped with its edge; node 77 was never returned
        assert_eq!(graph.node_count(), 4);
        assert!(!graph.contains(NodeId(9)));
        assert!(!graph.contains(NodeId(77)));
        // 1-2, 2-3, 2-4 and the parallel 1-2 from way 103
        assert_eq!(graph.edge_count(), 4);

        let len = graph.min_edge_length(NodeId(1), NodeId(2)).unwrap();
        assert!((len - 111.19).abs() < 0.5, "length was {len}");
    }

    #[test]
    fn test_empty_response_is_fetch_error() {
        let osm = parse(r#"{"elements": []}"#);
        assert!(matches!(
            build_graph(&osm, CENTER, 1000.0),
            Err(RoutingError::Fetch(_))
        ));
    }

    #[test]
    fn test_everything_outside_disk_is_fetch_error() {
        assert!(matches!(
            build_graph(&parse(SAMPLE), Coordinate::new(10.0, 10.0), 500.0),
            Err(RoutingError::Fetch(_))
        ));
    }
}
