//! Time-bounded cache of road graphs, keyed by center and radius.
//!
//! Each key owns a slot guarded by an async `RwLock`:
//! 1. Fresh entry: shared read lock, returned immediately
//! 2. Missing or expired: exclusive lock, re-check, then a single fetch
//!
//! Concurrent requests for the same uncached key queue on the exclusive lock
//! and pick up the graph fetched by the first one. Different keys never block
//! each other.

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use crate::domain::Coordinate;
use crate::error::{Result, RoutingError};
use crate::graph::RoadGraph;

/// Default time-to-live for cached graphs: 24 hours.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 3600);

/// Source of raw road networks.
///
/// Implementations fetch the drivable roads within `radius_m` meters of
/// `center`. They must not retry internally; the store surfaces failures as
/// they are.
pub trait MapDataProvider: Send + Sync {
    fn fetch(&self, center: Coordinate, radius_m: f64) -> BoxFuture<'_, Result<RoadGraph>>;
}

/// Cache key: center rounded to 1e-7 degrees, radius to centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphKey {
    lat_e7: i64,
    lon_e7: i64,
    radius_cm: i64,
}

impl GraphKey {
    pub fn new(center: Coordinate, radius_m: f64) -> Self {
        Self {
            lat_e7: (center.lat * 1e7).round() as i64,
            lon_e7: (center.lon * 1e7).round() as i64,
            radius_cm: (radius_m * 100.0).round() as i64,
        }
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.lat_e7 as f64 / 1e7, self.lon_e7 as f64 / 1e7)
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_cm as f64 / 100.0
    }
}

struct CacheEntry {
    graph: Arc<RoadGraph>,
    loaded_at: Instant,
    fetched_at: DateTime<Utc>,
}

type Slot = Arc<RwLock<Option<CacheEntry>>>;

/// Summary of one cached graph.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CachedGraphInfo {
    /// Center as `[latitude, longitude]`.
    #[schema(value_type = Vec<f64>)]
    pub center: Coordinate,
    pub radius_meters: f64,
    pub node_count: usize,
    pub edge_count: usize,
    /// Wall-clock time of the fetch.
    pub fetched_at: DateTime<Utc>,
    /// Whether the entry is still within its TTL.
    pub fresh: bool,
}

/// Fetch-or-cache access to road graphs.
pub struct GraphStore {
    provider: Arc<dyn MapDataProvider>,
    ttl: Duration,
    slots: Mutex<HashMap<GraphKey, Slot>>,
}

impl GraphStore {
    pub fn new(provider: Arc<dyn MapDataProvider>, ttl: Duration) -> Self {
        Self {
            provider,
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn slot(&self, key: GraphKey) -> Slot {
        let mut slots = self.slots.lock();
        // Only the map holds these, so nobody is about to lock them
        slots.retain(|_, slot| Arc::strong_count(slot) > 1 || !self.is_stale(slot));
        Arc::clone(slots.entry(key).or_default())
    }

    /// Empty or expired, and not locked by a fetch.
    fn is_stale(&self, slot: &Slot) -> bool {
        match slot.try_read() {
            Ok(entry) => self.fresh_graph(&entry).is_none(),
            Err(_) => false,
        }
    }

    /// Drops the slot of a failed fetch unless other requests are queued on it.
    fn release_failed(&self, key: GraphKey, slot: &Slot) {
        let mut slots = self.slots.lock();
        // The map plus the caller
        let unshared = Arc::strong_count(slot) <= 2;
        if unshared && slots.get(&key).is_some_and(|s| Arc::ptr_eq(s, slot)) {
            slots.remove(&key);
        }
    }

    fn fresh_graph(&self, entry: &Option<CacheEntry>) -> Option<Arc<RoadGraph>> {
        entry
            .as_ref()
            .filter(|e| e.loaded_at.elapsed() < self.ttl)
            .map(|e| Arc::clone(&e.graph))
    }

    /// Returns the graph for a disk of `radius_m` meters around `center`.
    ///
    /// Serves from cache while the entry is younger than the TTL; otherwise
    /// fetches once from the provider. A provider failure, or an empty
    /// network, is returned as [`RoutingError::Fetch`] and leaves nothing
    /// cached.
    pub async fn get_graph(&self, center: Coordinate, radius_m: f64) -> Result<Arc<RoadGraph>> {
        let key = GraphKey::new(center, radius_m);
        let slot = self.slot(key);

        // 1. Fast path, shared lock
        {
            let entry = slot.read().await;
            if let Some(graph) = self.fresh_graph(&entry) {
                debug!("Using cached road graph for {} r={}m", center, radius_m);
                return Ok(graph);
            }
        }

        // 2. Exclusive lock and double-check (another request may have fetched it)
        let mut entry = slot.write().await;
        if let Some(graph) = self.fresh_graph(&entry) {
            debug!("Using cached road graph for {} r={}m", center, radius_m);
            return Ok(graph);
        }
        if entry.is_some() {
            info!("Cached road graph for {} expired, refetching", center);
        }

        // 3. Fetch
        info!("Fetching road graph for {} r={}m", center, radius_m);
        let graph = match self.provider.fetch(center, radius_m).await {
            Ok(graph) => graph,
            Err(e) => {
                warn!("Road graph fetch failed for {}: {}", center, e);
                *entry = None;
                self.release_failed(key, &slot);
                return Err(e);
            }
        };
        if graph.is_empty() {
            *entry = None;
            self.release_failed(key, &slot);
            return Err(RoutingError::Fetch(format!(
                "provider returned an empty road network around {}",
                center
            )));
        }

        info!(
            "Cached road graph with {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        let graph = Arc::new(graph);
        *entry = Some(CacheEntry {
            graph: Arc::clone(&graph),
            loaded_at: Instant::now(),
            fetched_at: Utc::now(),
        });
        Ok(graph)
    }

    /// Lists cached graphs. Slots locked by an in-flight fetch are skipped.
    pub fn entries(&self) -> Vec<CachedGraphInfo> {
        let slots: Vec<(GraphKey, Slot)> = self
            .slots
            .lock()
            .iter()
            .map(|(k, s)| (*k, Arc::clone(s)))
            .collect();

        let mut infos: Vec<CachedGraphInfo> = slots
            .into_iter()
            .filter_map(|(key, slot)| {
                let entry = slot.try_read().ok()?;
                let e = entry.as_ref()?;
                Some(CachedGraphInfo {
                    center: key.center(),
                    radius_meters: key.radius_m(),
                    node_count: e.graph.node_count(),
                    edge_count: e.graph.edge_count(),
                    fetched_at: e.fetched_at,
                    fresh: e.loaded_at.elapsed() < self.ttl,
                })
            })
            .collect();
        infos.sort_by(|a, b| a.fetched_at.cmp(&b.fetched_at));
        infos
    }
}
