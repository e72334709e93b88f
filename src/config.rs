//! Runtime configuration for the routing service.

use std::time::Duration;

use crate::domain::Coordinate;
use crate::landmarks::DEFAULT_TOLERANCE_M;
use crate::places::{DEFAULT_CENTER, DEFAULT_RADIUS_M};
use crate::store::DEFAULT_CACHE_TTL;

/// Overpass API URL.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Routing configuration.
///
/// # Examples
///
/// ```
/// use puno_routes::config::RouterConfig;
///
/// let config = RouterConfig::default();
/// assert_eq!(config.radius_m, 4000.0);
/// assert_eq!(config.tolerance_m, 100.0);
/// assert_eq!(config.cache_ttl.as_secs(), 24 * 3600);
/// ```
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Center of the road-network disk.
    pub center: Coordinate,
    /// Radius of the road-network disk in meters.
    pub radius_m: f64,
    /// How long a fetched graph stays valid.
    pub cache_ttl: Duration,
    /// Landmark proximity radius in meters.
    pub tolerance_m: f64,
    /// Overpass interpreter endpoint.
    pub overpass_url: String,
    /// TCP connect timeout for the map-data provider.
    pub connect_timeout: Duration,
    /// Whole-request timeout for the map-data provider.
    pub request_timeout: Duration,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            radius_m: DEFAULT_RADIUS_M,
            cache_ttl: DEFAULT_CACHE_TTL,
            tolerance_m: DEFAULT_TOLERANCE_M,
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(180),
        }
    }
}
