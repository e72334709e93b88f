//! Core value types shared by every stage of the pipeline.
//!
//! - [`Coordinate`]: WGS84 latitude/longitude pair
//! - [`NodeId`]: opaque, totally ordered road-graph node identifier
//! - [`Node`]: a graph node with its position

use geo::{Distance, Geodesic, Haversine, Point};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// A geographic position in degrees (WGS84).
///
/// Serialized as a `[latitude, longitude]` array, matching the
/// `location` convention used by the API.
///
/// # Examples
///
/// ```
/// use puno_routes::domain::Coordinate;
///
/// let plaza = Coordinate::new(-15.840660, -70.027979);
/// let cathedral = Coordinate::new(-15.840837, -70.028775);
///
/// // The cathedral faces the plaza, well under 100 m away
/// let d = plaza.geodesic_distance(&cathedral);
/// assert!(d > 50.0 && d < 100.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90).
    pub lat: f64,
    /// Longitude in degrees (-180 to 180).
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    fn point(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }

    /// Great-circle distance in meters on a spherical Earth.
    pub fn haversine_distance(&self, other: &Coordinate) -> f64 {
        Haversine.distance(self.point(), other.point())
    }

    /// Ellipsoidal (Karney) distance in meters.
    pub fn geodesic_distance(&self, other: &Coordinate) -> f64 {
        Geodesic.distance(self.point(), other.point())
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self::new(lat, lon)
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lat, c.lon]
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Identifier of a road-graph node. For Overpass-built graphs this is the
/// OpenStreetMap node id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for NodeId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A road-graph node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub position: Coordinate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_and_geodesic_agree_roughly() {
        // Universidad Nacional del Altiplano to Terminal Terrestre
        let una = Coordinate::new(-15.824488, -70.016197);
        let terminal = Coordinate::new(-15.843733, -70.017322);
        let h = una.haversine_distance(&terminal);
        let g = una.geodesic_distance(&terminal);
        assert!((h - 2143.0).abs() < 30.0, "haversine was {h}");
        assert!((h - g).abs() / g < 0.01);
    }

    #[test]
    fn test_zero_distance() {
        let c = Coordinate::new(-15.84, -70.02);
        assert!(c.geodesic_distance(&c).abs() < 1e-9);
    }

    #[test]
    fn test_coordinate_serializes_as_lat_lon_array() {
        let c = Coordinate::new(-15.5, -70.25);
        assert_eq!(serde_json::to_string(&c).unwrap(), "[-15.5,-70.25]");
        let back: Coordinate = serde_json::from_str("[-15.5,-70.25]").unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_node_ids_order_numerically() {
        assert!(NodeId(2) < NodeId(10));
        assert_eq!(NodeId(42).to_string(), "42");
    }
}
