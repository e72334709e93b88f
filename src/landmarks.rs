//! Named points of interest and detection of the ones a route passes.
//!
//! A [`LandmarkRegistry`] is an ordered, name-unique list loaded once at
//! startup. [`match_landmarks`] walks a route in travel order and reports
//! which landmarks come within a tolerance radius of it.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use utoipa::ToSchema;

use crate::domain::Coordinate;
use crate::error::{Result, RoutingError};

/// Default proximity radius for a landmark to count as passed, in meters.
pub const DEFAULT_TOLERANCE_M: f64 = 100.0;

/// Kind of place, derived from keywords in its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkCategory {
    Hospital,
    University,
    Plaza,
    Park,
    Terminal,
    Market,
    Stadium,
    Church,
    Cathedral,
    Hotel,
    Port,
    Viewpoint,
    School,
    Museum,
    Supermarket,
    Other,
}

/// Keyword checks in priority order; the first keyword found wins.
const CATEGORY_KEYWORDS: &[(&str, LandmarkCategory)] = &[
    ("hospital", LandmarkCategory::Hospital),
    ("universidad", LandmarkCategory::University),
    ("plaza", LandmarkCategory::Plaza),
    ("parque", LandmarkCategory::Park),
    ("terminal", LandmarkCategory::Terminal),
    ("mercado", LandmarkCategory::Market),
    ("estadio", LandmarkCategory::Stadium),
    ("iglesia", LandmarkCategory::Church),
    ("catedral", LandmarkCategory::Cathedral),
    ("hotel", LandmarkCategory::Hotel),
    ("puerto", LandmarkCategory::Port),
    ("mirador", LandmarkCategory::Viewpoint),
    ("colegio", LandmarkCategory::School),
    ("museo", LandmarkCategory::Museum),
    ("supermercado", LandmarkCategory::Supermarket),
    ("plaza vea", LandmarkCategory::Supermarket),
];

impl LandmarkCategory {
    /// Classifies a place by case-insensitive keyword.
    ///
    /// ```
    /// use puno_routes::landmarks::LandmarkCategory;
    ///
    /// assert_eq!(LandmarkCategory::classify("Mercado Central"), LandmarkCategory::Market);
    /// assert_eq!(LandmarkCategory::classify("Catedral de Puno"), LandmarkCategory::Cathedral);
    /// assert_eq!(LandmarkCategory::classify("Isla Esteves"), LandmarkCategory::Other);
    /// ```
    pub fn classify(name: &str) -> Self {
        let lower = name.to_lowercase();
        CATEGORY_KEYWORDS
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map(|&(_, category)| category)
            .unwrap_or(LandmarkCategory::Other)
    }

    /// Display symbol for map markers and stop lists.
    pub fn emoji(self) -> &'static str {
        match self {
            LandmarkCategory::Hospital => "🏥",
            LandmarkCategory::University => "🎓",
            LandmarkCategory::Plaza => "🏛️",
            LandmarkCategory::Park => "🌳",
            LandmarkCategory::Terminal => "🚌",
            LandmarkCategory::Market => "🏬",
            LandmarkCategory::Stadium => "🏟️",
            LandmarkCategory::Church | LandmarkCategory::Cathedral => "⛪",
            LandmarkCategory::Hotel => "🏨",
            LandmarkCategory::Port => "⛴️",
            LandmarkCategory::Viewpoint => "🔭",
            LandmarkCategory::School => "🏫",
            LandmarkCategory::Museum => "🏺",
            LandmarkCategory::Supermarket => "🛒",
            LandmarkCategory::Other => "📍",
        }
    }
}

/// A named point of interest.
#[derive(Debug, Clone, PartialEq)]
pub struct Landmark {
    pub name: String,
    pub position: Coordinate,
    pub category: LandmarkCategory,
}

impl Landmark {
    pub fn new(name: impl Into<String>, position: Coordinate) -> Self {
        let name = name.into();
        let category = LandmarkCategory::classify(&name);
        Self {
            name,
            position,
            category,
        }
    }
}

/// Ordered collection of landmarks with unique names.
///
/// Iteration order is the order the landmarks were supplied in, which is also
/// the order they are tested against each route point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkRegistry {
    entries: Vec<Landmark>,
}

impl LandmarkRegistry {
    /// Builds a registry from `(name, coordinate)` pairs.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Coordinate)>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut landmarks = Vec::new();
        for (name, position) in entries {
            let landmark = Landmark::new(name, position);
            if !seen.insert(landmark.name.clone()) {
                return Err(RoutingError::DuplicateLandmark(landmark.name));
            }
            landmarks.push(landmark);
        }
        Ok(Self { entries: landmarks })
    }

    /// Parses a JSON object of the form `{"Name": [lat, lon], ...}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON registry file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn get(&self, name: &str) -> Option<&Landmark> {
        self.entries.iter().find(|l| l.name == name)
    }

    /// Position of a named landmark, or `UnknownLandmark`.
    pub fn position(&self, name: &str) -> Result<Coordinate> {
        self.get(name)
            .map(|l| l.position)
            .ok_or_else(|| RoutingError::UnknownLandmark(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for LandmarkRegistry {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RegistryVisitor;

        impl<'de> Visitor<'de> for RegistryVisitor {
            type Value = LandmarkRegistry;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of landmark names to [latitude, longitude]")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                // Visiting entries one by one keeps file order and sees duplicates
                let mut entries: Vec<(String, Coordinate)> = Vec::new();
                while let Some((name, position)) = map.next_entry::<String, Coordinate>()? {
                    entries.push((name, position));
                }
                LandmarkRegistry::from_entries(entries).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_map(RegistryVisitor)
    }
}

/// Lists the landmarks a route passes within `tolerance_m`, in travel order.
///
/// Each landmark is reported once, at the first route point that comes
/// closer than the tolerance (geodesic distance). When anything was found,
/// `origin_name` is moved to the front and `destination_name` to the back,
/// inserting them if missing. A route that passes nothing yields an empty
/// list, never just the two endpoints.
///
/// # Examples
///
/// ```
/// use puno_routes::domain::Coordinate;
/// use puno_routes::landmarks::{match_landmarks, LandmarkRegistry, DEFAULT_TOLERANCE_M};
///
/// let registry = LandmarkRegistry::from_entries([
///     ("Market", Coordinate::new(0.0, 0.0005)),
///     ("Home", Coordinate::new(0.0, 0.0)),
///     ("Work", Coordinate::new(0.0, 0.01)),
/// ])
/// .unwrap();
/// let route = [Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.0004)];
///
/// let stops = match_landmarks(&route, &registry, "Home", "Work", DEFAULT_TOLERANCE_M);
/// assert_eq!(stops, vec!["Home", "Market", "Work"]);
/// ```
pub fn match_landmarks(
    route: &[Coordinate],
    registry: &LandmarkRegistry,
    origin_name: &str,
    destination_name: &str,
    tolerance_m: f64,
) -> Vec<String> {
    let mut matched = vec![false; registry.len()];
    let mut stops: Vec<String> = Vec::new();

    for point in route {
        for (i, landmark) in registry.iter().enumerate() {
            if !matched[i] && point.geodesic_distance(&landmark.position) < tolerance_m {
                matched[i] = true;
                stops.push(landmark.name.clone());
            }
        }
    }

    if stops.is_empty() {
        return stops;
    }

    if stops.first().map(String::as_str) != Some(origin_name) {
        stops.retain(|name| name != origin_name);
        stops.insert(0, origin_name.to_string());
    }
    if stops.last().map(String::as_str) != Some(destination_name) {
        stops.retain(|name| name != destination_name);
        stops.push(destination_name.to_string());
    }

    stops
}

#[cfg(test)]
mod tests {
    use super::*;

    // ~111 m per 0.001 degree of longitude at the equator
    fn registry() -> LandmarkRegistry {
        LandmarkRegistry::from_entries([
            ("Origin", Coordinate::new(0.0, 0.0)),
            ("Far", Coordinate::new(1.0, 1.0)),
            ("Mid", Coordinate::new(0.0, 0.005)),
            ("Destination", Coordinate::new(0.0, 0.01)),
        ])
        .unwrap()
    }

    fn straight_route() -> Vec<Coordinate> {
        (0..=10).map(|i| Coordinate::new(0.0, i as f64 * 0.001)).collect()
    }

    #[test]
    fn test_travel_order() {
        let stops = match_landmarks(&straight_route(), &registry(), "Origin", "Destination", 100.0);
        assert_eq!(stops, vec!["Origin", "Mid", "Destination"]);
    }

    #[test]
    fn test_reverse_route_forces_endpoints() {
        let mut route = straight_route();
        route.reverse();
        // Scan finds Destination, Mid, Origin; the ends are then swapped in
        let stops = match_landmarks(&route, &registry(), "Origin", "Destination", 100.0);
        assert_eq!(stops, vec!["Origin", "Mid", "Destination"]);
    }

    #[test]
    fn test_missing_endpoints_are_inserted() {
        let route = vec![Coordinate::new(0.0, 0.005)];
        let stops = match_landmarks(&route, &registry(), "Origin", "Destination", 100.0);
        assert_eq!(stops, vec!["Origin", "Mid", "Destination"]);
    }

    #[test]
    fn test_no_matches_is_empty() {
        let route = vec![Coordinate::new(5.0, 5.0), Coordinate::new(5.0, 5.001)];
        let stops = match_landmarks(&route, &registry(), "Origin", "Destination", 100.0);
        assert!(stops.is_empty());
    }

    #[test]
    fn test_empty_route_is_empty() {
        assert!(match_landmarks(&[], &registry(), "Origin", "Destination", 100.0).is_empty());
    }

    #[test]
    fn test_no_duplicates_when_route_revisits() {
        let mut route = straight_route();
        route.extend(straight_route().into_iter().rev());
        let stops = match_landmarks(&route, &registry(), "Origin", "Destination", 100.0);
        let unique: HashSet<&String> = stops.iter().collect();
        assert_eq!(unique.len(), stops.len());
        assert_eq!(stops.first().unwrap(), "Origin");
        assert_eq!(stops.last().unwrap(), "Destination");
    }

    #[test]
    fn test_tolerance_is_strict() {
        let registry =
            LandmarkRegistry::from_entries([("Edge", Coordinate::new(0.0, 0.001))]).unwrap();
        let route = vec![Coordinate::new(0.0, 0.0)];
        let d = route[0].geodesic_distance(&Coordinate::new(0.0, 0.001));
        assert!(match_landmarks(&route, &registry, "A", "B", d).is_empty());
        assert_eq!(
            match_landmarks(&route, &registry, "A", "B", d + 0.01),
            vec!["A", "Edge", "B"]
        );
    }

    #[test]
    fn test_single_point_near_both_endpoints() {
        let registry = LandmarkRegistry::from_entries([
            ("Destination", Coordinate::new(0.0, 0.0002)),
            ("Origin", Coordinate::new(0.0, -0.0002)),
        ])
        .unwrap();
        let route = vec![Coordinate::new(0.0, 0.0)];
        let stops = match_landmarks(&route, &registry, "Origin", "Destination", 100.0);
        assert_eq!(stops, vec!["Origin", "Destination"]);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = LandmarkRegistry::from_entries([
            ("A", Coordinate::new(0.0, 0.0)),
            ("A", Coordinate::new(1.0, 1.0)),
        ])
        .unwrap_err();
        assert!(matches!(err, RoutingError::DuplicateLandmark(name) if name == "A"));
    }

    #[test]
    fn test_json_preserves_file_order() {
        let registry =
            LandmarkRegistry::from_json(r#"{"Zeta": [1.0, 2.0], "Alpha": [3.0, 4.0]}"#).unwrap();
        let names: Vec<&str> = registry.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
        assert_eq!(registry.position("Alpha").unwrap(), Coordinate::new(3.0, 4.0));
    }

    #[test]
    fn test_json_duplicate_rejected() {
        assert!(LandmarkRegistry::from_json(r#"{"A": [1.0, 2.0], "A": [3.0, 4.0]}"#).is_err());
    }

    #[test]
    fn test_unknown_landmark() {
        assert!(matches!(
            registry().position("Nowhere"),
            Err(RoutingError::UnknownLandmark(_))
        ));
    }

    #[test]
    fn test_category_priority() {
        // "plaza" outranks the supermarket keywords
        assert_eq!(
            LandmarkCategory::classify("Centro Comercial Plaza Vea"),
            LandmarkCategory::Plaza
        );
        assert_eq!(
            LandmarkCategory::classify("Supermercado Central"),
            LandmarkCategory::Market
        );
        assert_eq!(
            LandmarkCategory::classify("Universidad Nacional del Altiplano").emoji(),
            "🎓"
        );
    }
}
