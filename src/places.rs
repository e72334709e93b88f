//! Built-in landmark registry for Puno, Peru.
//!
//! Covers the city center, the university, transport terminals, the lake
//! port and the hotels along Lake Titicaca. The default road-network disk is
//! centered between them and wide enough to contain all of them.

use crate::domain::Coordinate;
use crate::landmarks::LandmarkRegistry;

/// Default road-network center (Puno city center).
pub const DEFAULT_CENTER: Coordinate = Coordinate::new(-15.840221, -70.021881);

/// Default road-network radius in meters.
pub const DEFAULT_RADIUS_M: f64 = 4000.0;

/// Landmark data with name and coordinates.
struct PlaceData {
    name: &'static str,
    lat: f64,
    lng: f64,
}

const PUNO_PLACES: &[PlaceData] = &[
    PlaceData { name: "Plaza de Armas", lat: -15.840660, lng: -70.027979 },
    PlaceData { name: "Universidad Nacional del Altiplano", lat: -15.824488, lng: -70.016197 },
    PlaceData { name: "Parque Pino", lat: -15.837954, lng: -70.028065 },
    PlaceData { name: "Terminal Terrestre Puno", lat: -15.843733, lng: -70.017322 },
    PlaceData { name: "Terminal Zonal Sur Virgen de Fátima", lat: -15.840935, lng: -70.020578 },
    PlaceData { name: "Mercado Central", lat: -15.837475, lng: -70.026585 },
    PlaceData { name: "Estadio Enrique Torres Belón", lat: -15.836865, lng: -70.022104 },
    PlaceData { name: "Catedral de Puno", lat: -15.840837, lng: -70.028775 },
    PlaceData { name: "Museo Carlos Dreyer", lat: -15.840548, lng: -70.028945 },
    PlaceData { name: "Iglesia San Juan Bautista", lat: -15.837834, lng: -70.028405 },
    PlaceData { name: "Parque Mariategui", lat: -15.839410, lng: -70.024507 },
    PlaceData { name: "Parque Huajsapata", lat: -15.840968, lng: -70.023360 },
    PlaceData { name: "Centro Comercial Plaza Vea", lat: -15.836654, lng: -70.025571 },
    PlaceData { name: "Hotel Libertador Lago Titicaca", lat: -15.827975, lng: -69.99301 },
    PlaceData { name: "Puerto de Puno", lat: -15.835072, lng: -70.014308 },
    PlaceData { name: "Colegio Glorioso San Carlos", lat: -15.835377, lng: -70.023954 },
    PlaceData { name: "Colegio María Auxiliadora", lat: -15.838374, lng: -70.032358 },
    PlaceData { name: "Hotel Casa Andina Premium", lat: -15.823534, lng: -69.997105 },
    PlaceData { name: "Mirador Kuntur Wasi", lat: -15.847225, lng: -70.029925 },
];

/// Returns the Puno landmark registry.
///
/// # Examples
///
/// ```
/// use puno_routes::places::puno_landmarks;
///
/// let registry = puno_landmarks();
/// assert_eq!(registry.len(), 19);
/// assert!(registry.get("Plaza de Armas").is_some());
/// ```
pub fn puno_landmarks() -> LandmarkRegistry {
    let entries = PUNO_PLACES
        .iter()
        .map(|p| (p.name, Coordinate::new(p.lat, p.lng)));
    // Names in PUNO_PLACES are unique, checked by test_names_are_unique
    LandmarkRegistry::from_entries(entries).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::LandmarkCategory;

    #[test]
    fn test_names_are_unique() {
        let entries = PUNO_PLACES
            .iter()
            .map(|p| (p.name, Coordinate::new(p.lat, p.lng)));
        assert!(LandmarkRegistry::from_entries(entries).is_ok());
    }

    #[test]
    fn test_registry_order_matches_table() {
        let registry = puno_landmarks();
        let names: Vec<&str> = registry.iter().map(|l| l.name.as_str()).collect();
        let table: Vec<&str> = PUNO_PLACES.iter().map(|p| p.name).collect();
        assert_eq!(names, table);
        assert_eq!(names[0], "Plaza de Armas");
        assert_eq!(names[1], "Universidad Nacional del Altiplano");
    }

    #[test]
    fn test_all_places_inside_default_disk() {
        for landmark in puno_landmarks().iter() {
            let d = DEFAULT_CENTER.haversine_distance(&landmark.position);
            assert!(d < DEFAULT_RADIUS_M, "{} is {d:.0} m out", landmark.name);
        }
    }

    #[test]
    fn test_categories() {
        let registry = puno_landmarks();
        let category = |name: &str| registry.get(name).unwrap().category;
        assert_eq!(category("Puerto de Puno"), LandmarkCategory::Port);
        assert_eq!(category("Mirador Kuntur Wasi"), LandmarkCategory::Viewpoint);
        assert_eq!(category("Colegio María Auxiliadora"), LandmarkCategory::School);
        assert_eq!(category("Museo Carlos Dreyer"), LandmarkCategory::Museum);
        assert_eq!(category("Hotel Casa Andina Premium"), LandmarkCategory::Hotel);
    }
}
