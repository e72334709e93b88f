//! Route geometry encoding for map clients.
//!
//! Implements the Google encoded polyline format (5 decimal places).
//! See: <https://developers.google.com/maps/documentation/utilities/polylinealgorithm>

use crate::domain::Coordinate;

const PRECISION: f64 = 1e5;

/// Encodes coordinates as a Google polyline string.
///
/// ```
/// use puno_routes::domain::Coordinate;
/// use puno_routes::geometry::encode_polyline;
///
/// let line = [
///     Coordinate::new(38.5, -120.2),
///     Coordinate::new(40.7, -120.95),
///     Coordinate::new(43.252, -126.453),
/// ];
/// assert_eq!(encode_polyline(&line), "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
/// assert!(encode_polyline(&[]).is_empty());
/// ```
pub fn encode_polyline(coords: &[Coordinate]) -> String {
    let mut out = String::with_capacity(coords.len() * 8);
    let mut last = (0i64, 0i64);

    for c in coords {
        let lat = (c.lat * PRECISION).round() as i64;
        let lon = (c.lon * PRECISION).round() as i64;
        push_signed(lat - last.0, &mut out);
        push_signed(lon - last.1, &mut out);
        last = (lat, lon);
    }

    out
}

// Zig-zag the sign into bit 0, then emit 5-bit groups, low first, with 0x20
// marking continuation. Every emitted byte is in 63..=126.
fn push_signed(delta: i64, out: &mut String) {
    let zigzag = if delta < 0 { !(delta << 1) } else { delta << 1 };
    let mut v = zigzag as u64;
    while v >= 0x20 {
        out.push(char::from((((v & 0x1f) | 0x20) + 63) as u8));
        v >>= 5;
    }
    out.push(char::from((v + 63) as u8));
}

/// Decodes a Google polyline string. Trailing incomplete pairs are ignored.
pub fn decode_polyline(encoded: &str) -> Vec<Coordinate> {
    let mut bytes = encoded.bytes();
    let mut coords = Vec::new();
    let (mut lat, mut lon) = (0i64, 0i64);

    while let Some(dlat) = next_signed(&mut bytes) {
        let Some(dlon) = next_signed(&mut bytes) else {
            break;
        };
        lat += dlat;
        lon += dlon;
        coords.push(Coordinate::new(lat as f64 / PRECISION, lon as f64 / PRECISION));
    }

    coords
}

fn next_signed(bytes: &mut impl Iterator<Item = u8>) -> Option<i64> {
    let mut v = 0u64;
    let mut shift = 0;
    loop {
        let chunk = u64::from(bytes.next()?.checked_sub(63)?);
        v |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 || shift > 60 {
            break;
        }
    }
    let v = v as i64;
    Some(if v & 1 != 0 { !(v >> 1) } else { v >> 1 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_reference_string() {
        let decoded = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@");
        let expected = [(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)];
        assert_eq!(decoded.len(), 3);
        for (c, (lat, lon)) in decoded.iter().zip(expected) {
            assert!((c.lat - lat).abs() < 1e-6);
            assert!((c.lon - lon).abs() < 1e-6);
        }
    }

    #[test]
    fn test_puno_route_survives_encoding() {
        let route = [
            Coordinate::new(-15.840660, -70.027979),
            Coordinate::new(-15.840837, -70.028775),
            Coordinate::new(-15.837954, -70.028065),
        ];
        let decoded = decode_polyline(&encode_polyline(&route));
        assert_eq!(decoded.len(), route.len());
        for (a, b) in route.iter().zip(&decoded) {
            assert!((a.lat - b.lat).abs() <= 0.5e-5);
            assert!((a.lon - b.lon).abs() <= 0.5e-5);
        }
    }

    #[test]
    fn test_single_origin_point() {
        assert_eq!(encode_polyline(&[Coordinate::new(0.0, 0.0)]), "??");
    }

    #[test]
    fn test_garbage_stops_decoding() {
        assert!(decode_polyline("\u{1}\u{2}").is_empty());
    }
}
