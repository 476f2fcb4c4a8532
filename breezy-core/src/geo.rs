//! Geospatial matching: nearest candidate by great-circle distance and
//! point-in-polygon tests for alert regions.

use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// Mean Earth radius (IUGG), in metres.
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Tolerance for "on the boundary", in degrees (about 1 cm).
const BOUNDARY_EPSILON: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// GeoJSON positions are `[longitude, latitude]`.
    fn from_position(position: &[f64]) -> Option<Self> {
        match position {
            [lon, lat, ..] => Some(Self::new(*lat, *lon)),
            _ => None,
        }
    }
}

/// Great-circle distance in metres.
pub fn haversine_distance(a: Coordinates, b: Coordinates) -> f64 {
    let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Candidate closest to `target`.
///
/// Ties keep the first candidate in iteration order, so callers that need a
/// stable answer must iterate in a stable order.
pub fn nearest<K, I>(target: Coordinates, candidates: I) -> Option<K>
where
    I: IntoIterator<Item = (K, Coordinates)>,
{
    let mut best: Option<(K, f64)> = None;
    for (key, coordinates) in candidates {
        let distance = haversine_distance(target, coordinates);
        if best.as_ref().is_none_or(|(_, d)| distance < *d) {
            best = Some((key, distance));
        }
    }
    best.map(|(key, _)| key)
}

/// Like [`nearest`], but only accepts candidates within `max_distance_m`.
pub fn nearest_within<K, I>(target: Coordinates, candidates: I, max_distance_m: f64) -> Option<K>
where
    I: IntoIterator<Item = (K, Coordinates)>,
{
    nearest(
        target,
        candidates
            .into_iter()
            .filter(|(_, c)| haversine_distance(target, *c) <= max_distance_m),
    )
}

/// A polygon with one exterior ring and optional holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub exterior: Vec<Coordinates>,
    pub holes: Vec<Vec<Coordinates>>,
}

impl Polygon {
    pub fn new(exterior: Vec<Coordinates>) -> Self {
        Self {
            exterior,
            holes: Vec::new(),
        }
    }

    /// Parses a CAP `<polygon>`: space-separated `lat,lon` pairs.
    pub fn from_cap_string(raw: &str) -> Result<Self, SourceError> {
        let exterior = raw
            .split_whitespace()
            .map(|pair| {
                let (lat, lon) = pair
                    .split_once(',')
                    .ok_or_else(|| SourceError::ParseError(format!("bad CAP point '{pair}'")))?;
                let lat: f64 = lat
                    .trim()
                    .parse()
                    .map_err(|_| SourceError::ParseError(format!("bad latitude in '{pair}'")))?;
                let lon: f64 = lon
                    .trim()
                    .parse()
                    .map_err(|_| SourceError::ParseError(format!("bad longitude in '{pair}'")))?;
                Ok(Coordinates::new(lat, lon))
            })
            .collect::<Result<Vec<_>, SourceError>>()?;

        if exterior.len() < 3 {
            return Err(SourceError::ParseError(
                "CAP polygon needs at least three points".to_string(),
            ));
        }
        Ok(Self::new(exterior))
    }

    /// Boundary-inclusive containment; points inside a hole are outside,
    /// points on a hole's edge are inside.
    pub fn contains(&self, point: Coordinates) -> bool {
        if !ring_contains(&self.exterior, point) {
            return false;
        }
        !self
            .holes
            .iter()
            .any(|hole| ring_contains(hole, point) && !on_ring_boundary(hole, point))
    }

    fn from_rings(rings: &[Vec<Vec<f64>>]) -> Result<Self, SourceError> {
        let mut rings = rings.iter().map(|ring| {
            ring.iter()
                .map(|p| {
                    Coordinates::from_position(p)
                        .ok_or_else(|| SourceError::ParseError("bad GeoJSON position".to_string()))
                })
                .collect::<Result<Vec<_>, _>>()
        });
        let exterior = rings
            .next()
            .ok_or_else(|| SourceError::ParseError("polygon without rings".to_string()))??;
        let holes = rings.collect::<Result<Vec<_>, _>>()?;
        Ok(Self { exterior, holes })
    }
}

/// Polygon or multi-polygon geometry, as found in GeoJSON.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum GeoJsonGeometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
}

impl Geometry {
    /// Parses a GeoJSON geometry, or a Feature wrapping one.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, SourceError> {
        let geometry = match value.get("type").and_then(|t| t.as_str()) {
            Some("Feature") => value
                .get("geometry")
                .ok_or_else(|| SourceError::ParseError("feature without geometry".to_string()))?,
            _ => value,
        };
        let parsed: GeoJsonGeometry = serde_json::from_value(geometry.clone())?;
        match parsed {
            GeoJsonGeometry::Polygon { coordinates } => {
                Ok(Self::Polygon(Polygon::from_rings(&coordinates)?))
            }
            GeoJsonGeometry::MultiPolygon { coordinates } => Ok(Self::MultiPolygon(
                coordinates
                    .iter()
                    .map(|rings| Polygon::from_rings(rings))
                    .collect::<Result<_, _>>()?,
            )),
        }
    }

    /// Parses GeoJSON that a provider serialised into a string field.
    pub fn from_json_str(raw: &str) -> Result<Self, SourceError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        Self::from_value(&value)
    }

    pub fn contains(&self, point: Coordinates) -> bool {
        match self {
            Self::Polygon(polygon) => polygon.contains(point),
            Self::MultiPolygon(polygons) => polygons.iter().any(|p| p.contains(point)),
        }
    }
}

/// Ids of the regions whose geometry contains `point`, in input order.
pub fn matching_regions<K, I>(point: Coordinates, regions: I) -> Vec<K>
where
    I: IntoIterator<Item = (K, Geometry)>,
{
    regions
        .into_iter()
        .filter(|(_, geometry)| geometry.contains(point))
        .map(|(key, _)| key)
        .collect()
}

/// Ray casting on a ring (closed or not), counting boundary points as inside.
fn ring_contains(ring: &[Coordinates], point: Coordinates) -> bool {
    if ring.len() < 3 {
        return false;
    }
    if on_ring_boundary(ring, point) {
        return true;
    }

    let (x, y) = (point.longitude, point.latitude);
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = (ring[i].longitude, ring[i].latitude);
        let (xj, yj) = (ring[j].longitude, ring[j].latitude);
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn on_ring_boundary(ring: &[Coordinates], point: Coordinates) -> bool {
    if ring.is_empty() {
        return false;
    }
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        if on_segment(ring[j], ring[i], point) {
            return true;
        }
        j = i;
    }
    false
}

fn on_segment(a: Coordinates, b: Coordinates, p: Coordinates) -> bool {
    let (ax, ay, bx, by) = (a.longitude, a.latitude, b.longitude, b.latitude);
    let (px, py) = (p.longitude, p.latitude);

    let cross = (bx - ax) * (py - ay) - (by - ay) * (px - ax);
    let length = ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt();
    if cross.abs() > BOUNDARY_EPSILON * length.max(1.0) {
        return false;
    }
    px >= ax.min(bx) - BOUNDARY_EPSILON
        && px <= ax.max(bx) + BOUNDARY_EPSILON
        && py >= ay.min(by) - BOUNDARY_EPSILON
        && py <= ay.max(by) + BOUNDARY_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::new(vec![
            Coordinates::new(0.0, 0.0),
            Coordinates::new(0.0, 10.0),
            Coordinates::new(10.0, 10.0),
            Coordinates::new(10.0, 0.0),
            Coordinates::new(0.0, 0.0),
        ])
    }

    #[test]
    fn haversine_known_distance() {
        // Reykjavík to Akureyri is roughly 250 km as the crow flies.
        let reykjavik = Coordinates::new(64.1466, -21.9426);
        let akureyri = Coordinates::new(65.6885, -18.1262);
        let km = haversine_distance(reykjavik, akureyri) / 1000.0;
        assert!((240.0..260.0).contains(&km), "{km}");
        assert_eq!(haversine_distance(reykjavik, reykjavik), 0.0);
    }

    #[test]
    fn nearest_picks_closest_and_keeps_first_on_tie() {
        let target = Coordinates::new(0.0, 0.0);
        let candidates = vec![
            ("east", Coordinates::new(0.0, 1.0)),
            ("west", Coordinates::new(0.0, -1.0)),
            ("far", Coordinates::new(5.0, 5.0)),
        ];
        assert_eq!(nearest(target, candidates.clone()), Some("east"));

        let reversed: Vec<_> = candidates.into_iter().rev().collect();
        assert_eq!(nearest(target, reversed), Some("west"));

        assert_eq!(nearest::<&str, _>(target, Vec::new()), None);
    }

    #[test]
    fn nearest_within_respects_radius() {
        let target = Coordinates::new(0.0, 0.0);
        let candidates = vec![("a", Coordinates::new(0.0, 1.0))];
        assert_eq!(nearest_within(target, candidates.clone(), 200_000.0), Some("a"));
        assert_eq!(nearest_within(target, candidates, 50_000.0), None);
    }

    #[test]
    fn point_in_polygon_inside_outside_boundary() {
        let polygon = square();
        assert!(polygon.contains(Coordinates::new(5.0, 5.0)));
        assert!(!polygon.contains(Coordinates::new(15.0, 5.0)));
        assert!(!polygon.contains(Coordinates::new(5.0, -0.5)));
        // Edge and vertex.
        assert!(polygon.contains(Coordinates::new(0.0, 5.0)));
        assert!(polygon.contains(Coordinates::new(10.0, 10.0)));
    }

    #[test]
    fn holes_are_excluded() {
        let mut polygon = square();
        polygon.holes.push(vec![
            Coordinates::new(4.0, 4.0),
            Coordinates::new(4.0, 6.0),
            Coordinates::new(6.0, 6.0),
            Coordinates::new(6.0, 4.0),
        ]);
        assert!(!polygon.contains(Coordinates::new(5.0, 5.0)));
        assert!(polygon.contains(Coordinates::new(4.0, 5.0)));
        assert!(polygon.contains(Coordinates::new(2.0, 2.0)));
    }

    #[test]
    fn parses_geojson_polygon_and_multipolygon_strings() {
        let polygon = r#"{"type":"Polygon","coordinates":[[[0,0],[10,0],[10,10],[0,10],[0,0]]]}"#;
        let geometry = Geometry::from_json_str(polygon).unwrap();
        assert!(geometry.contains(Coordinates::new(5.0, 5.0)));

        let multi = r#"{
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": [
                    [[[0,0],[1,0],[1,1],[0,1],[0,0]]],
                    [[[20,20],[21,20],[21,21],[20,21],[20,20]]]
                ]
            }
        }"#;
        let geometry = Geometry::from_json_str(multi).unwrap();
        assert!(geometry.contains(Coordinates::new(20.5, 20.5)));
        assert!(geometry.contains(Coordinates::new(0.5, 0.5)));
        assert!(!geometry.contains(Coordinates::new(10.0, 10.0)));

        assert!(Geometry::from_json_str(r#"{"type":"Point","coordinates":[1,2]}"#).is_err());
        assert!(Geometry::from_json_str("not json").is_err());
    }

    #[test]
    fn parses_cap_polygon() {
        let polygon = Polygon::from_cap_string("63.9,-22.8 64.4,-22.8 64.4,-21.0 63.9,-21.0 63.9,-22.8")
            .unwrap();
        assert!(polygon.contains(Coordinates::new(64.1466, -21.9426)));
        assert!(!polygon.contains(Coordinates::new(65.6885, -18.1262)));
        assert!(Polygon::from_cap_string("63.9,-22.8 64.4").is_err());
    }

    #[test]
    fn matching_regions_returns_all_containing() {
        let regions = vec![
            ("big", Geometry::Polygon(square())),
            (
                "small",
                Geometry::Polygon(Polygon::new(vec![
                    Coordinates::new(0.0, 0.0),
                    Coordinates::new(0.0, 2.0),
                    Coordinates::new(2.0, 2.0),
                    Coordinates::new(2.0, 0.0),
                ])),
            ),
        ];
        assert_eq!(matching_regions(Coordinates::new(1.0, 1.0), regions.clone()), ["big", "small"]);
        assert_eq!(matching_regions(Coordinates::new(5.0, 5.0), regions), ["big"]);
    }
}
