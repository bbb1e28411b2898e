//! GeoJSON geometry decoding and extents

use flood_types::{GeoBounds, LatLng};
use serde::{Deserialize, Serialize};

/// One GeoJSON position. Input order is `[longitude, latitude, altitude?]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Position(pub LatLng);

impl TryFrom<Vec<f64>> for Position {
    type Error = String;

    fn try_from(raw: Vec<f64>) -> Result<Self, Self::Error> {
        if raw.len() < 2 {
            return Err(format!("position needs at least 2 numbers, got {}", raw.len()));
        }
        let (lng, lat) = (raw[0], raw[1]);
        if !lng.is_finite() || !lat.is_finite() {
            return Err("position coordinates must be finite".to_string());
        }
        Ok(Position(LatLng::new(lat, lng)))
    }
}

impl From<Position> for Vec<f64> {
    fn from(p: Position) -> Self {
        vec![p.0.lng, p.0.lat]
    }
}

/// Decoded GeoJSON geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

impl Geometry {
    pub fn from_value(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Geometry::deserialize(value)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point { .. } => "Point",
            Geometry::MultiPoint { .. } => "MultiPoint",
            Geometry::LineString { .. } => "LineString",
            Geometry::MultiLineString { .. } => "MultiLineString",
            Geometry::Polygon { .. } => "Polygon",
            Geometry::MultiPolygon { .. } => "MultiPolygon",
            Geometry::GeometryCollection { .. } => "GeometryCollection",
        }
    }

    /// Extent of every position, or `None` for an empty geometry.
    pub fn bounds(&self) -> Option<GeoBounds> {
        let mut acc: Option<GeoBounds> = None;
        self.for_each_position(&mut |p| match acc.as_mut() {
            Some(b) => b.extend(p.0),
            None => acc = Some(GeoBounds::from_point(p.0)),
        });
        acc
    }

    fn for_each_position(&self, f: &mut impl FnMut(&Position)) {
        match self {
            Geometry::Point { coordinates } => f(coordinates),
            Geometry::MultiPoint { coordinates } | Geometry::LineString { coordinates } => {
                coordinates.iter().for_each(f)
            }
            Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
                coordinates.iter().flatten().for_each(f)
            }
            Geometry::MultiPolygon { coordinates } => {
                coordinates.iter().flatten().flatten().for_each(f)
            }
            Geometry::GeometryCollection { geometries } => {
                for g in geometries {
                    g.for_each_position(f);
                }
            }
        }
    }
}
