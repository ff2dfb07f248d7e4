use geo::{Coord, LineString, MultiPolygon, Point, Polygon};
use serde_json::Value;

use crate::geom::GeomError;

/// The geometry kinds the pipelines know how to handle.
///
/// Everything else lands in `Other`, which the simplifier passes through and
/// the partitioner never matches. A known type with an empty `coordinates`
/// array is `Empty`: it has no points and intersects nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point<f64>),
    LineString(LineString<f64>),
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
    Empty(String),
    Other(String),
}

/// Geometry types parsed into `geo` values.
const KNOWN_TYPES: [&str; 4] = ["Point", "LineString", "Polygon", "MultiPolygon"];

impl Geometry {
    /// Parse a GeoJSON geometry object.
    pub fn from_geojson(value: &Value) -> Result<Self, GeomError> {
        let kind = value.get("type").and_then(Value::as_str)
            .ok_or(GeomError::MissingType)?;

        let coords = || value.get("coordinates")
            .ok_or_else(|| GeomError::InvalidCoordinates(format!("{kind} has no coordinates")));

        if KNOWN_TYPES.contains(&kind) && coords()?.as_array().is_some_and(Vec::is_empty) {
            return Ok(Geometry::Empty(kind.to_string()));
        }

        Ok(match kind {
            "Point" => Geometry::Point(Point::from(parse_coord(coords()?)?)),
            "LineString" => Geometry::LineString(LineString(parse_coords(coords()?)?)),
            "Polygon" => Geometry::Polygon(parse_polygon(coords()?)?),
            "MultiPolygon" => Geometry::MultiPolygon(MultiPolygon(
                as_array(coords()?, "MultiPolygon")?.iter()
                    .map(parse_polygon)
                    .collect::<Result<Vec<_>, _>>()?
            )),
            other => Geometry::Other(other.to_string()),
        })
    }

    /// The GeoJSON type name of this geometry.
    pub fn kind(&self) -> &str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
            Geometry::Empty(kind) | Geometry::Other(kind) => kind,
        }
    }

    /// Whether this is a Polygon or MultiPolygon, empty or not.
    #[inline]
    pub fn is_polygonal(&self) -> bool {
        matches!(self.kind(), "Polygon" | "MultiPolygon")
    }

    /// Widen a polygonal geometry to a MultiPolygon.
    pub fn into_multipolygon(self) -> Option<MultiPolygon<f64>> {
        match self {
            Geometry::Polygon(polygon) => Some(MultiPolygon(vec![polygon])),
            Geometry::MultiPolygon(mp) => Some(mp),
            Geometry::Empty(kind) if matches!(kind.as_str(), "Polygon" | "MultiPolygon") => Some(MultiPolygon(vec![])),
            Geometry::Point(_) | Geometry::LineString(_) | Geometry::Empty(_) | Geometry::Other(_) => None,
        }
    }
}

fn as_array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>, GeomError> {
    value.as_array()
        .ok_or_else(|| GeomError::InvalidCoordinates(format!("{what} coordinates must be an array")))
}

/// Parse a `[x, y, ...]` position; any extra ordinates are ignored.
fn parse_coord(value: &Value) -> Result<Coord<f64>, GeomError> {
    let position = as_array(value, "position")?;
    let ordinate = |i: usize| position.get(i).and_then(Value::as_f64)
        .ok_or_else(|| GeomError::InvalidCoordinates(format!("invalid position {value}")));
    Ok(Coord { x: ordinate(0)?, y: ordinate(1)? })
}

fn parse_coords(value: &Value) -> Result<Vec<Coord<f64>>, GeomError> {
    as_array(value, "LineString")?.iter().map(parse_coord).collect()
}

/// Parse a ring, closing it if the last position differs from the first.
fn parse_ring(value: &Value) -> Result<LineString<f64>, GeomError> {
    let mut points = parse_coords(value)?;
    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if first != last { points.push(first) }
    }
    Ok(LineString(points))
}

fn parse_polygon(value: &Value) -> Result<Polygon<f64>, GeomError> {
    let rings = as_array(value, "Polygon")?;
    let (exterior, interiors) = rings.split_first()
        .ok_or_else(|| GeomError::InvalidCoordinates("Polygon has no exterior ring".to_string()))?;

    Ok(Polygon::new(
        parse_ring(exterior)?,
        interiors.iter().map(parse_ring).collect::<Result<Vec<_>, _>>()?,
    ))
}

#[cfg(test)]
mod tests {
    use geo::CoordsIter;
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_polygon_with_hole() {
        let geom = Geometry::from_geojson(&json!({
            "type": "Polygon",
            "coordinates": [
                [[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]],
                [[2, 2], [4, 2], [4, 4], [2, 2]]
            ]
        })).unwrap();

        let Geometry::Polygon(polygon) = geom else { panic!("expected polygon") };
        assert_eq!(polygon.exterior().coords_count(), 5);
        assert_eq!(polygon.interiors().len(), 1);
        assert_eq!(polygon.interiors()[0].coords_count(), 4);
    }

    #[test]
    fn closes_open_rings() {
        let geom = Geometry::from_geojson(&json!({
            "type": "Polygon",
            "coordinates": [[[0, 0], [1, 0], [1, 1]]]
        })).unwrap();

        let Geometry::Polygon(polygon) = geom else { panic!("expected polygon") };
        assert_eq!(polygon.exterior().0.len(), 4);
        assert_eq!(polygon.exterior().0.first(), polygon.exterior().0.last());
    }

    #[test]
    fn multipolygon_widens() {
        let geom = Geometry::from_geojson(&json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[0, 0], [1, 0], [1, 1], [0, 0]]],
                [[[5, 5], [6, 5], [6, 6], [5, 5]]]
            ]
        })).unwrap();

        assert!(geom.is_polygonal());
        assert_eq!(geom.into_multipolygon().unwrap().0.len(), 2);
    }

    #[test]
    fn point_keeps_xy_only() {
        let geom = Geometry::from_geojson(&json!({"type": "Point", "coordinates": [-122.5, 38.25, 12.0]})).unwrap();
        assert_eq!(geom, Geometry::Point(Point::new(-122.5, 38.25)));
        assert!(!geom.is_polygonal());
    }

    #[test]
    fn unknown_types_are_other() {
        let geom = Geometry::from_geojson(&json!({
            "type": "GeometryCollection",
            "geometries": []
        })).unwrap();
        assert_eq!(geom, Geometry::Other("GeometryCollection".to_string()));
        assert_eq!(geom.kind(), "GeometryCollection");
        assert!(geom.into_multipolygon().is_none());
    }

    #[test]
    fn empty_coordinates_are_empty() {
        let point = Geometry::from_geojson(&json!({"type": "Point", "coordinates": []})).unwrap();
        assert_eq!(point, Geometry::Empty("Point".to_string()));
        assert_eq!(point.kind(), "Point");
        assert!(point.into_multipolygon().is_none());

        let polygon = Geometry::from_geojson(&json!({"type": "Polygon", "coordinates": []})).unwrap();
        assert!(polygon.is_polygonal());
        assert_eq!(polygon.into_multipolygon(), Some(MultiPolygon(vec![])));
    }

    #[test]
    fn rejects_bad_coordinates() {
        assert!(matches!(
            Geometry::from_geojson(&json!({"type": "Polygon", "coordinates": [[["a", 0]]]})),
            Err(GeomError::InvalidCoordinates(_))
        ));
        assert!(matches!(
            Geometry::from_geojson(&json!({"coordinates": [0, 0]})),
            Err(GeomError::MissingType)
        ));
    }
}
