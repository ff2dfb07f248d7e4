use geo::{LineString, MultiPolygon, Polygon};
use serde_json::{json, Value};

/// Ring coordinates as `[[x, y], ...]`.
fn ring_to_json(ring: &LineString<f64>) -> Value {
    Value::Array(ring.coords().map(|c| json!([c.x, c.y])).collect())
}

/// Polygon coordinates as `[exterior, hole, hole, ...]`.
fn polygon_coords(polygon: &Polygon<f64>) -> Value {
    Value::Array(
        std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .map(ring_to_json)
            .collect()
    )
}

/// Convert a geo::Polygon to a GeoJSON geometry object.
pub fn polygon_to_geojson(polygon: &Polygon<f64>) -> Value {
    json!({
        "type": "Polygon",
        "coordinates": polygon_coords(polygon),
    })
}

/// Convert a geo::MultiPolygon to a GeoJSON geometry object.
pub fn multipolygon_to_geojson(mp: &MultiPolygon<f64>) -> Value {
    json!({
        "type": "MultiPolygon",
        "coordinates": mp.0.iter().map(polygon_coords).collect::<Vec<_>>(),
    })
}
