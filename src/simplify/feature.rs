use std::fmt;

use serde_json::Value;

use crate::collection::FeatureCollection;
use crate::geom::{multipolygon_to_geojson, polygon_to_geojson, Geometry};
use crate::simplify::{simplify_multipolygon, simplify_polygon, PointCount, SimplifyError};

/// Point counts for one simplified feature, keyed by its position in the
/// input collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureReport {
    pub index: usize,
    pub counts: PointCount,
}

impl fmt::Display for FeatureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Feature {}: Points before {}, points after {}",
            self.index, self.counts.before, self.counts.after)
    }
}

/// Simplify every Polygon and MultiPolygon feature in place.
///
/// Features with null or non-polygonal geometry are left untouched and get
/// no report; empty polygons are reported with zero points. A geometry is only rewritten if simplification changed it.
pub fn simplify_collection(fc: &mut FeatureCollection, tolerance: f64) -> Result<Vec<FeatureReport>, SimplifyError> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(SimplifyError::InvalidTolerance(tolerance));
    }

    let mut reports = Vec::new();
    for (index, feature) in fc.features.iter_mut().enumerate() {
        let Some(value) = feature.geometry.as_ref() else { continue };
        // Only polygonal geometry is parsed; everything else is passed through as read.
        if !matches!(value.get("type").and_then(Value::as_str), Some("Polygon" | "MultiPolygon")) { continue }

        let geometry = Geometry::from_geojson(value)
            .map_err(|source| SimplifyError::Geometry { index, source })?;

        let (replacement, counts) = match geometry {
            Geometry::Polygon(polygon) => {
                let (simplified, counts) = simplify_polygon(&polygon, tolerance);
                ((simplified != polygon).then(|| polygon_to_geojson(&simplified)), counts)
            }
            Geometry::MultiPolygon(mp) => {
                let (simplified, counts) = simplify_multipolygon(&mp, tolerance);
                ((simplified != mp).then(|| multipolygon_to_geojson(&simplified)), counts)
            }
            Geometry::Empty(_) => (None, PointCount::default()),
            Geometry::Point(_) | Geometry::LineString(_) | Geometry::Other(_) => continue,
        };

        if let Some(replacement) = replacement { feature.geometry = Some(replacement) }
        reports.push(FeatureReport { index, counts });
    }

    Ok(reports)
}
