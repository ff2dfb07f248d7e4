use geo::{Coord, LineString, MultiPolygon, Polygon};
use shapefile as shp;

/// Shapefile point types that carry planar x/y coordinates.
pub(crate) trait ShpCoord {
    fn coord(&self) -> Coord<f64>;
}

impl ShpCoord for shp::Point {
    #[inline] fn coord(&self) -> Coord<f64> { Coord { x: self.x, y: self.y } }
}

impl ShpCoord for shp::PointM {
    #[inline] fn coord(&self) -> Coord<f64> { Coord { x: self.x, y: self.y } }
}

impl ShpCoord for shp::PointZ {
    #[inline] fn coord(&self) -> Coord<f64> { Coord { x: self.x, y: self.y } }
}

/// Convert shapefile polygon rings to geo::MultiPolygon<f64>
pub(crate) fn shp_to_geo<P: ShpCoord>(rings: &[shp::PolygonRing<P>]) -> MultiPolygon<f64> {
    /// Ensure first and last are the same for geo::LineString coords
    fn ensure_closed(coords: &mut Vec<Coord<f64>>) {
        if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
            if first != last { coords.push(first) }
        }
    }

    // Group each exterior with the holes that follow it (Shapefile ring order).
    let mut polys: Vec<Polygon<f64>> = Vec::new();
    let mut current_exterior: Option<LineString<f64>> = None;
    let mut current_holes: Vec<LineString<f64>> = Vec::new();

    for ring in rings {
        let mut coords = ring.points().iter().map(ShpCoord::coord).collect::<Vec<_>>();
        ensure_closed(&mut coords);
        let ls = LineString(coords);

        match ring {
            shp::PolygonRing::Outer(_) => {
                // flush previous polygon
                if let Some(ext) = current_exterior.take() {
                    polys.push(Polygon::new(ext, std::mem::take(&mut current_holes)));
                }
                current_exterior = Some(ls);
            }
            shp::PolygonRing::Inner(_) => current_holes.push(ls),
        }
    }
    if let Some(ext) = current_exterior {
        polys.push(Polygon::new(ext, current_holes));
    }

    MultiPolygon(polys)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(pts: &[(f64, f64)]) -> Vec<shp::Point> {
        pts.iter().map(|&(x, y)| shp::Point::new(x, y)).collect()
    }

    #[test]
    fn groups_holes_with_preceding_exterior() {
        let rings = vec![
            shp::PolygonRing::Outer(ring(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0), (0.0, 0.0)])),
            shp::PolygonRing::Inner(ring(&[(2.0, 2.0), (4.0, 2.0), (4.0, 4.0), (2.0, 2.0)])),
            shp::PolygonRing::Outer(ring(&[(20.0, 20.0), (20.0, 30.0), (30.0, 30.0)])),
        ];

        let mp = shp_to_geo(&rings);
        assert_eq!(mp.0.len(), 2);
        assert_eq!(mp.0[0].interiors().len(), 1);
        assert!(mp.0[1].interiors().is_empty());
        // Open ring gets closed.
        assert_eq!(mp.0[1].exterior().0.len(), 4);
    }
}
