use std::ops::AddAssign;

use geo::{Contains, LineString, MultiPolygon, Polygon};

use crate::simplify::simplify_rings;

/// Exterior-ring coordinate counts before and after simplification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointCount {
    pub before: usize,
    pub after: usize,
}

impl AddAssign for PointCount {
    fn add_assign(&mut self, rhs: Self) {
        self.before += rhs.before;
        self.after += rhs.after;
    }
}

/// Rings of a polygon, exterior first.
fn rings(polygon: &Polygon<f64>) -> impl Iterator<Item = &LineString<f64>> {
    std::iter::once(polygon.exterior()).chain(polygon.interiors())
}

/// Rebuild polygons from simplified rings laid out as [`rings`] yields them,
/// keeping the original of any polygon whose holes no longer sit inside its
/// shell.
fn rebuild(originals: &[Polygon<f64>], simplified: Vec<LineString<f64>>) -> (Vec<Polygon<f64>>, PointCount) {
    let mut total = PointCount::default();
    let mut simplified = simplified.into_iter();

    let polygons = originals.iter()
        .map(|original| {
            let exterior = simplified.next().unwrap_or_else(|| original.exterior().clone());
            let interiors = original.interiors().iter()
                .map(|hole| simplified.next().unwrap_or_else(|| hole.clone()))
                .collect::<Vec<_>>();

            let before = original.exterior().0.len();
            let shell = Polygon::new(exterior.clone(), vec![]);
            if interiors.iter().all(|hole| shell.contains(hole)) {
                total += PointCount { before, after: exterior.0.len() };
                Polygon::new(exterior, interiors)
            } else {
                total += PointCount { before, after: before };
                original.clone()
            }
        })
        .collect();

    (polygons, total)
}

/// Simplify a polygon's exterior and holes together with the same tolerance.
/// Only the exterior ring is counted.
pub fn simplify_polygon(polygon: &Polygon<f64>, tolerance: f64) -> (Polygon<f64>, PointCount) {
    let simplified = simplify_rings(&rings(polygon).collect::<Vec<_>>(), tolerance);
    let (mut polygons, counts) = rebuild(std::slice::from_ref(polygon), simplified);
    (polygons.pop().unwrap_or_else(|| polygon.clone()), counts)
}

/// Simplify every ring of every polygon as one unit, so parts never cross
/// each other; counts are summed over all exteriors.
pub fn simplify_multipolygon(mp: &MultiPolygon<f64>, tolerance: f64) -> (MultiPolygon<f64>, PointCount) {
    let simplified = simplify_rings(&mp.0.iter().flat_map(rings).collect::<Vec<_>>(), tolerance);
    let (polygons, counts) = rebuild(&mp.0, simplified);
    (MultiPolygon(polygons), counts)
}
