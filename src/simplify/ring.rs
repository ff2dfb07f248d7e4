use geo::line_intersection::{line_intersection, LineIntersection};
use geo::{BoundingRect, Contains, Coord, Distance, Euclidean, Line, LineString, Point, Polygon, Rect};
use rstar::RTree;

use crate::geom::{envelope, BoundingBox};

/// Smallest coordinate count of a closed ring (a triangle plus its closing point).
pub const MIN_RING_SIZE: usize = 4;

/// Simplify a single closed ring with Douglas-Peucker, keeping it a valid ring.
///
/// Same as [`simplify_rings`] with one ring.
pub fn simplify_ring(ring: &LineString<f64>, tolerance: f64) -> LineString<f64> {
    simplify_rings(&[ring], tolerance).pop().unwrap_or_else(|| ring.clone())
}

/// Simplify a set of closed rings that belong to one geometry (the shell and
/// holes of a polygon, or every ring of a multipolygon) as a unit.
///
/// A section of a ring is collapsed to a single segment only when
/// - every dropped vertex lies within `tolerance` of that segment,
/// - the ring can still end up with at least [`MIN_RING_SIZE`] coordinates,
/// - the new segment crosses no segment of any ring, original or already
///   simplified,
/// - no other ring lies in the area between the dropped vertices and the new
///   segment (it would end up on the other side).
///
/// A ring that still comes out non-simple is returned unchanged. Zero,
/// negative and non-finite tolerances return every ring as-is.
pub fn simplify_rings(rings: &[&LineString<f64>], tolerance: f64) -> Vec<LineString<f64>> {
    if !tolerance.is_finite() || tolerance <= 0.0 {
        return rings.iter().map(|ring| (*ring).clone()).collect();
    }

    let mut simplifier = RingSimplifier::new(rings, tolerance);
    (0..rings.len())
        .map(|r| {
            let coords = simplifier.simplify(r);
            if coords.len() < MIN_RING_SIZE || !is_simple_ring(&coords) {
                rings[r].clone()
            } else {
                LineString(coords)
            }
        })
        .collect()
}

/// Whether two ring segments cross in a way that would break the rings.
/// Segments meeting at a common vertex are fine; overlapping ones are not.
fn conflicts(a: &Line<f64>, b: &Line<f64>) -> bool {
    match line_intersection(*a, *b) {
        None => false,
        Some(LineIntersection::Collinear { .. }) => true,
        Some(LineIntersection::SinglePoint { .. }) => {
            !(a.start == b.start || a.start == b.end || a.end == b.start || a.end == b.end)
        }
    }
}

/// Recursive Douglas-Peucker over a group of rings, tracking which input
/// segments are still live and which output segments have been emitted.
struct RingSimplifier<'a> {
    rings: &'a [&'a LineString<f64>],
    offsets: Vec<usize>, // Global index of each ring's first segment
    tolerance: f64,
    inputs: RTree<BoundingBox>,
    retired: Vec<bool>,
    outputs: RTree<BoundingBox>,
    emitted: Vec<Line<f64>>,
    ring_start: usize, // First emitted segment of the ring in progress
}

impl<'a> RingSimplifier<'a> {
    fn new(rings: &'a [&'a LineString<f64>], tolerance: f64) -> Self {
        let mut offsets = Vec::with_capacity(rings.len());
        let mut segments = Vec::new();
        for ring in rings {
            offsets.push(segments.len());
            segments.extend(ring.lines());
        }

        Self {
            rings,
            offsets,
            tolerance,
            inputs: RTree::bulk_load(
                segments.iter().enumerate()
                    .map(|(s, line)| BoundingBox::segment(s, *line))
                    .collect()
            ),
            retired: vec![false; segments.len()],
            outputs: RTree::new(),
            emitted: Vec::with_capacity(segments.len()),
            ring_start: 0,
        }
    }

    /// Simplify ring `r`, returning its new coordinates. Rings too small to
    /// lose a vertex are left live in the input index and returned as-is.
    fn simplify(&mut self, r: usize) -> Vec<Coord<f64>> {
        let rings = self.rings;
        let coords = &rings[r].0;
        if coords.len() <= MIN_RING_SIZE { return coords.clone() }

        self.ring_start = self.emitted.len();
        self.simplify_section(r, 0, coords.len() - 1, 0);

        let result = &self.emitted[self.ring_start..];
        let mut out = Vec::with_capacity(result.len() + 1);
        if let Some(first) = result.first() { out.push(first.start) }
        out.extend(result.iter().map(|line| line.end));
        out
    }

    /// Number of coordinates the ring in progress currently holds.
    #[inline]
    fn result_size(&self) -> usize {
        match self.emitted.len() - self.ring_start {
            0 => 0,
            n => n + 1,
        }
    }

    fn emit(&mut self, r: usize, i: usize, j: usize) {
        let rings = self.rings;
        let line = Line::new(rings[r].0[i], rings[r].0[j]);
        let base = self.offsets[r];
        self.retired[base + i..base + j].fill(true);
        self.outputs.insert(BoundingBox::segment(self.emitted.len(), line));
        self.emitted.push(line);
    }

    fn simplify_section(&mut self, r: usize, i: usize, j: usize, depth: usize) {
        let depth = depth + 1;
        if i + 1 == j { return self.emit(r, i, j) }

        // Collapsing this section must still leave room for a valid ring.
        let mut collapsible = self.result_size() >= MIN_RING_SIZE || depth + 1 >= MIN_RING_SIZE;

        let rings = self.rings;
        let coords = &rings[r].0;
        let line = Line::new(coords[i], coords[j]);
        let (furthest, distance) = (i + 1..j)
            .map(|k| (k, Euclidean.distance(&Point::from(coords[k]), &line)))
            .fold((i + 1, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });

        if distance > self.tolerance { collapsible = false }
        if collapsible && self.crosses_rings(r, i, j) { collapsible = false }
        if collapsible && self.encloses_other_ring(r, i, j) { collapsible = false }

        if collapsible {
            self.emit(r, i, j);
        } else {
            self.simplify_section(r, i, furthest, depth);
            self.simplify_section(r, furthest, j, depth);
        }
    }

    /// Whether the segment `i`-`j` of ring `r` would cross a live input
    /// segment outside the section or an already emitted output segment.
    fn crosses_rings(&self, r: usize, i: usize, j: usize) -> bool {
        let coords = &self.rings[r].0;
        let candidate = Line::new(coords[i], coords[j]);
        let env = envelope(&candidate.bounding_rect());
        let (lo, hi) = (self.offsets[r] + i, self.offsets[r] + j);

        let hits_input = self.inputs.locate_in_envelope_intersecting(&env)
            .map(BoundingBox::idx)
            .filter(|&s| (s < lo || s >= hi) && !self.retired[s])
            .any(|s| conflicts(&candidate, &self.segment(s)));

        hits_input || self.outputs.locate_in_envelope_intersecting(&env)
            .any(|bb| conflicts(&candidate, &self.emitted[bb.idx()]))
    }

    /// Whether another ring sits inside the area swept out by replacing the
    /// section `i..=j` of ring `r` with a single segment. Rings never cross
    /// that area's boundary, so testing one kept vertex per ring is enough.
    fn encloses_other_ring(&self, r: usize, i: usize, j: usize) -> bool {
        let section = LineString(self.rings[r].0[i..=j].to_vec());
        let Some(bounds) = section.bounding_rect() else { return false };
        let area = Polygon::new(section, vec![]);

        self.rings.iter().enumerate()
            .filter(|&(other, _)| other != r)
            .filter_map(|(_, ring)| ring.0.first())
            .any(|&c| contains_coord(&bounds, c) && area.contains(&c))
    }

    /// Input segment by global index.
    fn segment(&self, s: usize) -> Line<f64> {
        let r = self.offsets.partition_point(|&offset| offset <= s) - 1;
        let k = s - self.offsets[r];
        Line::new(self.rings[r].0[k], self.rings[r].0[k + 1])
    }
}

#[inline]
fn contains_coord(rect: &Rect<f64>, c: Coord<f64>) -> bool {
    rect.min().x <= c.x && c.x <= rect.max().x && rect.min().y <= c.y && c.y <= rect.max().y
}

/// Whether a closed coordinate sequence forms a simple ring: at least three
/// distinct vertices, no crossings, no touching except between neighbours.
pub fn is_simple_ring(coords: &[Coord<f64>]) -> bool {
    let mut pts = coords.to_vec();
    pts.dedup();
    if pts.len() < MIN_RING_SIZE || pts.first() != pts.last() { return false }

    let segments = pts.windows(2).map(|w| Line::new(w[0], w[1])).collect::<Vec<_>>();
    let n = segments.len();
    let tree = RTree::bulk_load(
        segments.iter().enumerate()
            .map(|(s, line)| BoundingBox::segment(s, *line))
            .collect()
    );

    segments.iter().enumerate().all(|(s, a)| {
        let env = envelope(&a.bounding_rect());
        tree.locate_in_envelope_intersecting(&env)
            .map(BoundingBox::idx)
            .filter(|&t| t > s)
            .all(|t| {
                let adjacent = t == s + 1 || (s == 0 && t == n - 1);
                match line_intersection(*a, segments[t]) {
                    None => true,
                    Some(LineIntersection::Collinear { .. }) => false,
                    Some(LineIntersection::SinglePoint { .. }) => adjacent,
                }
            })
    })
}
