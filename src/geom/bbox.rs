use geo::{BoundingRect, Coord, Line, Rect};
use rstar::{RTreeObject, AABB};

/// A bounding box in an R-tree, associated with a geometry by index.
#[derive(Debug, Clone)]
pub(crate) struct BoundingBox {
    idx: usize, // Index of the corresponding geometry in its owner
    bbox: Rect<f64>,
}

impl BoundingBox {
    pub(crate) fn new(idx: usize, bbox: Rect<f64>) -> Self {
        Self { idx, bbox }
    }

    /// Bounding box of the `idx`-th segment of a coordinate sequence.
    pub(crate) fn segment(idx: usize, line: Line<f64>) -> Self {
        Self::new(idx, line.bounding_rect())
    }

    /// Get the index of the corresponding geometry.
    pub(crate) fn idx(&self) -> usize { self.idx }
}

/// Convert a geo::Rect into an rstar envelope.
#[inline]
pub(crate) fn envelope(rect: &Rect<f64>) -> AABB<[f64; 2]> {
    let (min, max): (Coord<f64>, Coord<f64>) = (rect.min(), rect.max());
    AABB::from_corners(min.into(), max.into())
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        envelope(&self.bbox)
    }
}
