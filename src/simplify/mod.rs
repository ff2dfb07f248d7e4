mod feature;
mod polygon;
mod ring;

pub use feature::{simplify_collection, FeatureReport};
pub use polygon::{simplify_multipolygon, simplify_polygon, PointCount};
pub use ring::{is_simple_ring, simplify_ring, simplify_rings, MIN_RING_SIZE};

use std::fmt;

use crate::geom::GeomError;

/// Default tolerance, in coordinate units (degrees for lon/lat data).
pub const DEFAULT_TOLERANCE: f64 = 0.001;

/// Settings for the simplification pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplifyOptions {
    pub tolerance: f64,
}

impl Default for SimplifyOptions {
    fn default() -> Self { Self { tolerance: DEFAULT_TOLERANCE } }
}

/// Errors raised by the simplification pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum SimplifyError {
    /// Tolerance is negative, NaN or infinite.
    InvalidTolerance(f64),
    /// The geometry of the feature at `index` could not be read.
    Geometry { index: usize, source: GeomError },
}

impl fmt::Display for SimplifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimplifyError::InvalidTolerance(t) => write!(f, "tolerance must be a non-negative number, got {t}"),
            SimplifyError::Geometry { index, source } => write!(f, "feature {index}: {source}"),
        }
    }
}

impl std::error::Error for SimplifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimplifyError::Geometry { source, .. } => Some(source),
            SimplifyError::InvalidTolerance(_) => None,
        }
    }
}
