mod bbox;
mod geojson;
mod geometry;

pub(crate) use bbox::{envelope, BoundingBox};
pub use geojson::{multipolygon_to_geojson, polygon_to_geojson};
pub use geometry::Geometry;

use std::fmt;

/// Errors raised while reading a GeoJSON geometry object.
#[derive(Debug, Clone, PartialEq)]
pub enum GeomError {
    /// The geometry object has no string `type` member.
    MissingType,
    /// The `coordinates` member does not match the declared type.
    InvalidCoordinates(String),
}

impl fmt::Display for GeomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeomError::MissingType => write!(f, "geometry has no `type` member"),
            GeomError::InvalidCoordinates(msg) => write!(f, "invalid coordinates: {msg}"),
        }
    }
}

impl std::error::Error for GeomError {}
