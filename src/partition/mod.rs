mod matcher;
mod partition;
mod region;

pub use matcher::assign_features;
pub use partition::Partition;
pub use region::{Region, RegionSet};

use std::fmt;

use serde_json::Value;

use crate::geom::GeomError;

/// Errors raised while extracting regions or matching features against them.
#[derive(Debug, Clone, PartialEq)]
pub enum PartitionError {
    /// A region feature lacks the name property.
    MissingField { field: String, available: Vec<String> },
    /// The name property is neither a string nor a number.
    InvalidRegionName { field: String, value: Value },
    /// Two region features share the same name.
    DuplicateRegion(String),
    /// The region name cannot be used inside an output file name.
    UnsafeRegionName(String),
    /// A region's geometry is not a Polygon or MultiPolygon.
    InvalidRegionGeometry { name: String, kind: String },
    /// The geometry of the region feature at `index` could not be read.
    RegionGeometry { index: usize, source: GeomError },
    /// The geometry of the input feature at `index` could not be read.
    Geometry { index: usize, source: GeomError },
}

impl fmt::Display for PartitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionError::MissingField { field, available } =>
                write!(f, "`{field}` not found in properties: {available:?}"),
            PartitionError::InvalidRegionName { field, value } =>
                write!(f, "`{field}` must be a string or number, found {value}"),
            PartitionError::DuplicateRegion(name) =>
                write!(f, "duplicate region name: {name}"),
            PartitionError::UnsafeRegionName(name) =>
                write!(f, "region name {name:?} contains a path separator or `..`"),
            PartitionError::InvalidRegionGeometry { name, kind } =>
                write!(f, "region {name} has {kind} geometry, expected Polygon or MultiPolygon"),
            PartitionError::RegionGeometry { index, source } =>
                write!(f, "region feature {index}: {source}"),
            PartitionError::Geometry { index, source } =>
                write!(f, "feature {index}: {source}"),
        }
    }
}

impl std::error::Error for PartitionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PartitionError::RegionGeometry { source, .. } | PartitionError::Geometry { source, .. } => Some(source),
            _ => None,
        }
    }
}
