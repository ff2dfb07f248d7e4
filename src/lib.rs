#![doc = "Polygon simplification and region-based splitting for GeoJSON"]
mod collection;
mod common;
mod geom;
mod io;
mod ops;
mod partition;
mod simplify;

#[doc(inline)]
pub use collection::{Feature, FeatureCollection};

#[doc(inline)]
pub use geom::{multipolygon_to_geojson, polygon_to_geojson, GeomError, Geometry};

#[doc(inline)]
pub use simplify::{
    is_simple_ring, simplify_collection, simplify_multipolygon, simplify_polygon, simplify_ring, simplify_rings,
    FeatureReport, PointCount, SimplifyError, SimplifyOptions, DEFAULT_TOLERANCE, MIN_RING_SIZE,
};

#[doc(inline)]
pub use partition::{assign_features, Partition, PartitionError, Region, RegionSet};

#[doc(inline)]
pub use io::{
    parse_feature_collection, read_feature_collection, read_zipped_shapefile, shapefile_to_collection,
    write_feature_collection, Container,
};

#[doc(inline)]
pub use common::{derive_simplified_path, split_output_path, unique_path};

#[doc(inline)]
pub use ops::{shapefile_to_geojson, simplify_file, split_file};
