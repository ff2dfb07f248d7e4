//! Reading and writing feature collections on disk.
//!
//! - `geojson` - plain, zipped or gzipped GeoJSON in, pretty GeoJSON out
//! - `shp` - zipped ESRI shapefiles converted to GeoJSON

mod geojson;
mod shp;

pub use geojson::*;
pub use shp::*;
