pub mod shp2geojson;
pub mod simplify;
pub mod split;
