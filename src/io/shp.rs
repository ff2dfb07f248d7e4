use std::path::{Path, PathBuf};

use ahash::AHashMap;
use anyhow::{bail, Context, Result};
use serde_json::{json, Map, Value};
use shapefile::dbase::{FieldValue, Record};
use shapefile::{Reader, Shape};
use walkdir::WalkDir;

use crate::collection::{Feature, FeatureCollection};
use crate::common::{self, ShpCoord};
use crate::geom::{multipolygon_to_geojson, polygon_to_geojson};

/// Reads all shapes + attribute records from a given `.shp` file path.
pub fn read_shapefile(path: &Path) -> Result<Vec<(Shape, Record)>> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("Failed to open shapefile: {}", path.display()))?;

    let mut items = Vec::with_capacity(reader.shape_count()?);
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result.context("Error reading shape+record")?;
        items.push((shape, record));
    }
    Ok(items)
}

/// Sibling file of `shp` with the given extension, in either letter case.
fn companion(shp: &Path, ext: &str) -> Option<PathBuf> {
    [ext.to_ascii_lowercase(), ext.to_ascii_uppercase()].into_iter()
        .map(|ext| shp.with_extension(ext))
        .find(|path| path.exists())
}

/// Find the first `.shp` under `dir` (name order) and check that its
/// `.shx` index and `.dbf` attribute table sit next to it.
pub fn find_shapefile(dir: &Path) -> Result<PathBuf> {
    let shp = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .find(|path| path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("shp")));

    let Some(shp) = shp else { bail!("No .shp file found in the zip archive") };
    if companion(&shp, "shx").is_none() { bail!("No .shx file found in the zip archive") }
    if companion(&shp, "dbf").is_none() { bail!("No .dbf file found in the zip archive") }

    Ok(shp)
}

/// `[x, y]` position of a shapefile point.
fn position<P: ShpCoord>(p: &P) -> Value {
    let c = p.coord();
    json!([c.x, c.y])
}

fn point_geojson<P: ShpCoord>(p: &P) -> Value {
    json!({"type": "Point", "coordinates": position(p)})
}

fn multipoint_geojson<P: ShpCoord>(points: &[P]) -> Value {
    json!({"type": "MultiPoint", "coordinates": points.iter().map(position).collect::<Vec<_>>()})
}

fn polyline_geojson<P: ShpCoord>(parts: &[Vec<P>]) -> Value {
    let lines = parts.iter()
        .map(|part| part.iter().map(position).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    match lines.as_slice() {
        [line] => json!({"type": "LineString", "coordinates": line}),
        _ => json!({"type": "MultiLineString", "coordinates": lines}),
    }
}

fn polygon_geojson<P: ShpCoord>(rings: &[shapefile::PolygonRing<P>]) -> Value {
    let mp = common::shp_to_geo(rings);
    match mp.0.as_slice() {
        [polygon] => polygon_to_geojson(polygon),
        _ => multipolygon_to_geojson(&mp),
    }
}

/// GeoJSON geometry for a shapefile shape; `None` for null shapes and multipatches.
pub fn shape_to_geojson(shape: &Shape) -> Option<Value> {
    Some(match shape {
        Shape::Point(p) => point_geojson(p),
        Shape::PointM(p) => point_geojson(p),
        Shape::PointZ(p) => point_geojson(p),
        Shape::Multipoint(mp) => multipoint_geojson(mp.points()),
        Shape::MultipointM(mp) => multipoint_geojson(mp.points()),
        Shape::MultipointZ(mp) => multipoint_geojson(mp.points()),
        Shape::Polyline(line) => polyline_geojson(line.parts()),
        Shape::PolylineM(line) => polyline_geojson(line.parts()),
        Shape::PolylineZ(line) => polyline_geojson(line.parts()),
        Shape::Polygon(polygon) => polygon_geojson(polygon.rings()),
        Shape::PolygonM(polygon) => polygon_geojson(polygon.rings()),
        Shape::PolygonZ(polygon) => polygon_geojson(polygon.rings()),
        _ => return None,
    })
}

/// JSON scalar for a dBase field value.
fn field_to_json(value: FieldValue) -> Value {
    match value {
        FieldValue::Character(s) => s.map(|s| json!(s.trim_end())).unwrap_or(Value::Null),
        FieldValue::Numeric(n) => n.map(|n| json!(n)).unwrap_or(Value::Null),
        FieldValue::Float(n) => n.map(|n| json!(n)).unwrap_or(Value::Null),
        FieldValue::Logical(b) => b.map(|b| json!(b)).unwrap_or(Value::Null),
        FieldValue::Integer(n) => json!(n),
        FieldValue::Double(n) => json!(n),
        FieldValue::Date(d) => d
            .map(|d| json!(format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day())))
            .unwrap_or(Value::Null),
        other => json!(format!("{other:?}")),
    }
}

/// Column names of a `.dbf` attribute table, in header order.
fn dbf_field_order(dbf: &Path) -> Result<Vec<String>> {
    let reader = shapefile::dbase::Reader::from_path(dbf)
        .with_context(|| format!("Failed to open attribute table: {}", dbf.display()))?;
    Ok(reader.fields().iter().map(|field| field.name().to_string()).collect())
}

/// Feature properties from a dBase record, in table column order. Fields the
/// header does not list come last, by name.
fn record_to_properties(record: Record, order: &[String]) -> Map<String, Value> {
    let mut fields = record.into_iter().collect::<AHashMap<String, FieldValue>>();
    let mut props = Map::with_capacity(fields.len());
    for name in order {
        if let Some(value) = fields.remove(name) {
            props.insert(name.clone(), field_to_json(value));
        }
    }

    let mut rest = fields.into_iter().collect::<Vec<_>>();
    rest.sort_by(|a, b| a.0.cmp(&b.0));
    props.extend(rest.into_iter().map(|(name, value)| (name, field_to_json(value))));
    props
}

/// Convert the shapes and records of a `.shp` file into a FeatureCollection.
pub fn shapefile_to_collection(path: &Path) -> Result<FeatureCollection> {
    let order = match companion(path, "dbf") {
        Some(dbf) => dbf_field_order(&dbf)?,
        None => Vec::new(),
    };

    let features = read_shapefile(path)?.into_iter()
        .map(|(shape, record)| Feature::new(shape_to_geojson(&shape), record_to_properties(record, &order)))
        .collect();
    Ok(FeatureCollection::new(features))
}

/// Extract a zipped shapefile into a temporary directory and convert it.
pub fn read_zipped_shapefile(zip_path: &Path) -> Result<FeatureCollection> {
    let tmp = tempfile::tempdir().context("Failed to create temporary directory")?;
    common::extract_zip(zip_path, tmp.path())
        .with_context(|| format!("Error processing zip file: {}", zip_path.display()))?;

    let shp = find_shapefile(tmp.path())?;
    shapefile_to_collection(&shp)
}
