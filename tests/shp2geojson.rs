// Integration tests for shapefile_to_geojson: a real shapefile written with
// the shapefile crate, zipped, converted and read back.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use geoslice::{read_feature_collection, shapefile_to_geojson};
use serde_json::{json, Value};
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{Point, Polygon, PolygonRing};

/// Clockwise unit-ish square, the shapefile orientation for an outer ring.
fn square(x: f64, size: f64) -> Polygon {
    Polygon::new(PolygonRing::Outer(vec![
        Point::new(x, 0.0),
        Point::new(x, size),
        Point::new(x + size, size),
        Point::new(x + size, 0.0),
        Point::new(x, 0.0),
    ]))
}

/// Write `parcels.shp/.shx/.dbf` into `dir`, columns NAME then AREA.
fn write_shapefile(dir: &Path) -> PathBuf {
    let shp = dir.join("parcels.shp");
    let table = TableWriterBuilder::new()
        .add_character_field(FieldName::try_from("NAME").unwrap(), 20)
        .add_numeric_field(FieldName::try_from("AREA").unwrap(), 10, 2);

    let mut writer = shapefile::Writer::from_path(&shp, table).unwrap();
    for (name, x, size) in [("Alpha", 0.0, 1.0), ("Beta", 5.0, 2.0)] {
        let mut record = Record::default();
        record.insert("NAME".to_string(), FieldValue::Character(Some(name.to_string())));
        record.insert("AREA".to_string(), FieldValue::Numeric(Some(size * size)));
        writer.write_shape_and_record(&square(x, size), &record).unwrap();
    }
    drop(writer);

    shp
}

/// Zip the listed companions of `shp` under a `data/` folder.
fn zip_shapefile(shp: &Path, exts: &[&str], zip_path: &Path) {
    let mut zip = zip::ZipWriter::new(fs::File::create(zip_path).unwrap());
    for ext in exts {
        let file = shp.with_extension(ext);
        let name = format!("data/{}", file.file_name().unwrap().to_string_lossy());
        zip.start_file(name, zip::write::SimpleFileOptions::default()).unwrap();
        zip.write_all(&fs::read(&file).unwrap()).unwrap();
    }
    zip.finish().unwrap();
}

#[test]
fn converts_zipped_polygons() {
    let dir = tempfile::tempdir().unwrap();
    let shp = write_shapefile(dir.path());
    let zip_path = dir.path().join("parcels.zip");
    zip_shapefile(&shp, &["shp", "shx", "dbf"], &zip_path);

    let output = dir.path().join("parcels.geojson");
    let count = shapefile_to_geojson(&zip_path, &output, 0).unwrap();
    assert_eq!(count, 2);

    let fc = read_feature_collection(&output).unwrap();
    assert_eq!(fc.len(), 2);

    let first = &fc.features[0];
    let props = first.properties.as_ref().unwrap();
    assert_eq!(props.keys().collect::<Vec<_>>(), ["NAME", "AREA"]);
    assert_eq!(props["NAME"], json!("Alpha"));
    assert_eq!(props["AREA"].as_f64(), Some(1.0));

    let geometry = first.geometry.as_ref().unwrap();
    assert_eq!(geometry["type"], "Polygon");
    assert_eq!(geometry["coordinates"][0].as_array().unwrap().len(), 5);

    assert_eq!(fc.features[1].property("NAME"), Some(&Value::from("Beta")));
}

#[test]
fn missing_attribute_table_fails() {
    let dir = tempfile::tempdir().unwrap();
    let shp = write_shapefile(dir.path());
    let zip_path = dir.path().join("parcels.zip");
    zip_shapefile(&shp, &["shp", "shx"], &zip_path);

    let output = dir.path().join("parcels.geojson");
    let err = shapefile_to_geojson(&zip_path, &output, 0).unwrap_err();
    assert_eq!(err.to_string(), "No .dbf file found in the zip archive");
    assert!(!output.exists());
}
