use crate::collection::FeatureCollection;
use crate::geom::Geometry;
use crate::partition::{Partition, PartitionError, RegionSet};

/// Assign every feature to each region its geometry intersects.
///
/// This is a full features x regions scan (narrowed by the region bounding
/// boxes). Features with null, empty or untestable geometry, and features outside
/// every region, appear in no bucket.
pub fn assign_features(fc: &FeatureCollection, regions: &RegionSet) -> Result<Partition, PartitionError> {
    let mut partition = Partition::new();

    for (index, feature) in fc.features.iter().enumerate() {
        let Some(value) = feature.geometry.as_ref() else { continue };
        let geometry = Geometry::from_geojson(value)
            .map_err(|source| PartitionError::Geometry { index, source })?;

        for region in regions.matching(&geometry) {
            partition.push(&region.name, feature.clone());
        }
    }

    Ok(partition)
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn states() -> FeatureCollection {
        FeatureCollection::from_value(json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"STATE_NAME": "California"}, "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [-124.21216360595776, 41.991688364789326],
                        [-123.75211616376686, 33.00355182532641],
                        [-114.75422917077651, 32.74353381693339],
                        [-114.56502785695653, 34.98130460609541],
                        [-119.7592521293625, 38.76821066788523],
                        [-119.77117362239831, 41.98306338884649],
                        [-124.209929313661, 41.99461151876329]
                    ]]
                }},
                {"type": "Feature", "properties": {"STATE_NAME": "Nevada"}, "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [-120.00631469935398, 41.98041714014769],
                        [-119.97713743300429, 38.934313451462174],
                        [-114.08351651556231, 34.526595541725925],
                        [-114.04380719530928, 41.98841730532064],
                        [-120.00631469935398, 41.98041714014769]
                    ]]
                }}
            ]
        })).unwrap()
    }

    fn places() -> FeatureCollection {
        FeatureCollection::from_value(json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"id": "1", "name": "California"},
                 "geometry": {"type": "Point", "coordinates": [-122, 38]}},
                {"type": "Feature", "properties": {"id": "2", "name": "Las Vegas"},
                 "geometry": {"type": "Point", "coordinates": [-115, 36]}},
                {"type": "Feature", "properties": {"id": "3", "name": "Reno"},
                 "geometry": {"coordinates": [-119.80151826650294, 39.59011853993252], "type": "Point"}},
                {"type": "Feature", "properties": {"id": "4", "name": "Nowhere"},
                 "geometry": {"type": "Point", "coordinates": [0, 0]}},
                {"type": "Feature", "properties": {"id": "5", "name": "Null"}, "geometry": null}
            ]
        })).unwrap()
    }

    fn ids(partition: &Partition, region: &str) -> Vec<Value> {
        partition.get(region).unwrap().iter()
            .map(|f| f.property("id").unwrap().clone())
            .collect()
    }

    #[test]
    fn reno_lands_in_both_states() {
        let regions = RegionSet::from_collection(&states(), "STATE_NAME").unwrap();
        let partition = assign_features(&places(), &regions).unwrap();

        assert_eq!(partition.names(), vec!["California", "Nevada"]);
        assert_eq!(ids(&partition, "California"), vec![json!("1"), json!("3")]);
        assert_eq!(ids(&partition, "Nevada"), vec![json!("2"), json!("3")]);
    }

    #[test]
    fn buckets_follow_first_match() {
        let regions = RegionSet::from_collection(&states(), "STATE_NAME").unwrap();
        let mut input = places();
        input.features.swap(0, 1); // Las Vegas first

        let partition = assign_features(&input, &regions).unwrap();
        assert_eq!(partition.names(), vec!["Nevada", "California"]);
    }

    #[test]
    fn unmatched_input_yields_empty_partition() {
        let regions = RegionSet::from_collection(&states(), "STATE_NAME").unwrap();
        let mut input = places();
        input.features.drain(0..3);

        assert!(assign_features(&input, &regions).unwrap().is_empty());
    }

    #[test]
    fn empty_geometry_matches_nothing() {
        let regions = RegionSet::from_collection(&states(), "STATE_NAME").unwrap();
        let input = FeatureCollection::from_value(json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"id": "e"}, "geometry": {"type": "Point", "coordinates": []}},
                {"type": "Feature", "properties": {"id": "m"}, "geometry": {"type": "MultiPolygon", "coordinates": []}},
                {"type": "Feature", "properties": {"id": "r"},
                 "geometry": {"type": "Point", "coordinates": [-119.80151826650294, 39.59011853993252]}}
            ]
        })).unwrap();

        let partition = assign_features(&input, &regions).unwrap();
        assert_eq!(ids(&partition, "California"), vec![json!("r")]);
        assert_eq!(ids(&partition, "Nevada"), vec![json!("r")]);
    }

    #[test]
    fn malformed_feature_geometry_is_an_error() {
        let regions = RegionSet::from_collection(&states(), "STATE_NAME").unwrap();
        let input = FeatureCollection::from_value(json!({
            "type": "FeatureCollection",
            "features": [{"type": "Feature", "properties": {}, "geometry": {"type": "Point"}}]
        })).unwrap();

        assert!(matches!(
            assign_features(&input, &regions),
            Err(PartitionError::Geometry { index: 0, .. })
        ));
    }
}
