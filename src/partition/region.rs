use ahash::AHashSet;
use geo::{BoundingRect, Intersects, MultiPolygon, Rect};
use rstar::RTree;
use serde_json::Value;

use crate::collection::FeatureCollection;
use crate::geom::{envelope, BoundingBox, Geometry};
use crate::partition::PartitionError;

/// A named reference geometry used as a partition key.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub geometry: MultiPolygon<f64>,
}

/// Regions in definition order, with an R-tree over their bounding boxes.
#[derive(Debug, Clone)]
pub struct RegionSet {
    regions: Vec<Region>,
    rtree: RTree<BoundingBox>,
}

impl RegionSet {
    /// Build a region set, rejecting duplicate names and names that would
    /// escape the output directory.
    pub fn new(regions: Vec<Region>) -> Result<Self, PartitionError> {
        if let Some(region) = regions.iter().find(|region| !is_safe_name(&region.name)) {
            return Err(PartitionError::UnsafeRegionName(region.name.clone()));
        }

        let mut seen = AHashSet::with_capacity(regions.len());
        if let Some(dup) = regions.iter().find(|region| !seen.insert(region.name.as_str())) {
            return Err(PartitionError::DuplicateRegion(dup.name.clone()));
        }

        Ok(Self {
            rtree: RTree::bulk_load(
                regions.iter().enumerate()
                    .filter_map(|(i, region)| Some(BoundingBox::new(i, region.geometry.bounding_rect()?)))
                    .collect()
            ),
            regions,
        })
    }

    /// Extract one region per feature of `fc`, named by the `field` property.
    ///
    /// Features without geometry are skipped. Every other feature must carry
    /// `field`; the first one that does not aborts the whole extraction.
    pub fn from_collection(fc: &FeatureCollection, field: &str) -> Result<Self, PartitionError> {
        let mut regions = Vec::with_capacity(fc.len());

        for (index, feature) in fc.features.iter().enumerate() {
            let Some(value) = feature.geometry.as_ref() else { continue };

            let name = match feature.property(field) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                Some(other) => return Err(PartitionError::InvalidRegionName {
                    field: field.to_string(),
                    value: other.clone(),
                }),
                None => return Err(PartitionError::MissingField {
                    field: field.to_string(),
                    available: feature.property_keys(),
                }),
            };

            let geometry = Geometry::from_geojson(value)
                .map_err(|source| PartitionError::RegionGeometry { index, source })?;
            let kind = geometry.kind().to_string();
            let geometry = geometry.into_multipolygon()
                .ok_or(PartitionError::InvalidRegionGeometry { name: name.clone(), kind })?;

            regions.push(Region { name, geometry });
        }

        Self::new(regions)
    }

    #[inline] pub fn len(&self) -> usize { self.regions.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.regions.is_empty() }

    /// Iterate over regions in definition order.
    #[inline] pub fn iter(&self) -> impl Iterator<Item = &Region> { self.regions.iter() }

    /// Region names in definition order.
    pub fn names(&self) -> Vec<&str> {
        self.regions.iter().map(|region| region.name.as_str()).collect()
    }

    /// Regions whose bounding box overlaps `bbox`, in definition order.
    fn candidates(&self, bbox: &Rect<f64>) -> Vec<usize> {
        let mut candidates = self.rtree.locate_in_envelope_intersecting(&envelope(bbox))
            .map(BoundingBox::idx)
            .collect::<Vec<_>>();
        candidates.sort_unstable();
        candidates
    }

    /// Regions that spatially intersect `geometry`, in definition order.
    /// Geometry kinds that cannot be tested never match.
    pub fn matching<'a>(&'a self, geometry: &Geometry) -> Vec<&'a Region> {
        let Some(bbox) = bounds(geometry) else { return Vec::new() };

        self.candidates(&bbox).into_iter()
            .map(|i| &self.regions[i])
            .filter(|region| intersects(&region.geometry, geometry))
            .collect()
    }
}

/// Whether `name` can be embedded in a file name without changing directory.
fn is_safe_name(name: &str) -> bool {
    !name.contains(['/', '\\', '\0']) && !name.contains("..")
}

/// Bounding rectangle of a testable geometry.
fn bounds(geometry: &Geometry) -> Option<Rect<f64>> {
    match geometry {
        Geometry::Point(p) => Some(p.bounding_rect()),
        Geometry::LineString(ls) => ls.bounding_rect(),
        Geometry::Polygon(p) => p.bounding_rect(),
        Geometry::MultiPolygon(mp) => mp.bounding_rect(),
        Geometry::Empty(_) | Geometry::Other(_) => None,
    }
}

/// Whether `region` and `geometry` share at least one point (boundaries included).
fn intersects(region: &MultiPolygon<f64>, geometry: &Geometry) -> bool {
    region.0.iter().any(|poly| match geometry {
        Geometry::Point(p) => poly.intersects(&p.0),
        Geometry::LineString(ls) => poly.intersects(ls),
        Geometry::Polygon(p) => poly.intersects(p),
        Geometry::MultiPolygon(mp) => mp.0.iter().any(|p| poly.intersects(p)),
        Geometry::Empty(_) | Geometry::Other(_) => false,
    })
}
