use ahash::AHashMap;

use crate::collection::{Feature, FeatureCollection};

/// Features bucketed by region name.
///
/// Buckets appear in the order they were first matched, and features within
/// a bucket keep their input order. A feature may sit in several buckets.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    buckets: Vec<(String, Vec<Feature>)>,
    index: AHashMap<String, usize>, // Region name -> position in buckets
}

impl Partition {
    /// Create an empty partition.
    pub fn new() -> Self { Self::default() }

    /// Append `feature` to the bucket for `region`, creating it on first use.
    pub(crate) fn push(&mut self, region: &str, feature: Feature) {
        let idx = match self.index.get(region) {
            Some(&idx) => idx,
            None => {
                self.buckets.push((region.to_string(), Vec::new()));
                self.index.insert(region.to_string(), self.buckets.len() - 1);
                self.buckets.len() - 1
            }
        };
        self.buckets[idx].1.push(feature);
    }

    /// Number of non-empty buckets.
    #[inline] pub fn len(&self) -> usize { self.buckets.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.buckets.is_empty() }

    /// Features assigned to `region`, if any matched.
    pub fn get(&self, region: &str) -> Option<&[Feature]> {
        self.index.get(region).map(|&idx| self.buckets[idx].1.as_slice())
    }

    /// Region names in first-match order.
    pub fn names(&self) -> Vec<&str> {
        self.buckets.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Iterate over `(region, features)` in first-match order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Feature])> {
        self.buckets.iter().map(|(name, features)| (name.as_str(), features.as_slice()))
    }

    /// Consume the partition, wrapping each bucket in its own FeatureCollection.
    pub fn into_collections(self) -> Vec<(String, FeatureCollection)> {
        self.buckets.into_iter()
            .map(|(name, features)| (name, FeatureCollection::new(features)))
            .collect()
    }
}
