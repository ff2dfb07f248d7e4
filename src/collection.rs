use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single GeoJSON feature.
///
/// The geometry is kept as raw JSON: the pipelines parse it on demand and only
/// replace it when they actually change it, so anything they do not understand
/// is written back exactly as it was read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_tag")]
    pub kind: String,

    #[serde(default)]
    pub geometry: Option<Value>,

    #[serde(default)]
    pub properties: Option<Map<String, Value>>,

    /// Foreign members (`id`, `bbox`, ...), preserved untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn feature_tag() -> String { "Feature".to_string() }

fn collection_tag() -> String { "FeatureCollection".to_string() }

impl Feature {
    /// Create a feature with the given geometry and properties.
    pub fn new(geometry: Option<Value>, properties: Map<String, Value>) -> Self {
        Self { kind: feature_tag(), geometry, properties: Some(properties), extra: Map::new() }
    }

    /// Look up a property by key, treating absent `properties` as empty.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref().and_then(|props| props.get(key))
    }

    /// Property keys in document order (empty if `properties` is null).
    pub fn property_keys(&self) -> Vec<String> {
        self.properties.as_ref()
            .map(|props| props.keys().cloned().collect())
            .unwrap_or_default()
    }
}

/// An ordered GeoJSON FeatureCollection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "collection_tag")]
    pub kind: String,

    pub features: Vec<Feature>,

    /// Collection-level foreign members (`name`, `crs`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FeatureCollection {
    /// Create a collection from an ordered list of features.
    pub fn new(features: Vec<Feature>) -> Self {
        Self { kind: collection_tag(), features, extra: Map::new() }
    }

    #[inline] pub fn len(&self) -> usize { self.features.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }

    /// Parse a collection from a JSON value, checking the top-level `type`.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        use serde::de::Error;

        let collection: Self = serde_json::from_value(value)?;
        if collection.kind != "FeatureCollection" {
            return Err(serde_json::Error::custom(format!(
                "expected a FeatureCollection, found type `{}`", collection.kind
            )));
        }
        Ok(collection)
    }
}
