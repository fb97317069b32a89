use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Document,
    Script,
    Style,
    Image,
    Font,
}

/// Push weight. Only the value 1 is ever produced or accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Weight;

impl Serialize for Weight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(1)
    }
}

impl<'de> Deserialize<'de> for Weight {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u64::deserialize(deserializer)? {
            1 => Ok(Weight),
            other => Err(de::Error::custom(format!("unsupported push weight {other}"))),
        }
    }
}

/// One resource to push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushManifestEntry {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<ResourceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Weight>,
}

impl PushManifestEntry {
    pub fn new(resource_type: Option<ResourceType>) -> Self {
        Self { resource_type, weight: Some(Weight) }
    }
}

/// Resources to push for one entry, keyed by resource URL.
pub type PushManifestEntryCollection = BTreeMap<String, PushManifestEntry>;

/// Entry URL to the resources pushed alongside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PushManifest(BTreeMap<String, PushManifestEntryCollection>);

impl PushManifest {
    pub fn insert(&mut self, url: impl Into<String>, collection: PushManifestEntryCollection) {
        self.0.insert(url.into(), collection);
    }

    pub fn get(&self, url: &str) -> Option<&PushManifestEntryCollection> {
        self.0.get(url)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PushManifestEntryCollection)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of pushed resources across all entries.
    pub fn resource_count(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    /// Serialises with two-space indentation.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl FromIterator<(String, PushManifestEntryCollection)> for PushManifest {
    fn from_iter<I: IntoIterator<Item = (String, PushManifestEntryCollection)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
