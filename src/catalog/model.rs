//! Deserializable representation of one archetype record.
//!
//! Every field except the name is optional on disk. Absent fields and explicit
//! `null`s both collapse to empty defaults so partially written records still
//! load; shape errors (a number where a list belongs) are caught earlier by the
//! record schema in `loader`.

use crate::catalog::identity::ArchetypeName;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
/// One catalog entry, keyed by `name`.
pub struct ArchetypeRecord {
    pub name: ArchetypeName,
    pub narrative: String,
    pub tone: String,
    pub values: Vec<String>,
    pub risks: Vec<String>,
    pub features: Vec<String>,
    pub ritual: String,
    pub cms_tags: Vec<String>,
}

/// Record body as stored under its key; the name lives in the enclosing object.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RecordFields {
    #[serde(default, deserialize_with = "null_as_default")]
    narrative: String,
    #[serde(default, deserialize_with = "null_as_default")]
    tone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    values: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    risks: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    features: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    ritual: String,
    #[serde(default, deserialize_with = "null_as_default")]
    cms_tags: Vec<String>,
}

impl RecordFields {
    pub(crate) fn into_record(self, name: ArchetypeName) -> ArchetypeRecord {
        ArchetypeRecord {
            name,
            narrative: self.narrative,
            tone: self.tone,
            values: self.values,
            risks: self.risks,
            features: self.features,
            ritual: self.ritual,
            cms_tags: self.cms_tags,
        }
    }
}

impl ArchetypeRecord {
    /// True when the record carries a care ritual worth displaying.
    pub fn has_ritual(&self) -> bool {
        !self.ritual.trim().is_empty()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
