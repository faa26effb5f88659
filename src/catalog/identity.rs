use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Catalog key for one archetype (e.g., `Guardian`).
///
/// The name doubles as the attachment stem, so the same value addresses both
/// the record and its optional document.
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArchetypeName(pub String);

impl ArchetypeName {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Catalog keys must be non-empty; whitespace is significant.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Borrow<str> for ArchetypeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ArchetypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArchetypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArchetypeName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ArchetypeName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn name_serializes_as_plain_string() {
        let name = ArchetypeName::from("Guardian");
        let serialized = serde_json::to_string(&name).unwrap();
        assert_eq!(serialized, "\"Guardian\"");
        let parsed: ArchetypeName = serde_json::from_str(&serialized).unwrap();
        assert_eq!(parsed, name);
    }

    #[test]
    fn map_lookup_accepts_str() {
        let mut map = BTreeMap::new();
        map.insert(ArchetypeName::from("Nurturer"), 1);
        assert_eq!(map.get("Nurturer"), Some(&1));
        assert_eq!(map.get("nurturer"), None);
    }

    #[test]
    fn only_the_empty_string_is_empty() {
        assert!(ArchetypeName::from("").is_empty());
        assert!(!ArchetypeName::from("  \t").is_empty());
        assert!(!ArchetypeName::from("Sage").is_empty());
    }
}
