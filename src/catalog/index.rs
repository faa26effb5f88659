//! Indexed, immutable view of a loaded archetype catalog.
//!
//! Records keep the order of the source file so selection lists stay stable
//! across loads; a BTreeMap from name to position backs lookups. The index is
//! strict about empty and duplicate names so a display layer never has to
//! choose between two records for one key.

use crate::catalog::identity::ArchetypeName;
use crate::catalog::loader::Malformed;
use crate::catalog::model::ArchetypeRecord;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
/// Archetype records in source order plus a derived index keyed by name.
pub struct ArchetypeCatalog {
    records: Vec<ArchetypeRecord>,
    by_name: BTreeMap<ArchetypeName, usize>,
}

impl ArchetypeCatalog {
    /// A catalog with no records; what `load` hands back alongside a diagnostic.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the index from records already in display order.
    ///
    /// Rejects empty names and names that appear more than once.
    pub fn from_records(records: Vec<ArchetypeRecord>) -> Result<Self, Malformed> {
        let mut by_name = BTreeMap::new();
        for (position, record) in records.iter().enumerate() {
            if record.name.is_empty() {
                return Err(Malformed::EmptyName { position });
            }
            if by_name.insert(record.name.clone(), position).is_some() {
                return Err(Malformed::DuplicateName(record.name.clone()));
            }
        }
        Ok(Self { records, by_name })
    }

    /// Resolve a record by name.
    ///
    /// Returns `None` for unknown names; callers decide how to report them.
    pub fn get(&self, name: &str) -> Option<&ArchetypeRecord> {
        self.by_name.get(name).map(|&position| &self.records[position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Iterates names in source order.
    pub fn names(&self) -> impl Iterator<Item = &ArchetypeName> {
        self.records.iter().map(|record| &record.name)
    }

    /// Records in source order.
    pub fn records(&self) -> &[ArchetypeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
