//! Reads the archetype catalog file into an `ArchetypeCatalog`.
//!
//! The file is a JSON object whose keys are archetype names and whose values
//! are record bodies. Each body is checked against the embedded record schema
//! before typed deserialization so shape errors name the offending field.
//! `load` never fails outright: it returns an empty catalog plus the
//! diagnostic and leaves the halt-or-continue decision to the caller.

use crate::catalog::identity::ArchetypeName;
use crate::catalog::index::ArchetypeCatalog;
use crate::catalog::model::RecordFields;
use jsonschema::JSONSchema;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

const RECORD_SCHEMA: &str = include_str!("../../schema/archetype_record.schema.json");

/// Why a catalog source could not be turned into a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog source {} is missing or unreadable", .path.display())]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("catalog source {} is malformed", origin_label(.path))]
    MalformedSource {
        path: Option<PathBuf>,
        #[source]
        reason: Malformed,
    },
    #[error("embedded archetype record schema failed to compile: {0}")]
    SchemaUnavailable(String),
}

/// Specific shape problem behind a `MalformedSource`.
#[derive(Debug, Error)]
pub enum Malformed {
    #[error("not a JSON object of archetype records")]
    Syntax(#[from] serde_json::Error),
    #[error("archetype at position {position} has an empty name")]
    EmptyName { position: usize },
    #[error("archetype '{0}' appears more than once")]
    DuplicateName(ArchetypeName),
    #[error("archetype '{name}' does not match the record schema:\n{details}")]
    RecordShape { name: ArchetypeName, details: String },
    #[error("archetype '{name}' could not be decoded")]
    RecordFields {
        name: ArchetypeName,
        #[source]
        source: serde_json::Error,
    },
}

impl CatalogError {
    pub fn is_source_not_found(&self) -> bool {
        matches!(self, CatalogError::SourceNotFound { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, CatalogError::MalformedSource { .. })
    }
}

fn origin_label(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "<in-memory>".to_string(),
    }
}

/// Outcome of `load`: always a catalog, plus the diagnostic when it is empty
/// because the source could not be used.
#[derive(Debug)]
pub struct CatalogLoad {
    pub catalog: ArchetypeCatalog,
    pub diagnostic: Option<CatalogError>,
}

impl CatalogLoad {
    pub fn is_clean(&self) -> bool {
        self.diagnostic.is_none()
    }

    pub fn into_parts(self) -> (ArchetypeCatalog, Option<CatalogError>) {
        (self.catalog, self.diagnostic)
    }
}

/// Load the catalog at `path`, recovering from any failure with an empty
/// catalog and a diagnostic.
pub fn load(path: &Path) -> CatalogLoad {
    match ArchetypeCatalog::from_path(path) {
        Ok(catalog) => {
            debug!(path = %path.display(), records = catalog.len(), "loaded archetype catalog");
            CatalogLoad {
                catalog,
                diagnostic: None,
            }
        }
        Err(err) => {
            warn!(path = %path.display(), error = ?err, "archetype catalog unavailable; continuing with an empty catalog");
            CatalogLoad {
                catalog: ArchetypeCatalog::empty(),
                diagnostic: Some(err),
            }
        }
    }
}

impl ArchetypeCatalog {
    /// Read and validate a catalog from disk, returning the first problem found.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let bytes = fs::read(path).map_err(|source| CatalogError::SourceNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        parse_catalog(&bytes).map_err(|err| match err {
            CatalogError::MalformedSource { reason, .. } => CatalogError::MalformedSource {
                path: Some(path.to_path_buf()),
                reason,
            },
            other => other,
        })
    }

    /// Parse and validate a catalog already held in memory.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CatalogError> {
        parse_catalog(bytes)
    }
}

fn parse_catalog(bytes: &[u8]) -> Result<ArchetypeCatalog, CatalogError> {
    let malformed = |reason: Malformed| CatalogError::MalformedSource { path: None, reason };

    let entries: OrderedEntries =
        serde_json::from_slice(bytes).map_err(|err| malformed(Malformed::Syntax(err)))?;
    let schema = compile_record_schema()?;

    let mut records = Vec::with_capacity(entries.0.len());
    for (key, body) in entries.0 {
        let name = ArchetypeName(key);
        validate_record_shape(&schema, &name, &body).map_err(malformed)?;
        let fields: RecordFields = serde_json::from_value(body).map_err(|source| {
            malformed(Malformed::RecordFields {
                name: name.clone(),
                source,
            })
        })?;
        records.push(fields.into_record(name));
    }

    ArchetypeCatalog::from_records(records).map_err(malformed)
}

fn compile_record_schema() -> Result<JSONSchema, CatalogError> {
    let schema: Value = serde_json::from_str(RECORD_SCHEMA)
        .map_err(|err| CatalogError::SchemaUnavailable(err.to_string()))?;
    JSONSchema::compile(&schema).map_err(|err| CatalogError::SchemaUnavailable(err.to_string()))
}

fn validate_record_shape(
    schema: &JSONSchema,
    name: &ArchetypeName,
    body: &Value,
) -> Result<(), Malformed> {
    if let Err(errors) = schema.validate(body) {
        let details = errors
            .map(|err| format!("  at '{}': {}", err.instance_path, err))
            .collect::<Vec<_>>()
            .join("\n");
        return Err(Malformed::RecordShape {
            name: name.clone(),
            details,
        });
    }
    Ok(())
}

/// Top-level catalog entries in file order. Duplicate keys are kept so the
/// index can reject them instead of silently keeping the last one.
struct OrderedEntries(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for OrderedEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = OrderedEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object mapping archetype names to records")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    entries.push((key, value));
                }
                Ok(OrderedEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}
