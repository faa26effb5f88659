//! Display-layer entry point.
//!
//! An `ArchetypeVault` owns one catalog snapshot and one attachment store,
//! both built from an explicit `VaultConfig`. The catalog sits behind an `Arc`
//! so request handlers can share it without locking; attachments are read
//! fresh on every call.

use crate::attachment::{AttachmentError, AttachmentResult, AttachmentStore};
use crate::catalog::{ArchetypeCatalog, ArchetypeRecord, CatalogError, load};
use crate::config::VaultConfig;
use std::sync::Arc;

#[derive(Debug)]
pub struct ArchetypeVault {
    config: VaultConfig,
    catalog: Arc<ArchetypeCatalog>,
    attachments: AttachmentStore,
    diagnostic: Option<CatalogError>,
}

impl ArchetypeVault {
    /// Load the catalog named by `config` and wire the attachment store.
    ///
    /// Only an unusable attachment extension fails; a missing or malformed
    /// catalog yields an empty vault whose `diagnostic()` explains why.
    pub fn open(config: VaultConfig) -> Result<Self, AttachmentError> {
        let attachments =
            AttachmentStore::new(&config.attachment_dir, &config.attachment_extension)?;
        let (catalog, diagnostic) = load(&config.catalog_path).into_parts();
        Ok(Self {
            config,
            catalog: Arc::new(catalog),
            attachments,
            diagnostic,
        })
    }

    /// Assemble a vault from an already loaded catalog.
    pub fn with_catalog(
        config: VaultConfig,
        catalog: Arc<ArchetypeCatalog>,
    ) -> Result<Self, AttachmentError> {
        let attachments =
            AttachmentStore::new(&config.attachment_dir, &config.attachment_extension)?;
        Ok(Self {
            config,
            catalog,
            attachments,
            diagnostic: None,
        })
    }

    /// Archetype names in catalog order, ready for a selection widget.
    pub fn all_names(&self) -> Vec<String> {
        self.catalog
            .names()
            .map(|name| name.as_str().to_string())
            .collect()
    }

    pub fn record(&self, name: &str) -> Option<&ArchetypeRecord> {
        self.catalog.get(name)
    }

    /// Document for `name`. Does not require `name` to be a catalog key.
    pub fn attachment(&self, name: &str) -> AttachmentResult {
        self.attachments.resolve(name)
    }

    pub fn catalog(&self) -> &Arc<ArchetypeCatalog> {
        &self.catalog
    }

    pub fn attachments(&self) -> &AttachmentStore {
        &self.attachments
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Why the catalog is empty, when loading failed.
    pub fn diagnostic(&self) -> Option<&CatalogError> {
        self.diagnostic.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }
}
