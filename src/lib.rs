//! Shared library for the archetype vault.
//!
//! The crate loads the care archetype catalog (a JSON object of archetype
//! records) and resolves the optional per-archetype documents stored next to
//! it. Public items here form the contract that display layers depend on:
//! `ArchetypeVault` for the names/record/attachment interface, `load` and
//! `ArchetypeCatalog` for direct catalog access, and `resolve` /
//! `AttachmentStore` for documents. The `archetype-vault` binary is one such
//! display layer.

pub mod attachment;
pub mod catalog;
pub mod config;
pub mod render;
pub mod vault;

pub use attachment::{
    Attachment, AttachmentError, AttachmentResult, AttachmentStore, DEFAULT_EXTENSION, normalize_extension,
    resolve,
};
pub use catalog::{
    ArchetypeCatalog, ArchetypeName, ArchetypeRecord, CatalogError, CatalogLoad, Malformed, load,
};
pub use config::{DEFAULT_CATALOG_FILE, VaultConfig, find_vault_root};
pub use vault::ArchetypeVault;
