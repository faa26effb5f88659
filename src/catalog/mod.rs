//! Archetype catalog wiring.
//!
//! This module wraps the JSON archetype file (`archetype_prompt_vault_*.json`)
//! so callers can load a validated, immutable snapshot. `load` is the
//! forgiving entry point used by display layers; `ArchetypeCatalog::from_path`
//! returns the error instead of recovering from it.

pub mod identity;
pub mod index;
pub mod loader;
pub mod model;

pub use identity::ArchetypeName;
pub use index::ArchetypeCatalog;
pub use loader::{CatalogError, CatalogLoad, Malformed, load};
pub use model::ArchetypeRecord;
