//! Vault configuration and root discovery.
//!
//! Paths come from explicit values first, then `ARCHETYPE_VAULT_*` environment
//! variables, then defaults relative to the discovered vault root. Nothing
//! here is process-global: callers build a `VaultConfig` and hand it to
//! `ArchetypeVault::open`.

use crate::attachment::{DEFAULT_EXTENSION, normalize_extension};
use anyhow::Result;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CATALOG_FILE: &str = "archetype_prompt_vault_waltz4.json";

pub const ENV_ROOT: &str = "ARCHETYPE_VAULT_ROOT";
pub const ENV_CATALOG: &str = "ARCHETYPE_VAULT_CATALOG";
pub const ENV_DOCS: &str = "ARCHETYPE_VAULT_DOCS";
pub const ENV_DOC_EXT: &str = "ARCHETYPE_VAULT_DOC_EXT";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VaultConfig {
    pub catalog_path: PathBuf,
    pub attachment_dir: PathBuf,
    pub attachment_extension: String,
}

impl VaultConfig {
    /// Defaults anchored at `root`: the waltz4 catalog file and PDFs beside it.
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            catalog_path: root.join(DEFAULT_CATALOG_FILE),
            attachment_dir: root.to_path_buf(),
            attachment_extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Build a config from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset. Relative catalog/docs overrides are
    /// taken as given, not re-anchored at the root.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let root = find_vault_root_with(var(ENV_ROOT).as_deref());
        let mut config = Self::rooted_at(&root);
        if let Some(path) = var(ENV_CATALOG) {
            config.catalog_path = PathBuf::from(path);
        }
        if let Some(dir) = var(ENV_DOCS) {
            config.attachment_dir = PathBuf::from(dir);
        }
        if let Some(ext) = var(ENV_DOC_EXT) {
            config.attachment_extension = ext;
        }
        config
    }

    /// Normalize and check the extension up front; `ArchetypeVault::open`
    /// applies the same check. The catalog path is checked lazily by the loader.
    pub fn validate(mut self) -> Result<Self> {
        self.attachment_extension = normalize_extension(&self.attachment_extension)?;
        Ok(self)
    }
}

/// Locate the vault root using the process environment.
pub fn find_vault_root() -> PathBuf {
    find_vault_root_with(env::var(ENV_ROOT).ok().as_deref())
}

/// Search order: explicit hint when it names a directory, then the nearest
/// ancestor of the current directory holding the default catalog, then the
/// build-time hint, then the current directory.
fn find_vault_root_with(hint: Option<&str>) -> PathBuf {
    if let Some(root) = hint.and_then(root_from_hint) {
        return root;
    }

    if let Ok(cwd) = env::current_dir() {
        if let Some(root) = search_upwards(&cwd) {
            return root;
        }
    }

    if let Some(root) = option_env!("ARCHETYPE_VAULT_ROOT_HINT").and_then(root_from_hint) {
        if is_vault_root(&root) {
            return root;
        }
    }

    PathBuf::from(".")
}

fn is_vault_root(candidate: &Path) -> bool {
    candidate.join(DEFAULT_CATALOG_FILE).is_file()
}

fn root_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.trim().is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !hint_path.is_dir() {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        if is_vault_root(&dir) {
            return Some(dir);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}
