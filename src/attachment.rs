//! Per-archetype document lookup.
//!
//! Each archetype may have one document stored as `<base_dir>/<name>.<ext>`.
//! A missing document is an ordinary outcome (`Attachment::NotFound`); only a
//! file that exists but cannot be read is an error. Extensions are checked
//! when the store is built and names before any path is built, so neither can
//! address a file outside the attachment directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_EXTENSION: &str = "pdf";

/// A resolved document, or the absence of one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Attachment {
    Found(Vec<u8>),
    NotFound,
}

impl Attachment {
    pub fn is_found(&self) -> bool {
        matches!(self, Attachment::Found(_))
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Attachment::Found(bytes) => Some(bytes.as_slice()),
            Attachment::NotFound => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("document {} exists but could not be read", .path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("'{name}' cannot name a document inside the attachment directory")]
    InvalidName { name: String },
    #[error("'{extension}' is not a usable document extension")]
    InvalidExtension { extension: String },
}

pub type AttachmentResult = Result<Attachment, AttachmentError>;

/// Directory plus extension that together address archetype documents.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttachmentStore {
    base_dir: PathBuf,
    extension: String,
}

impl AttachmentStore {
    /// Build a store; fails when `extension` is empty or carries a path
    /// separator.
    pub fn new(
        base_dir: impl Into<PathBuf>,
        extension: impl AsRef<str>,
    ) -> Result<Self, AttachmentError> {
        Ok(Self {
            base_dir: base_dir.into(),
            extension: normalize_extension(extension.as_ref())?,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Download file name offered to users, e.g. `Guardian.pdf`.
    pub fn file_name(&self, name: &str) -> Result<String, AttachmentError> {
        validate_name(name)?;
        Ok(format!("{name}.{}", self.extension))
    }

    /// The single path `resolve` will read for `name`.
    pub fn candidate_path(&self, name: &str) -> Result<PathBuf, AttachmentError> {
        Ok(self.base_dir.join(self.file_name(name)?))
    }

    /// Read the document for `name`.
    ///
    /// Existence is checked before reading so absence and read failure stay
    /// distinct. A file removed between the check and the read surfaces as
    /// `ReadError`.
    pub fn resolve(&self, name: &str) -> AttachmentResult {
        let path = self.candidate_path(name)?;
        let exists = path.try_exists().map_err(|source| {
            warn!(path = %path.display(), error = %source, "unable to stat archetype document");
            AttachmentError::ReadError {
                path: path.clone(),
                source,
            }
        })?;
        if !exists {
            debug!(path = %path.display(), "no archetype document");
            return Ok(Attachment::NotFound);
        }

        match fs::read(&path) {
            Ok(bytes) => {
                debug!(path = %path.display(), bytes = bytes.len(), "read archetype document");
                Ok(Attachment::Found(bytes))
            }
            Err(source) => {
                warn!(path = %path.display(), error = %source, "archetype document unreadable");
                Err(AttachmentError::ReadError { path, source })
            }
        }
    }
}

/// Resolve `name` under `base_dir` with the default `pdf` extension.
pub fn resolve(name: &str, base_dir: &Path) -> AttachmentResult {
    AttachmentStore {
        base_dir: base_dir.to_path_buf(),
        extension: DEFAULT_EXTENSION.to_string(),
    }
    .resolve(name)
}

/// Strip surrounding whitespace and leading dots, then require a non-empty
/// extension without separators.
pub fn normalize_extension(raw: &str) -> Result<String, AttachmentError> {
    let ext = raw.trim().trim_start_matches('.');
    if ext.is_empty() || ext.contains(['/', '\\', '\0']) {
        return Err(AttachmentError::InvalidExtension {
            extension: raw.to_string(),
        });
    }
    Ok(ext.to_string())
}

fn validate_name(name: &str) -> Result<(), AttachmentError> {
    let invalid = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(AttachmentError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn candidate_path_uses_name_and_extension() {
        let store = AttachmentStore::new("/srv/docs", ".pdf").unwrap();
        assert_eq!(store.extension(), "pdf");
        assert_eq!(
            store.candidate_path("Guardian").unwrap(),
            PathBuf::from("/srv/docs/Guardian.pdf")
        );
        assert_eq!(store.file_name("Sage").unwrap(), "Sage.pdf");
    }

    #[test]
    fn names_with_separators_are_rejected() {
        let store = AttachmentStore::new("/srv/docs", "pdf").unwrap();
        for name in ["", "  ", ".", "..", "../etc/passwd", "a/b", "a\\b", "nul\0"] {
            assert!(
                matches!(
                    store.candidate_path(name),
                    Err(AttachmentError::InvalidName { .. })
                ),
                "expected {name:?} to be rejected"
            );
        }
    }

    #[test]
    fn spaces_and_punctuation_are_allowed() {
        let store = AttachmentStore::new("/srv/docs", "pdf").unwrap();
        assert_eq!(
            store.file_name("Quiet Gardener (v2)").unwrap(),
            "Quiet Gardener (v2).pdf"
        );
    }

    #[test]
    fn extensions_with_separators_are_rejected() {
        for ext in ["", " ", ".", "..", "x/../../secret", "pdf\\..", "p\0df"] {
            assert!(
                matches!(
                    AttachmentStore::new("/srv/docs", ext),
                    Err(AttachmentError::InvalidExtension { .. })
                ),
                "expected {ext:?} to be rejected"
            );
        }
        assert_eq!(normalize_extension(" .md ").unwrap(), "md");
    }

    #[test]
    fn missing_document_is_not_found() {
        let dir = TempDir::new().unwrap();
        let result = resolve("Guardian", dir.path()).unwrap();
        assert_eq!(result, Attachment::NotFound);
        assert!(result.bytes().is_none());
    }

    #[test]
    fn directory_at_candidate_path_is_read_error() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("Guardian.pdf")).unwrap();
        let err = resolve("Guardian", dir.path()).unwrap_err();
        match err {
            AttachmentError::ReadError { path, .. } => {
                assert_eq!(path, dir.path().join("Guardian.pdf"))
            }
            other => panic!("expected ReadError, got {other:?}"),
        }
    }
}
