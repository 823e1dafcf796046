//! Corpus store abstraction.
//!
//! The [`Store`] trait is the only way the search engine sees documents: it
//! lists names, reads bytes, and accepts uploads. Implementations must be
//! `Send + Sync` to work with async runtimes.
//!
//! Upload validation is shared by every implementation through
//! [`validate_upload`], so the in-memory and on-disk stores reject exactly
//! the same inputs.

pub mod memory;

use async_trait::async_trait;

use crate::error::{HarnessError, Result};
use crate::extract::{extension_of, DocumentFormat};
use crate::models::StoredDocument;

/// Upload ceiling used when no configuration overrides it (10 MiB).
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Abstract corpus backend.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`save`](Store::save) | Validate and persist an upload, overwriting by name |
/// | [`list`](Store::list) | Names of stored documents with allowed extensions |
/// | [`read`](Store::read) | Raw bytes of one document |
/// | [`clear`](Store::clear) | Remove every stored file |
#[async_trait]
pub trait Store: Send + Sync {
    /// Persist `bytes` under `name`. The last write for a name wins.
    async fn save(&self, name: &str, bytes: &[u8], declared_size: u64)
        -> Result<StoredDocument>;

    /// Names of stored documents, sorted. An unavailable corpus lists as empty.
    async fn list(&self) -> Vec<String>;

    /// Raw content of one document.
    async fn read(&self, name: &str) -> Result<Vec<u8>>;

    /// Remove every stored file, returning how many were removed.
    ///
    /// Not atomic: when some removals fail the ones that succeeded stay
    /// removed and an error is returned.
    async fn clear(&self) -> Result<usize>;
}

/// Whether `name` carries an extension from the allow-list.
pub fn is_allowed(name: &str) -> bool {
    DocumentFormat::from_file_name(name).is_some()
}

/// Check an upload before anything is written.
///
/// Order: file name shape, then size (the larger of declared and actual),
/// then extension.
pub fn validate_upload(
    name: &str,
    declared_size: u64,
    actual_size: u64,
    limit: u64,
) -> Result<DocumentFormat> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
    {
        return Err(HarnessError::InvalidFileName(name.to_string()));
    }

    let size = declared_size.max(actual_size);
    if size > limit {
        return Err(HarnessError::FileTooLarge {
            name: name.to_string(),
            size,
            limit,
        });
    }

    DocumentFormat::from_file_name(name).ok_or_else(|| {
        HarnessError::UnsupportedExtension(extension_of(name).unwrap_or("").to_string())
    })
}
