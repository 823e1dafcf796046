//! Directory-backed corpus store.
//!
//! Each document is one file directly under the configured root. The
//! directory is created lazily on the first save. There is no locking: a
//! concurrent `clear` during a search shows up as documents that vanish
//! mid-scan, which the search engine treats as empty text.

use async_trait::async_trait;
use doc_harness_core::error::{HarnessError, Result};
use doc_harness_core::models::StoredDocument;
use doc_harness_core::store::{is_allowed, validate_upload, Store};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::Config;

pub struct FsStore {
    root: PathBuf,
    max_file_bytes: u64,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>, max_file_bytes: u64) -> Self {
        Self {
            root: root.into(),
            max_file_bytes,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.storage.root, config.storage.max_file_bytes)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn unavailable(&self, e: std::io::Error) -> HarnessError {
        HarnessError::CorpusUnavailable(format!("{}: {}", self.root.display(), e))
    }
}

#[async_trait]
impl Store for FsStore {
    async fn save(
        &self,
        name: &str,
        bytes: &[u8],
        declared_size: u64,
    ) -> Result<StoredDocument> {
        let format = validate_upload(name, declared_size, bytes.len() as u64, self.max_file_bytes)?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| self.unavailable(e))?;
        tokio::fs::write(self.root.join(name), bytes)
            .await
            .map_err(|e| self.unavailable(e))?;

        info!(document = name, bytes = bytes.len(), %format, "document saved");
        Ok(StoredDocument {
            name: name.to_string(),
            format,
            size: bytes.len() as u64,
        })
    }

    async fn list(&self) -> Vec<String> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) => {
                debug!(root = %self.root.display(), error = %e, "corpus not readable, listing as empty");
                return Vec::new();
            }
        };

        let mut names = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
                    if !is_file {
                        continue;
                    }
                    if let Some(name) = entry.file_name().to_str() {
                        if is_allowed(name) {
                            names.push(name.to_string());
                        }
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(root = %self.root.display(), error = %e, "stopped listing corpus early");
                    break;
                }
            }
        }
        names.sort();
        names
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>> {
        if name.contains('/') || name.contains('\\') || name == ".." || name == "." {
            return Err(HarnessError::InvalidFileName(name.to_string()));
        }
        match tokio::fs::read(self.root.join(name)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(HarnessError::DocumentNotFound(name.to_string()))
            }
            Err(e) => Err(self.unavailable(e)),
        }
    }

    async fn clear(&self) -> Result<usize> {
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| self.unavailable(e))?;

        let mut files = Vec::new();
        let mut unlisted = 0usize;
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    if entry.file_type().await.map(|t| t.is_file()).unwrap_or(false) {
                        files.push(entry.path());
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "could not enumerate remaining corpus files");
                    unlisted += 1;
                    break;
                }
            }
        }
        self.remove_files(&files, unlisted).await
    }
}

impl FsStore {
    /// Remove every path, continuing past failures. Files already removed
    /// stay removed when any removal (or `prior_failures`) fails.
    async fn remove_files(&self, paths: &[PathBuf], prior_failures: usize) -> Result<usize> {
        let mut removed = 0usize;
        let mut failed = prior_failures;
        for path in paths {
            match tokio::fs::remove_file(path).await {
                Ok(()) => removed += 1,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to remove file");
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            return Err(HarnessError::CorpusUnavailable(format!(
                "{} file(s) could not be removed from {} ({} removed)",
                failed,
                self.root.display(),
                removed
            )));
        }
        info!(removed, "corpus cleared");
        Ok(removed)
    }
}
