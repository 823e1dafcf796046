//! In-memory [`Store`] implementation for tests and embedding.
//!
//! Documents live in a `BTreeMap` behind `std::sync::RwLock`, so listing is
//! naturally sorted by name.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::error::{HarnessError, Result};
use crate::models::StoredDocument;

use super::{is_allowed, validate_upload, Store, DEFAULT_MAX_FILE_BYTES};

/// In-memory corpus.
pub struct InMemoryStore {
    files: RwLock<BTreeMap<String, Vec<u8>>>,
    max_file_bytes: u64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_FILE_BYTES)
    }

    pub fn with_limit(max_file_bytes: u64) -> Self {
        Self {
            files: RwLock::new(BTreeMap::new()),
            max_file_bytes,
        }
    }

    /// Insert raw bytes without validation, e.g. to simulate a stray file.
    pub fn insert_raw(&self, name: &str, bytes: &[u8]) {
        let mut files = self.files.write().unwrap_or_else(PoisonError::into_inner);
        files.insert(name.to_string(), bytes.to_vec());
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn save(
        &self,
        name: &str,
        bytes: &[u8],
        declared_size: u64,
    ) -> Result<StoredDocument> {
        let format = validate_upload(name, declared_size, bytes.len() as u64, self.max_file_bytes)?;
        let mut files = self.files.write().unwrap_or_else(PoisonError::into_inner);
        files.insert(name.to_string(), bytes.to_vec());
        Ok(StoredDocument {
            name: name.to_string(),
            format,
            size: bytes.len() as u64,
        })
    }

    async fn list(&self) -> Vec<String> {
        let files = self.files.read().unwrap_or_else(PoisonError::into_inner);
        files.keys().filter(|n| is_allowed(n)).cloned().collect()
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>> {
        let files = self.files.read().unwrap_or_else(PoisonError::into_inner);
        files
            .get(name)
            .cloned()
            .ok_or_else(|| HarnessError::DocumentNotFound(name.to_string()))
    }

    async fn clear(&self) -> Result<usize> {
        let mut files = self.files.write().unwrap_or_else(PoisonError::into_inner);
        let removed = files.len();
        files.clear();
        Ok(removed)
    }
}
