//! Document ingestion (`dh add`).
//!
//! Files are read from disk and handed to the corpus store with their
//! on-disk length as the declared size. A file over the size limit is
//! rejected before its content is read.

use anyhow::{bail, Context, Result};
use doc_harness_core::store::{validate_upload, Store};
use std::path::Path;
use tracing::warn;

use crate::config::Config;
use crate::fs_store::FsStore;

/// Ingest every path in `paths`. `name` overrides the stored file name and
/// is only valid with a single path.
///
/// Every file is attempted; the command fails if any file was rejected.
pub async fn run_add(config: &Config, paths: &[impl AsRef<Path>], name: Option<&str>) -> Result<()> {
    if name.is_some() && paths.len() != 1 {
        bail!("--name can only be used with a single file");
    }

    let store = FsStore::from_config(config);
    let mut rejected = 0usize;
    for path in paths {
        let path = path.as_ref();
        let stored_name = match name {
            Some(n) => n.to_string(),
            None => match path.file_name().and_then(|n| n.to_str()) {
                Some(n) => n.to_string(),
                None => {
                    eprintln!("Error: {}: not a file name", path.display());
                    rejected += 1;
                    continue;
                }
            },
        };

        match add_file(&store, config, path, &stored_name).await {
            Ok(line) => println!("{}", line),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "file rejected");
                eprintln!("Error: {}: {:#}", path.display(), e);
                rejected += 1;
            }
        }
    }

    if rejected > 0 {
        bail!("{} of {} files were not added", rejected, paths.len());
    }
    Ok(())
}

async fn add_file<S: Store>(store: &S, config: &Config, path: &Path, name: &str) -> Result<String> {
    let declared = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len();

    // Reject oversized files without reading them.
    if declared > config.storage.max_file_bytes {
        validate_upload(name, declared, 0, config.storage.max_file_bytes)?;
    }

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let doc = store.save(name, &bytes, declared).await?;
    Ok(format!("Added {} ({}, {} bytes)", doc.name, doc.format, doc.size))
}
