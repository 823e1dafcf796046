//! Corpus inspection and maintenance: `dh list`, `dh clear`, `dh show`.

use anyhow::Result;
use doc_harness_core::error::HarnessError;
use doc_harness_core::extract::{DocumentFormat, Extractor};
use doc_harness_core::store::Store;

use crate::config::Config;
use crate::extract::FormatExtractor;
use crate::fs_store::FsStore;

pub async fn run_list(config: &Config) -> Result<()> {
    let store = FsStore::from_config(config);
    let names = store.list().await;
    if names.is_empty() {
        println!("No documents stored.");
        return Ok(());
    }
    for name in &names {
        println!("{}", name);
    }
    println!();
    println!(
        "{} {}",
        names.len(),
        if names.len() == 1 { "document" } else { "documents" }
    );
    Ok(())
}

pub async fn run_clear(config: &Config) -> Result<()> {
    let store = FsStore::from_config(config);
    let removed = store.clear().await?;
    println!("Removed {} files from {}.", removed, store.root().display());
    Ok(())
}

/// Print the normalized text of one stored document.
pub async fn run_show(config: &Config, name: &str) -> Result<()> {
    let store = FsStore::from_config(config);
    let text = document_text(&store, &FormatExtractor::from_config(config), name).await?;
    println!("{}", text);
    Ok(())
}

/// Text of a single document, surfacing every failure instead of
/// collapsing it to empty text the way a corpus-wide search does.
pub async fn document_text<S, E>(store: &S, extractor: &E, name: &str) -> Result<String, HarnessError>
where
    S: Store,
    E: Extractor,
{
    let format = DocumentFormat::from_file_name(name).ok_or_else(|| {
        HarnessError::UnsupportedExtension(
            doc_harness_core::extract::extension_of(name)
                .unwrap_or("")
                .to_string(),
        )
    })?;
    let bytes = store.read(name).await?;
    extractor
        .extract(format, &bytes)
        .map_err(|e| HarnessError::ExtractionFailure {
            name: name.to_string(),
            reason: e.to_string(),
        })
}
