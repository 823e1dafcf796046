//! Search command (`dh search`).
//!
//! Loads the persisted settings, applies any per-invocation overrides
//! (validated the same way as `dh settings set`, but never saved), runs the
//! engine over the on-disk corpus, and prints either the rendered text block
//! or the structured result as JSON.

use anyhow::Result;
use doc_harness_core::models::SearchResult;
use doc_harness_core::render::render;
use doc_harness_core::search::search;
use doc_harness_core::settings::{SearchSettings, SettingKey};
use tracing::info;

use crate::config::Config;
use crate::extract::FormatExtractor;
use crate::fs_store::FsStore;
use crate::settings_file::SettingsFile;

/// Per-invocation settings overrides from the command line.
#[derive(Debug, Default, Clone)]
pub struct SearchOverrides {
    pub mode: Option<String>,
    pub context: Option<String>,
    pub max_matches: Option<String>,
}

impl SearchOverrides {
    /// Apply the overrides on top of `settings`.
    pub fn apply(&self, mut settings: SearchSettings) -> Result<SearchSettings> {
        let pairs = [
            (SettingKey::SearchType, &self.mode),
            (SettingKey::ContextSize, &self.context),
            (SettingKey::MaxMatchesPerFile, &self.max_matches),
        ];
        for (key, value) in pairs {
            if let Some(value) = value {
                settings.set(key, value)?;
            }
        }
        Ok(settings)
    }
}

/// Run one search and return the structured result with the settings used.
pub async fn execute(
    config: &Config,
    query: &str,
    overrides: &SearchOverrides,
) -> Result<(SearchResult, SearchSettings)> {
    let settings = overrides.apply(SettingsFile::load(&config.settings.path).settings)?;
    let store = FsStore::from_config(config);
    let extractor = FormatExtractor::from_config(config);

    let result = search(&store, &extractor, query, &settings).await;
    info!(
        query = %result.query,
        mode = %result.mode,
        documents = result.documents.len(),
        total_matches = result.total_matches,
        "search complete"
    );
    Ok((result, settings))
}

pub async fn run_search(
    config: &Config,
    query: &str,
    overrides: &SearchOverrides,
    json: bool,
) -> Result<()> {
    let (result, settings) = execute(config, query, overrides).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", render(&result, &settings, &config.render));
    }
    Ok(())
}
