//! Configuration parsing and validation.
//!
//! Doc Harness is configured via a TOML file (default: `config/dh.toml`).
//! Every section is optional; a missing file means built-in defaults.
//!
//! # Example Configuration
//!
//! ```toml
//! [storage]
//! root = "./docs"
//! max_file_bytes = 10485760
//!
//! [settings]
//! path = "./search_settings.json"
//!
//! [render]
//! max_chars = 4000
//! compact_documents = 2
//! compact_matches = 3
//! compact_snippet_chars = 150
//!
//! [extract]
//! pdf_max_pages = 50
//! ```

use anyhow::{Context, Result};
use doc_harness_core::render::RenderBudget;
use doc_harness_core::store::DEFAULT_MAX_FILE_BYTES;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Top-level configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub render: RenderBudget,
    #[serde(default)]
    pub extract: ExtractConfig,
}

/// Where documents live and how large an upload may be.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("./docs")
}
fn default_max_file_bytes() -> u64 {
    DEFAULT_MAX_FILE_BYTES
}

/// Location of the persisted search settings.
#[derive(Debug, Deserialize, Clone)]
pub struct SettingsConfig {
    #[serde(default = "default_settings_path")]
    pub path: PathBuf,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            path: default_settings_path(),
        }
    }
}

fn default_settings_path() -> PathBuf {
    PathBuf::from("./search_settings.json")
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExtractConfig {
    /// Only the first pages of a PDF are read.
    #[serde(default = "default_pdf_max_pages")]
    pub pdf_max_pages: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            pdf_max_pages: default_pdf_max_pages(),
        }
    }
}

fn default_pdf_max_pages() -> usize {
    50
}

impl Config {
    /// Built-in defaults, used when no config file exists.
    pub fn minimal() -> Self {
        Self::default()
    }
}

/// Load the config at `path`, or defaults if the file does not exist.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(Config::minimal());
    }
    load_config(path)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate storage
    if config.storage.max_file_bytes == 0 {
        anyhow::bail!("storage.max_file_bytes must be > 0");
    }

    // Validate render
    if config.render.max_chars < 200 {
        anyhow::bail!("render.max_chars must be >= 200");
    }
    if config.render.compact_documents < 1 {
        anyhow::bail!("render.compact_documents must be >= 1");
    }
    if config.render.compact_matches < 1 {
        anyhow::bail!("render.compact_matches must be >= 1");
    }
    if config.render.compact_snippet_chars < 10 {
        anyhow::bail!("render.compact_snippet_chars must be >= 10");
    }

    // Validate extract
    if config.extract.pdf_max_pages < 1 {
        anyhow::bail!("extract.pdf_max_pages must be >= 1");
    }

    Ok(config)
}
