//! Settings commands (`dh settings show | get | set`).

use anyhow::Result;
use doc_harness_core::settings::{CONTEXT_SIZE_RANGE, MAX_MATCHES_RANGE};

use crate::config::Config;
use crate::settings_file::SettingsFile;

pub fn run_show(config: &Config) -> Result<()> {
    let file = SettingsFile::load(&config.settings.path);
    for (key, value) in file.settings.entries() {
        println!("{} = {}", key, value);
    }
    println!();
    println!(
        "context_size: {}..={} | max_matches_per_file: {}..={} | search_type: exact, fuzzy, boolean",
        CONTEXT_SIZE_RANGE.start(),
        CONTEXT_SIZE_RANGE.end(),
        MAX_MATCHES_RANGE.start(),
        MAX_MATCHES_RANGE.end()
    );
    println!("file: {}", file.path().display());
    Ok(())
}

pub fn run_get(config: &Config, key: &str) -> Result<()> {
    let file = SettingsFile::load(&config.settings.path);
    println!("{}", file.settings.get_setting(key)?);
    Ok(())
}

/// Validate and persist one setting. A rejected value leaves the file untouched.
pub fn run_set(config: &Config, key: &str, value: &str) -> Result<()> {
    let mut file = SettingsFile::load(&config.settings.path);
    file.settings.set_setting(key, value)?;
    file.save()?;
    println!("{} = {}", key, file.settings.get_setting(key)?);
    Ok(())
}
