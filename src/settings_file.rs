//! Persisted search settings.
//!
//! Settings live in a flat JSON object, for example:
//!
//! ```json
//! {
//!   "context_size": 150,
//!   "max_matches_per_file": 10,
//!   "search_type": "exact",
//!   "show_preview": true
//! }
//! ```
//!
//! Loading never fails: a missing or unparsable file yields defaults, and a
//! rejected value falls back to its default with a warning. Keys this
//! version does not know are carried through unchanged on save.

use anyhow::{Context, Result};
use doc_harness_core::settings::{SearchSettings, SettingKey, SettingValue};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Search settings bound to the file they were loaded from.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
    pub settings: SearchSettings,
    extra: Map<String, Value>,
}

impl SettingsFile {
    pub fn load(path: &Path) -> Self {
        let mut file = Self {
            path: path.to_path_buf(),
            settings: SearchSettings::default(),
            extra: Map::new(),
        };

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no settings file, using defaults");
                return file;
            }
        };
        let object = match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                debug!(path = %path.display(), "settings file is not a JSON object, using defaults");
                return file;
            }
        };

        for (key, value) in object {
            let Ok(setting) = key.parse::<SettingKey>() else {
                file.extra.insert(key, value);
                continue;
            };
            let text = match &value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            if let Err(e) = file.settings.set(setting, &text) {
                warn!(key = %key, error = %e, "ignoring persisted setting");
            }
        }
        file
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The flat object written to disk: unknown keys first, then every
    /// known setting under its canonical name.
    pub fn to_json(&self) -> Map<String, Value> {
        let mut object = self.extra.clone();
        for (key, value) in self.settings.entries() {
            let json = match value {
                SettingValue::Number(n) => Value::from(n),
                SettingValue::Mode(m) => Value::from(m.as_str()),
                SettingValue::Flag(b) => Value::from(b),
            };
            object.insert(key.as_str().to_string(), json);
        }
        object
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create settings directory: {}", parent.display())
                })?;
            }
        }
        let body = serde_json::to_string_pretty(&Value::Object(self.to_json()))?;
        std::fs::write(&self.path, body + "\n")
            .with_context(|| format!("Failed to write settings file: {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_harness_core::settings::QueryMode;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let file = SettingsFile::load(&dir.path().join("absent.json"));
        assert_eq!(file.settings, SearchSettings::default());
    }

    #[test]
    fn garbage_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(SettingsFile::load(&path).settings, SearchSettings::default());
    }

    #[test]
    fn persisted_values_are_applied() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(
            &path,
            r#"{"context_size": 150, "max_matches_per_file": "5", "search_type": "boolean", "show_preview": false}"#,
        )
        .unwrap();
        let s = SettingsFile::load(&path).settings;
        assert_eq!(s.context_size, 150);
        assert_eq!(s.max_matches_per_file, 5);
        assert_eq!(s.query_mode, QueryMode::Boolean);
        assert!(!s.show_preview);
    }

    #[test]
    fn out_of_range_value_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(&path, r#"{"context_size": 10, "max_matches_per_file": 7}"#).unwrap();
        let s = SettingsFile::load(&path).settings;
        assert_eq!(s.context_size, 100);
        assert_eq!(s.max_matches_per_file, 7);
    }

    #[test]
    fn unknown_keys_survive_a_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("s.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"auto_translate": true, "context_size": 200}"#).unwrap();

        let mut file = SettingsFile::load(&path);
        file.settings.set_setting("search_type", "fuzzy").unwrap();
        file.save().unwrap();

        let saved: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["auto_translate"], Value::Bool(true));
        assert_eq!(saved["context_size"], Value::from(200));
        assert_eq!(saved["search_type"], Value::from("fuzzy"));
        assert_eq!(saved["show_preview"], Value::Bool(true));
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a").join("b").join("s.json");
        SettingsFile::load(&path).save().unwrap();
        assert!(path.exists());
    }
}
