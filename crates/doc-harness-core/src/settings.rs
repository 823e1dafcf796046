//! Search settings: context window size, per-file match cap, query mode.
//!
//! Settings are a plain value threaded into every search call. Updates go
//! through [`SearchSettings::set`], which validates before applying, so a
//! rejected update always leaves the previous value in place.

use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::{HarnessError, Result};

pub const CONTEXT_SIZE_RANGE: RangeInclusive<usize> = 50..=500;
pub const MAX_MATCHES_RANGE: RangeInclusive<usize> = 1..=50;

pub const DEFAULT_CONTEXT_SIZE: usize = 100;
pub const DEFAULT_MAX_MATCHES: usize = 10;

/// How a query string is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum QueryMode {
    /// Case-insensitive substring of the whole query.
    #[default]
    #[serde(rename = "exact")]
    Exact,
    /// Every whitespace-separated word is located independently.
    ///
    /// Stored and displayed as `fuzzy` for compatibility with existing
    /// settings files, but there is no edit-distance tolerance: each word is
    /// matched literally.
    #[serde(rename = "fuzzy")]
    PerWord,
    /// `A and B`, `A or B`, `A not B` evaluated per document.
    #[serde(rename = "boolean")]
    Boolean,
}

impl QueryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryMode::Exact => "exact",
            QueryMode::PerWord => "fuzzy",
            QueryMode::Boolean => "boolean",
        }
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(QueryMode::Exact),
            "fuzzy" | "words" | "per-word" => Ok(QueryMode::PerWord),
            "boolean" | "bool" => Ok(QueryMode::Boolean),
            other => Err(format!(
                "unknown query mode '{}'; use exact, fuzzy, or boolean",
                other
            )),
        }
    }
}

/// Names of the settings that can be read and written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    ContextSize,
    MaxMatchesPerFile,
    SearchType,
    ShowPreview,
}

impl SettingKey {
    pub const ALL: [SettingKey; 4] = [
        SettingKey::ContextSize,
        SettingKey::MaxMatchesPerFile,
        SettingKey::SearchType,
        SettingKey::ShowPreview,
    ];

    /// Key as it appears in the persisted settings file.
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::ContextSize => "context_size",
            SettingKey::MaxMatchesPerFile => "max_matches_per_file",
            SettingKey::SearchType => "search_type",
            SettingKey::ShowPreview => "show_preview",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "context_size" => Ok(SettingKey::ContextSize),
            "max_matches_per_file" => Ok(SettingKey::MaxMatchesPerFile),
            "search_type" | "query_mode" => Ok(SettingKey::SearchType),
            "show_preview" => Ok(SettingKey::ShowPreview),
            other => Err(HarnessError::UnknownSetting(other.to_string())),
        }
    }
}

/// Typed value of a single setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingValue {
    Number(usize),
    Mode(QueryMode),
    Flag(bool),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Number(n) => write!(f, "{}", n),
            SettingValue::Mode(m) => write!(f, "{}", m),
            SettingValue::Flag(b) => write!(f, "{}", b),
        }
    }
}

/// Active search configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchSettings {
    /// Characters of context on each side of a match.
    pub context_size: usize,
    /// Cap on located occurrences per document.
    pub max_matches_per_file: usize,
    #[serde(rename = "search_type")]
    pub query_mode: QueryMode,
    /// When false, results list documents without context snippets.
    pub show_preview: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            context_size: DEFAULT_CONTEXT_SIZE,
            max_matches_per_file: DEFAULT_MAX_MATCHES,
            query_mode: QueryMode::Exact,
            show_preview: true,
        }
    }
}

impl SearchSettings {
    pub fn get(&self, key: SettingKey) -> SettingValue {
        match key {
            SettingKey::ContextSize => SettingValue::Number(self.context_size),
            SettingKey::MaxMatchesPerFile => SettingValue::Number(self.max_matches_per_file),
            SettingKey::SearchType => SettingValue::Mode(self.query_mode),
            SettingKey::ShowPreview => SettingValue::Flag(self.show_preview),
        }
    }

    /// Look a setting up by its textual key.
    pub fn get_setting(&self, key: &str) -> Result<SettingValue> {
        Ok(self.get(key.parse()?))
    }

    /// Parse, validate, and apply `value`. On error nothing changes.
    pub fn set(&mut self, key: SettingKey, value: &str) -> Result<()> {
        match key {
            SettingKey::ContextSize => {
                self.context_size = parse_bounded(key, value, &CONTEXT_SIZE_RANGE)?;
            }
            SettingKey::MaxMatchesPerFile => {
                self.max_matches_per_file = parse_bounded(key, value, &MAX_MATCHES_RANGE)?;
            }
            SettingKey::SearchType => {
                self.query_mode = value
                    .parse()
                    .map_err(|reason| invalid(key, value, reason))?;
            }
            SettingKey::ShowPreview => {
                self.show_preview = parse_flag(value)
                    .ok_or_else(|| invalid(key, value, "expected true or false".to_string()))?;
            }
        }
        Ok(())
    }

    /// Textual-key form of [`set`](Self::set).
    pub fn set_setting(&mut self, key: &str, value: &str) -> Result<()> {
        self.set(key.parse()?, value)
    }

    /// Every setting with its current value, in a stable order.
    pub fn entries(&self) -> Vec<(SettingKey, SettingValue)> {
        SettingKey::ALL.iter().map(|k| (*k, self.get(*k))).collect()
    }
}

fn parse_bounded(key: SettingKey, value: &str, range: &RangeInclusive<usize>) -> Result<usize> {
    let n: usize = value
        .trim()
        .parse()
        .map_err(|_| invalid(key, value, "not a whole number".to_string()))?;
    if !range.contains(&n) {
        return Err(invalid(
            key,
            value,
            format!("must be between {} and {}", range.start(), range.end()),
        ));
    }
    Ok(n)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn invalid(key: SettingKey, value: &str, reason: String) -> HarnessError {
    HarnessError::InvalidSetting {
        key: key.as_str().to_string(),
        value: value.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = SearchSettings::default();
        assert_eq!(s.context_size, 100);
        assert_eq!(s.max_matches_per_file, 10);
        assert_eq!(s.query_mode, QueryMode::Exact);
        assert!(s.show_preview);
    }

    #[test]
    fn context_size_below_range_is_rejected_and_retained() {
        let mut s = SearchSettings::default();
        let err = s.set_setting("context_size", "10").unwrap_err();
        assert!(matches!(err, HarnessError::InvalidSetting { .. }));
        assert_eq!(s.context_size, 100);
    }

    #[test]
    fn context_size_in_range_is_applied() {
        let mut s = SearchSettings::default();
        s.set_setting("context_size", "150").unwrap();
        assert_eq!(
            s.get_setting("context_size").unwrap(),
            SettingValue::Number(150)
        );
    }

    #[test]
    fn bounds_are_inclusive() {
        let mut s = SearchSettings::default();
        s.set(SettingKey::ContextSize, "50").unwrap();
        s.set(SettingKey::ContextSize, "500").unwrap();
        assert!(s.set(SettingKey::ContextSize, "501").is_err());
        s.set(SettingKey::MaxMatchesPerFile, "1").unwrap();
        s.set(SettingKey::MaxMatchesPerFile, "50").unwrap();
        assert!(s.set(SettingKey::MaxMatchesPerFile, "0").is_err());
        assert!(s.set(SettingKey::MaxMatchesPerFile, "51").is_err());
        assert_eq!(s.max_matches_per_file, 50);
    }

    #[test]
    fn non_numeric_value_is_rejected() {
        let mut s = SearchSettings::default();
        assert!(s.set_setting("max_matches_per_file", "ten").is_err());
        assert!(s.set_setting("max_matches_per_file", "-3").is_err());
        assert!(s.set_setting("context_size", "12.5").is_err());
        assert_eq!(s, SearchSettings::default());
    }

    #[test]
    fn query_mode_accepts_alias_key_and_names() {
        let mut s = SearchSettings::default();
        s.set_setting("query_mode", "Boolean").unwrap();
        assert_eq!(s.query_mode, QueryMode::Boolean);
        s.set_setting("search_type", "fuzzy").unwrap();
        assert_eq!(s.query_mode, QueryMode::PerWord);
        assert!(s.set_setting("search_type", "semantic").is_err());
        assert_eq!(s.query_mode, QueryMode::PerWord);
    }

    #[test]
    fn show_preview_parses_flags() {
        let mut s = SearchSettings::default();
        s.set_setting("show_preview", "off").unwrap();
        assert!(!s.show_preview);
        assert!(s.set_setting("show_preview", "maybe").is_err());
        assert!(!s.show_preview);
    }

    #[test]
    fn unknown_key_is_reported() {
        let mut s = SearchSettings::default();
        let err = s.set_setting("auto_translate", "true").unwrap_err();
        assert!(matches!(err, HarnessError::UnknownSetting(k) if k == "auto_translate"));
    }

    #[test]
    fn entries_cover_every_key() {
        let entries = SearchSettings::default().entries();
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "context_size",
                "max_matches_per_file",
                "search_type",
                "show_preview"
            ]
        );
        assert_eq!(entries[2].1.to_string(), "exact");
    }
}
