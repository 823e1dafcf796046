//! Error taxonomy shared by the store, settings, and search layers.

use thiserror::Error;

/// Errors surfaced by corpus and settings operations.
///
/// Extraction failures are carried separately as
/// [`ExtractError`](crate::extract::ExtractError) and are never propagated
/// out of a search; they only appear here when a caller asks for the text of
/// one specific document.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("file too large: {name} is {size} bytes (limit {limit})")]
    FileTooLarge { name: String, size: u64, limit: u64 },

    #[error("unsupported extension: {0} (allowed: txt, pdf, docx, xlsx, xls)")]
    UnsupportedExtension(String),

    #[error("invalid file name: {0:?}")]
    InvalidFileName(String),

    #[error("extraction failed for {name}: {reason}")]
    ExtractionFailure { name: String, reason: String },

    #[error("invalid value {value:?} for setting {key}: {reason}")]
    InvalidSetting {
        key: String,
        value: String,
        reason: String,
    },

    #[error("unknown setting: {0}")]
    UnknownSetting(String),

    #[error("corpus unavailable: {0}")]
    CorpusUnavailable(String),

    #[error("document not found: {0}")]
    DocumentNotFound(String),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
