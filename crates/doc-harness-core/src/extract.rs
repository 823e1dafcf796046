//! Extractor seam: document formats and the text-extraction trait.
//!
//! The concrete multi-format extractor lives in the application crate; the
//! search engine only sees the [`Extractor`] trait.

use serde::Serialize;
use std::fmt;

/// Extensions accepted into the corpus, lower-case and without the dot.
pub const ALLOWED_EXTENSIONS: &[&str] = &["txt", "pdf", "docx", "xlsx", "xls"];

/// Closed set of formats the extractor understands.
///
/// Chosen purely from the file extension; content is never sniffed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Text,
    Pdf,
    Docx,
    Xlsx,
    /// Legacy binary (BIFF) workbook.
    Xls,
}

impl DocumentFormat {
    /// Map a file name to its format, case-insensitively on the extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = extension_of(name)?;
        match ext.to_ascii_lowercase().as_str() {
            "txt" => Some(Self::Text),
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "xlsx" => Some(Self::Xlsx),
            "xls" => Some(Self::Xls),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Text => "text",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Xlsx => "xlsx",
            Self::Xls => "xls",
        };
        f.write_str(s)
    }
}

/// Extension of `name` without the dot, if any.
///
/// A leading dot alone (`.txt`) is treated as a hidden file with no extension.
pub fn extension_of(name: &str) -> Option<&str> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext)
}

/// Why a document's text could not be produced.
#[derive(Debug)]
pub enum ExtractError {
    UnsupportedFormat(String),
    Text(String),
    Pdf(String),
    Ooxml(String),
    Spreadsheet(String),
    Io(std::io::Error),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::UnsupportedFormat(name) => write!(f, "unsupported format: {}", name),
            ExtractError::Text(e) => write!(f, "text decoding failed: {}", e),
            ExtractError::Pdf(e) => write!(f, "PDF extraction failed: {}", e),
            ExtractError::Ooxml(e) => write!(f, "OOXML extraction failed: {}", e),
            ExtractError::Spreadsheet(e) => write!(f, "spreadsheet extraction failed: {}", e),
            ExtractError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ExtractError {}

impl From<std::io::Error> for ExtractError {
    fn from(e: std::io::Error) -> Self {
        ExtractError::Io(e)
    }
}

/// Turns stored bytes into a single normalized text string.
pub trait Extractor: Send + Sync {
    fn extract(&self, format: DocumentFormat, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// Extractor that treats every document as UTF-8 text (lossy).
///
/// Useful for tests and for embedding the engine where only plain text is
/// ever stored.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl Extractor for PlainTextExtractor {
    fn extract(&self, _format: DocumentFormat, bytes: &[u8]) -> Result<String, ExtractError> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}
