//! Data types that flow from the store through search to the renderer.

use serde::Serialize;

use crate::extract::DocumentFormat;
use crate::settings::QueryMode;

/// A document persisted in the corpus, identified by its file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredDocument {
    pub name: String,
    pub format: DocumentFormat,
    /// Size in bytes of the stored content.
    pub size: u64,
}

/// One located occurrence of a query inside a document's normalized text.
///
/// Offsets are character offsets (not bytes) into the normalized text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    /// Name of the document the occurrence was found in.
    pub document: String,
    /// Display form of the context window: ellipses where the window was cut,
    /// matched span rendered as `>>> UPPERCASED <<<`.
    pub context: String,
    /// Character offset of the occurrence.
    pub match_offset: usize,
    /// First character of the window (inclusive).
    pub window_start: usize,
    /// End of the window (exclusive), never past the end of the text.
    pub window_end: usize,
    pub leading_ellipsis: bool,
    pub trailing_ellipsis: bool,
}

/// All matches for a single document, in occurrence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentMatches {
    pub document: String,
    /// Empty in boolean mode, which only decides inclusion.
    pub matches: Vec<Match>,
}

impl DocumentMatches {
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }
}

/// Outcome of one search over the corpus.
///
/// Documents appear in corpus enumeration order; no ranking is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub query: String,
    pub mode: QueryMode,
    pub documents: Vec<DocumentMatches>,
    /// Located occurrences across all documents. In boolean mode, where no
    /// positions are produced, this is the number of matched documents.
    pub total_matches: usize,
}

impl SearchResult {
    pub fn empty(query: &str, mode: QueryMode) -> Self {
        Self {
            query: query.to_string(),
            mode,
            documents: Vec::new(),
            total_matches: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
