//! Corpus-wide search.
//!
//! One search takes a snapshot of the store's document list, extracts each
//! document, and evaluates the query against its text. Documents that cannot
//! be read or extracted are logged and treated as empty; a single bad file
//! never fails the whole search.

use tracing::{debug, warn};

use crate::extract::{DocumentFormat, Extractor};
use crate::models::SearchResult;
use crate::query::evaluate;
use crate::settings::{QueryMode, SearchSettings};
use crate::store::Store;

/// Run `query` over every document in `store`.
///
/// Matched documents keep the store's enumeration order. An empty (or
/// whitespace-only) query yields an empty result without touching the store.
pub async fn search<S, E>(
    store: &S,
    extractor: &E,
    query: &str,
    settings: &SearchSettings,
) -> SearchResult
where
    S: Store + ?Sized,
    E: Extractor + ?Sized,
{
    let query = query.trim();
    let mut result = SearchResult::empty(query, settings.query_mode);
    if query.is_empty() {
        return result;
    }

    let names = store.list().await;
    debug!(documents = names.len(), mode = %settings.query_mode, "searching corpus");

    for name in names {
        let text = document_text(store, extractor, &name).await;
        if let Some(found) = evaluate(&name, &text, query, settings) {
            result.documents.push(found);
        }
    }

    result.total_matches = match settings.query_mode {
        QueryMode::Boolean => result.documents.len(),
        _ => result.documents.iter().map(|d| d.match_count()).sum(),
    };
    result
}

/// Normalized text of one document, or empty if it cannot be produced.
pub async fn document_text<S, E>(store: &S, extractor: &E, name: &str) -> String
where
    S: Store + ?Sized,
    E: Extractor + ?Sized,
{
    let Some(format) = DocumentFormat::from_file_name(name) else {
        return String::new();
    };
    let bytes = match store.read(name).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(document = name, error = %e, "skipping unreadable document");
            return String::new();
        }
    };
    match extractor.extract(format, &bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(document = name, error = %e, "extraction failed, treating as empty");
            String::new()
        }
    }
}
